//! Terminal viewer for AI reviews of Go games.

pub mod config;
pub mod controller;
pub mod ui;

pub use controller::ReviewController;
