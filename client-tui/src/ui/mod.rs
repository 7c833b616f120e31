// UI modules
pub mod app;
pub mod theme;
pub mod widgets;

// Main entry points
pub mod input;
pub mod render_loop;

pub use app::{App, AppAction};
pub use render_loop::run_app;
