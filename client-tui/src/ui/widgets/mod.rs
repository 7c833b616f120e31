mod board;
mod chart;
mod review_panel;

pub use board::{BoardGeometry, BoardOverlay, BoardWidget};
pub use chart::{ChartGeometry, WinRateChart};
pub use review_panel::{review_summary, ReviewPanel};
