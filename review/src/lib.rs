//! AI review logic for Go game records.
//!
//! Picks the best review among candidates, reconciles per-move analysis
//! into a win-rate series, derives board annotations for the viewed move
//! and builds the chart model. Nothing here performs I/O.

pub mod annotate;
pub mod chart;
pub mod display;
pub mod reconcile;
pub mod selector;
pub mod types;

pub use annotate::{
    annotate, delta_label, move_delta, AnnotateError, Annotation, BoardSurface, ColoredCircle,
    Heatmap, MarkKind, Marks, Rgba,
};
pub use chart::{
    ChartCursor, ChartModel, ChartPresenter, ChartState, LinearScale, ResizeDebouncer,
};
pub use display::{engine_display_name, DeltaDisplay, DeltaTrend, StrengthTier, WinRateSplit};
pub use reconcile::{reconcile, DisplayEntry, ReconciledReview, WinRateSeries};
pub use selector::{compare_reviews, rank_reviews, select_best};
pub use types::{MoveAnalysis, Review, ReviewType, Variation};
