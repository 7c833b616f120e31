//! Deriving the per-move win-rate series from a review's move mapping.
//!
//! The move mapping is the single source of truth. Every mutation goes
//! through [`ReconciledReview::apply_move_update`], which rebuilds the
//! derived data from scratch.

use tracing::debug;

use crate::types::{MoveAnalysis, Review};

/// Win-rates indexed by move number. Unanalyzed moves hold `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WinRateSeries(Vec<Option<f64>>);

impl WinRateSeries {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, move_number: u32) -> Option<f64> {
        self.0.get(move_number as usize).copied().flatten()
    }

    pub fn as_slice(&self) -> &[Option<f64>] {
        &self.0
    }

    /// `(move_number, win_rate)` for every analyzed move.
    pub fn analyzed(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, rate)| rate.map(|r| (i as u32, r)))
    }
}

/// One chart point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayEntry {
    pub move_number: u32,
    pub win_rate: f64,
    pub num_variations: usize,
}

impl DisplayEntry {
    pub fn boundary(move_number: u32) -> Self {
        Self {
            move_number,
            win_rate: 0.5,
            num_variations: 0,
        }
    }
}

/// A review together with the data derived from its move mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledReview {
    review: Review,
    series: Option<WinRateSeries>,
}

/// Fill post-move win-rates and build the series.
///
/// A review without analyzed moves has no series; that is the queued
/// state, not an error.
pub fn reconcile(review: Review) -> ReconciledReview {
    let mut reconciled = ReconciledReview {
        review,
        series: None,
    };
    reconciled.rebuild();
    reconciled
}

impl ReconciledReview {
    fn rebuild(&mut self) {
        let moves = &mut self.review.moves;
        if moves.is_empty() {
            self.series = None;
            return;
        }

        let next_pre: Vec<(u32, Option<f64>)> = moves
            .keys()
            .map(|k| {
                let next = k
                    .checked_add(1)
                    .and_then(|n| moves.get(&n))
                    .map(|m| m.pre_move_win_rate);
                (*k, next)
            })
            .collect();

        for (key, post) in next_pre {
            if let Some(analysis) = moves.get_mut(&key) {
                analysis.post_move_win_rate = post;
            }
        }

        let len = moves
            .values()
            .map(|m| m.move_number as usize + 1)
            .max()
            .unwrap_or(0);
        let mut rates = vec![None; len];
        for analysis in moves.values() {
            rates[analysis.move_number as usize] = Some(analysis.pre_move_win_rate);
        }

        debug!(
            review_id = %self.review.id,
            analyzed = moves.len(),
            series_len = len,
            "Reconciled win-rate series"
        );
        self.series = Some(WinRateSeries(rates));
    }

    pub fn review(&self) -> &Review {
        &self.review
    }

    pub fn into_review(self) -> Review {
        self.review
    }

    pub fn series(&self) -> Option<&WinRateSeries> {
        self.series.as_ref()
    }

    pub fn move_analysis(&self, move_number: u32) -> Option<&MoveAnalysis> {
        self.review.moves.get(&move_number)
    }

    /// Replace one move's analysis and rebuild everything derived from the mapping.
    pub fn apply_move_update(&mut self, move_number: u32, analysis: MoveAnalysis) {
        self.review.moves.insert(move_number, analysis);
        self.rebuild();
    }

    /// One entry per analyzed move, in move order.
    pub fn display_entries(&self) -> Vec<DisplayEntry> {
        let Some(series) = &self.series else {
            return Vec::new();
        };
        series
            .analyzed()
            .map(|(move_number, win_rate)| DisplayEntry {
                move_number,
                win_rate,
                num_variations: self
                    .review
                    .moves
                    .get(&move_number)
                    .map(|m| m.variations.len())
                    .unwrap_or(0),
            })
            .collect()
    }

    /// Entries marked on the chart.
    ///
    /// With three or fewer analyzed moves every entry is marked. Otherwise
    /// an entry is marked when the following move has no analysis and the
    /// entry is not the last point of the series.
    pub fn highlighted_entries(&self) -> Vec<DisplayEntry> {
        let moves = &self.review.moves;
        let show_all = moves.len() <= 3;
        let last = self.series.as_ref().map(|s| s.len().saturating_sub(1));

        self.display_entries()
            .into_iter()
            .filter(|e| {
                moves.contains_key(&e.move_number)
                    && (show_all
                        || (!moves.contains_key(&(e.move_number + 1))
                            && Some(e.move_number as usize) != last))
            })
            .collect()
    }
}
