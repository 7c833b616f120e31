//! Board annotations for the move being viewed.
//!
//! On the trunk the overlay shows the engine's candidates: a heatmap of
//! visit counts, win-rate delta labels and highlight circles for the
//! engine's top choice and the move actually played. Inside a variation
//! it shows the engine's continuation as numbered moves.

use std::collections::BTreeMap;

use goban::{decode_moves, encode_move, encode_moves, BoardSize, GobanError, Intersection};
use goban::{MoveTree, NodeId, StoneColor};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::warn;

use crate::reconcile::ReconciledReview;
use crate::types::{MoveAnalysis, Review, Variation};

/// Explored candidates need at least this many visits to get a label.
const MIN_LABEL_VISITS: f64 = 50.0;

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("Candidate outside the board: {0}")]
    Board(#[from] GobanError),

    #[error("Variation continuation could not be decoded: {0}")]
    Continuation(GobanError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0.0);
    pub const BLACK: Self = Self::new(0, 0, 0, 1.0);
    pub const ENGINE_BLUE: Self = Self::new(0, 130, 255, 1.0);
    pub const ENGINE_BLUE_FILL: Self = Self::new(0, 130, 255, 0.7);
    pub const PLAYED_FILL: Self = Self::new(255, 255, 255, 0.3);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColoredCircle {
    pub at: Intersection,
    pub fill: Rgba,
    pub border_width: Option<f32>,
    pub border_color: Option<Rgba>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkKind {
    /// Win-rate delta in percentage points.
    Label(String),
    /// The move actually played next.
    PlayedMove,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Marks {
    pub labels: Vec<(Intersection, MarkKind)>,
    /// Encoded continuation move keyed by ply offset from the branch point.
    pub sequence: BTreeMap<u32, String>,
    pub black: Option<String>,
    pub white: Option<String>,
}

impl Marks {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
            && self.sequence.is_empty()
            && self.black.is_none()
            && self.white.is_none()
    }
}

/// Per-intersection weights, row major. Values may exceed 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    size: BoardSize,
    values: Vec<f64>,
}

impl Heatmap {
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            values: vec![0.0; size.cells()],
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn set(&mut self, at: Intersection, value: f64) -> Result<(), GobanError> {
        let idx = self.size.index_of(at)?;
        self.values[idx] = value;
        Ok(())
    }

    pub fn value(&self, at: Intersection) -> f64 {
        self.size
            .index_of(at)
            .map(|idx| self.values[idx])
            .unwrap_or(0.0)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Anything that can display review annotations.
pub trait BoardSurface {
    fn set_marks(&mut self, marks: &Marks);
    fn set_heatmap(&mut self, heatmap: Option<&Heatmap>);
    fn set_colored_circles(&mut self, circles: &[ColoredCircle]);
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Annotation {
    pub marks: Marks,
    pub heatmap: Option<Heatmap>,
    pub circles: Vec<ColoredCircle>,
    /// Win-rate change caused by the next move, from the mover's side.
    pub delta: Option<f64>,
}

impl Annotation {
    /// Push the overlay to a board. An empty annotation clears it.
    pub fn apply_to<S: BoardSurface + ?Sized>(&self, surface: &mut S) {
        surface.set_marks(&self.marks);
        surface.set_heatmap(self.heatmap.as_ref());
        surface.set_colored_circles(&self.circles);
    }
}

#[derive(Default)]
struct Overlay {
    marks: Marks,
    heatmap: Option<Heatmap>,
    circles: Vec<ColoredCircle>,
}

/// Annotate the node `cursor` of `tree` with the review's analysis.
///
/// Overlay failures are logged and produce an empty overlay; the delta
/// does not depend on the overlay and is always reported when known.
pub fn annotate(
    review: &ReconciledReview,
    tree: &MoveTree,
    cursor: NodeId,
    size: BoardSize,
) -> Annotation {
    let branch = tree.branch_point(cursor);
    let Some(analysis) = review.move_analysis(tree.move_number(branch)) else {
        return Annotation::default();
    };

    let delta = move_delta(analysis, tree.color_to_move(cursor));

    let overlay = if tree.is_trunk(cursor) {
        let played_next = tree.trunk_next(cursor).map(|n| tree.mv(n));
        trunk_overlay(review.review(), analysis, played_next, size)
    } else {
        variation_overlay(analysis, tree, cursor, branch)
    };

    let overlay = overlay.unwrap_or_else(|e| {
        warn!(
            review_id = %review.review().id,
            move_number = analysis.move_number,
            "Dropping review overlay: {}",
            e
        );
        Overlay::default()
    });

    Annotation {
        marks: overlay.marks,
        heatmap: overlay.heatmap,
        circles: overlay.circles,
        delta,
    }
}

/// `post - pre` of the analysis, negated when White is to move.
pub fn move_delta(analysis: &MoveAnalysis, to_move: StoneColor) -> Option<f64> {
    let delta = analysis.post_move_win_rate? - analysis.pre_move_win_rate;
    Some(match to_move {
        StoneColor::Black => delta,
        StoneColor::White => -delta,
    })
}

fn trunk_overlay(
    review: &Review,
    analysis: &MoveAnalysis,
    played_next: Option<Intersection>,
    size: BoardSize,
) -> Result<Overlay, AnnotateError> {
    let mut candidates: Vec<Variation> = analysis.variations.clone();
    if let Some(next) = played_next {
        if !candidates.iter().any(|v| v.mv == next) {
            candidates.push(Variation {
                mv: next,
                post_move_win_rate: analysis
                    .post_move_win_rate
                    .unwrap_or(analysis.pre_move_win_rate),
                visits: 0,
                followup_moves: Vec::new(),
            });
        }
    }

    let strength = review.strength.max(1) as f64;
    let label_visits = MIN_LABEL_VISITS.min(0.1 * strength);

    let mut overlay = Overlay {
        heatmap: Some(Heatmap::new(size)),
        ..Default::default()
    };
    let mut circles: SmallVec<[ColoredCircle; 2]> = SmallVec::new();

    for (i, candidate) in candidates.iter().enumerate() {
        if candidate.mv.is_pass() {
            continue;
        }
        if let Some(heatmap) = overlay.heatmap.as_mut() {
            heatmap.set(candidate.mv, candidate.visits as f64 / strength)?;
        }

        let is_played = played_next == Some(candidate.mv);
        if candidate.followup_moves.is_empty() && !is_played {
            continue;
        }

        let delta = match (is_played, analysis.post_move_win_rate) {
            (true, Some(post)) => Some(analysis.pre_move_win_rate - post),
            (true, None) if i >= analysis.variations.len() => None,
            _ => Some(candidate.post_move_win_rate - analysis.pre_move_win_rate),
        };

        let explored = i == 0 || is_played || candidate.visits as f64 >= label_visits;
        if let (true, Some(delta)) = (explored, delta) {
            overlay
                .marks
                .labels
                .push((candidate.mv, MarkKind::Label(delta_label(delta))));
        }

        if is_played {
            overlay.marks.labels.push((candidate.mv, MarkKind::PlayedMove));
            circles.push(ColoredCircle {
                at: candidate.mv,
                fill: if i == 0 {
                    Rgba::ENGINE_BLUE_FILL
                } else {
                    Rgba::PLAYED_FILL
                },
                border_width: Some(0.1),
                border_color: Some(Rgba::BLACK),
            });
        } else if i == 0 {
            circles.push(ColoredCircle {
                at: candidate.mv,
                fill: Rgba::ENGINE_BLUE_FILL,
                border_width: Some(0.2),
                border_color: Some(Rgba::ENGINE_BLUE),
            });
        }
    }

    overlay.circles = circles.into_vec();
    Ok(overlay)
}

fn variation_overlay(
    analysis: &MoveAnalysis,
    tree: &MoveTree,
    cursor: NodeId,
    branch: NodeId,
) -> Result<Overlay, AnnotateError> {
    let trunk_string = tree.move_string_to(branch);
    let cursor_string = tree.move_string_to(cursor);

    let continuation = analysis.variations.iter().find_map(|v| {
        let line = format!("{}{}", trunk_string, encode_moves(&v.followup_moves));
        line.strip_prefix(cursor_string.as_str())
            .map(str::to_string)
    });

    let mut overlay = Overlay::default();
    let Some(continuation) = continuation.filter(|c| !c.is_empty()) else {
        return Ok(overlay);
    };

    let moves = decode_moves(&continuation).map_err(AnnotateError::Continuation)?;
    let offset = tree.distance(cursor, branch) + 1;
    let to_move = tree.color_to_move(cursor);

    let mut black = String::new();
    let mut white = String::new();
    for (i, mv) in moves.iter().enumerate() {
        let encoded = encode_move(*mv);
        let color = if i % 2 == 0 { to_move } else { to_move.opponent() };
        match color {
            StoneColor::Black => black.push_str(&encoded),
            StoneColor::White => white.push_str(&encoded),
        }
        overlay.marks.sequence.insert(i as u32 + offset, encoded);
    }
    overlay.marks.black = Some(black).filter(|s| !s.is_empty());
    overlay.marks.white = Some(white).filter(|s| !s.is_empty());

    Ok(overlay)
}

/// Percentage-point label for a win-rate delta.
///
/// One decimal place, with `0.0` and `-0.0` shown as `0`. Two significant
/// digits are used instead whenever that is shorter, so `12.3` becomes `12`.
pub fn delta_label(delta: f64) -> String {
    let key = format!("{:.1}", delta * 100.0);
    if key == "0.0" || key == "-0.0" {
        return "0".to_string();
    }
    match key.parse::<f64>() {
        Ok(value) => {
            let short = two_significant_digits(value);
            if short.len() < key.len() {
                short
            } else {
                key
            }
        }
        Err(_) => key,
    }
}

fn two_significant_digits(value: f64) -> String {
    if value == 0.0 {
        return "0.0".to_string();
    }
    let mut exponent = value.abs().log10().floor() as i32;
    let mut mantissa = (value / 10f64.powi(exponent) * 10.0).round() / 10.0;
    if mantissa.abs() >= 10.0 {
        exponent += 1;
        mantissa /= 10.0;
    }

    if !(-6..2).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{:.1}e{}{}", mantissa, sign, exponent.abs());
    }
    let decimals = (1 - exponent) as usize;
    format!("{:.*}", decimals, mantissa * 10f64.powi(exponent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::reconcile;
    use crate::types::ReviewType;
    use std::collections::BTreeMap;

    const SIZE: BoardSize = BoardSize::square(9);

    fn at(x: i32, y: i32) -> Intersection {
        Intersection::new(x, y)
    }

    fn variation(mv: Intersection, post: f64, visits: u32, followups: &[Intersection]) -> Variation {
        Variation {
            mv,
            post_move_win_rate: post,
            visits,
            followup_moves: followups.to_vec(),
        }
    }

    /// Trunk: black (2,2), white (6,6), black (2,6).
    fn tree() -> MoveTree {
        MoveTree::from_trunk(
            SIZE,
            StoneColor::Black,
            &[at(2, 2), at(6, 6), at(2, 6)],
        )
    }

    fn review(moves: Vec<MoveAnalysis>, strength: u32) -> ReconciledReview {
        reconcile(Review {
            id: "r".into(),
            review_type: ReviewType::Full,
            strength,
            moves: moves
                .into_iter()
                .map(|m| (m.move_number, m))
                .collect::<BTreeMap<_, _>>(),
            ..Default::default()
        })
    }

    fn analysis(move_number: u32, pre: f64, variations: Vec<Variation>) -> MoveAnalysis {
        MoveAnalysis {
            move_number,
            pre_move_win_rate: pre,
            variations,
            ..Default::default()
        }
    }

    struct RecordingBoard {
        marks: Option<Marks>,
        heatmap: Option<Option<Heatmap>>,
        circles: Option<Vec<ColoredCircle>>,
    }

    impl BoardSurface for RecordingBoard {
        fn set_marks(&mut self, marks: &Marks) {
            self.marks = Some(marks.clone());
        }
        fn set_heatmap(&mut self, heatmap: Option<&Heatmap>) {
            self.heatmap = Some(heatmap.cloned());
        }
        fn set_colored_circles(&mut self, circles: &[ColoredCircle]) {
            self.circles = Some(circles.to_vec());
        }
    }

    #[test]
    fn trunk_heatmap_is_normalised_by_strength() {
        let tree = tree();
        let review = review(
            vec![
                analysis(
                    1,
                    0.5,
                    vec![
                        variation(at(6, 6), 0.52, 800, &[at(6, 6), at(5, 5)]),
                        variation(at(4, 4), 0.40, 400, &[]),
                    ],
                ),
                analysis(2, 0.45, vec![]),
            ],
            400,
        );

        let annotation = annotate(&review, &tree, tree.trunk_node(1), SIZE);
        let heatmap = annotation.heatmap.unwrap();
        assert_eq!(heatmap.value(at(6, 6)), 2.0);
        assert_eq!(heatmap.value(at(4, 4)), 1.0);
        assert_eq!(heatmap.value(at(0, 0)), 0.0);
    }

    #[test]
    fn played_top_choice_gets_blue_circle_and_pre_minus_post_label() {
        let tree = tree();
        let review = review(
            vec![
                analysis(
                    1,
                    0.5,
                    vec![variation(at(6, 6), 0.52, 800, &[at(6, 6)])],
                ),
                analysis(2, 0.45, vec![]),
            ],
            1600,
        );

        let annotation = annotate(&review, &tree, tree.trunk_node(1), SIZE);
        assert_eq!(annotation.circles.len(), 1);
        let circle = &annotation.circles[0];
        assert_eq!(circle.at, at(6, 6));
        assert_eq!(circle.fill, Rgba::ENGINE_BLUE_FILL);
        assert_eq!(circle.border_width, Some(0.1));
        assert!(annotation
            .marks
            .labels
            .contains(&(at(6, 6), MarkKind::Label("5.0".into()))));
        assert!(annotation
            .marks
            .labels
            .contains(&(at(6, 6), MarkKind::PlayedMove)));
    }

    #[test]
    fn unlisted_played_move_is_added_with_translucent_circle() {
        let tree = tree();
        let review = review(
            vec![
                analysis(
                    1,
                    0.5,
                    vec![variation(at(4, 4), 0.55, 900, &[at(4, 4), at(3, 4)])],
                ),
                analysis(2, 0.38, vec![]),
            ],
            1600,
        );

        let annotation = annotate(&review, &tree, tree.trunk_node(1), SIZE);
        let top = annotation.circles.iter().find(|c| c.at == at(4, 4)).unwrap();
        assert_eq!(top.border_width, Some(0.2));
        assert_eq!(top.border_color, Some(Rgba::ENGINE_BLUE));

        let played = annotation.circles.iter().find(|c| c.at == at(6, 6)).unwrap();
        assert_eq!(played.fill, Rgba::PLAYED_FILL);

        // Candidate: 0.55 - 0.5; played: 0.5 - 0.38.
        assert!(annotation
            .marks
            .labels
            .contains(&(at(4, 4), MarkKind::Label("5.0".into()))));
        assert!(annotation
            .marks
            .labels
            .contains(&(at(6, 6), MarkKind::Label("12".into()))));
    }

    #[test]
    fn shallow_candidates_get_no_label() {
        let tree = tree();
        let review = review(
            vec![analysis(
                1,
                0.5,
                vec![
                    variation(at(6, 6), 0.5, 900, &[at(6, 6)]),
                    variation(at(1, 1), 0.3, 10, &[at(1, 1)]),
                    variation(at(7, 7), 0.4, 60, &[at(7, 7)]),
                ],
            )],
            1000,
        );
        let annotation = annotate(&review, &tree, tree.trunk_node(1), SIZE);
        let labelled: Vec<Intersection> = annotation
            .marks
            .labels
            .iter()
            .filter(|(_, k)| matches!(k, MarkKind::Label(_)))
            .map(|(at, _)| *at)
            .collect();
        assert!(labelled.contains(&at(7, 7)));
        assert!(!labelled.contains(&at(1, 1)));
    }

    #[test]
    fn off_board_candidate_degrades_to_empty_overlay_but_keeps_delta() {
        let tree = tree();
        let review = review(
            vec![
                analysis(1, 0.5, vec![variation(at(12, 3), 0.5, 10, &[])]),
                analysis(2, 0.4, vec![]),
            ],
            100,
        );

        let annotation = annotate(&review, &tree, tree.trunk_node(1), SIZE);
        assert!(annotation.marks.is_empty());
        assert!(annotation.heatmap.is_none());
        assert!(annotation.circles.is_empty());
        // White to move after move 1: 0.4 - 0.5 negated.
        let delta = annotation.delta.unwrap();
        assert!((delta - 0.1).abs() < 1e-9);
    }

    #[test]
    fn unanalyzed_move_yields_empty_annotation() {
        let tree = tree();
        let review = review(vec![analysis(2, 0.5, vec![])], 100);
        let annotation = annotate(&review, &tree, tree.trunk_node(1), SIZE);
        assert_eq!(annotation, Annotation::default());
    }

    #[test]
    fn variation_shows_engine_continuation() {
        let mut tree = tree();
        let branch = tree.trunk_node(1);
        let cursor = tree.play(branch, at(4, 4));
        let review = review(
            vec![analysis(
                1,
                0.5,
                vec![
                    variation(at(5, 5), 0.5, 500, &[at(5, 5), at(5, 6)]),
                    variation(at(4, 4), 0.5, 400, &[at(4, 4), at(3, 4), at(4, 3)]),
                ],
            )],
            1000,
        );

        let annotation = annotate(&review, &tree, cursor, SIZE);
        let marks = annotation.marks;
        // Cursor is one step below the branch, so continuation starts at offset 2.
        assert_eq!(marks.sequence.get(&2).map(String::as_str), Some("de"));
        assert_eq!(marks.sequence.get(&3).map(String::as_str), Some("ed"));
        // Black is to move after the cursor's two moves.
        assert_eq!(marks.black.as_deref(), Some("de"));
        assert_eq!(marks.white.as_deref(), Some("ed"));
        assert!(annotation.heatmap.is_none());
    }

    #[test]
    fn variation_without_matching_line_has_no_marks() {
        let mut tree = tree();
        let branch = tree.trunk_node(1);
        let cursor = tree.play(branch, at(0, 8));
        let review = review(
            vec![analysis(1, 0.5, vec![variation(at(5, 5), 0.5, 500, &[at(5, 5)])])],
            1000,
        );
        let annotation = annotate(&review, &tree, cursor, SIZE);
        assert!(annotation.marks.is_empty());
    }

    #[test]
    fn apply_to_pushes_every_layer() {
        let mut board = RecordingBoard {
            marks: None,
            heatmap: None,
            circles: None,
        };
        Annotation::default().apply_to(&mut board);
        assert_eq!(board.marks, Some(Marks::default()));
        assert_eq!(board.heatmap, Some(None));
        assert_eq!(board.circles, Some(vec![]));
    }

    #[test]
    fn delta_is_negated_for_white_to_move() {
        let mut a = analysis(1, 0.5, vec![]);
        a.post_move_win_rate = Some(0.6);
        assert!((move_delta(&a, StoneColor::Black).unwrap() - 0.1).abs() < 1e-9);
        assert!((move_delta(&a, StoneColor::White).unwrap() + 0.1).abs() < 1e-9);
        a.post_move_win_rate = None;
        assert_eq!(move_delta(&a, StoneColor::Black), None);
    }

    #[test]
    fn delta_labels() {
        assert_eq!(delta_label(0.0004), "0");
        assert_eq!(delta_label(-0.0004), "0");
        assert_eq!(delta_label(0.054), "5.4");
        assert_eq!(delta_label(0.123), "12");
        assert_eq!(delta_label(-0.2), "-20");
        assert_eq!(delta_label(1.234), "123.4");
    }
}
