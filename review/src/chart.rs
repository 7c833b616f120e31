//! Win-rate chart model: scales, interpolated series and pointer mapping.
//!
//! Rendering is left to the host. The model works in logical plot units
//! (the plot origin is the top-left corner inside the margins) and the
//! host maps those onto whatever surface it draws on.

use std::time::{Duration, Instant};

use crate::reconcile::DisplayEntry;

pub const MARGIN_TOP: f64 = 15.0;
pub const MARGIN_RIGHT: f64 = 5.0;
pub const MARGIN_BOTTOM: f64 = 30.0;
pub const MARGIN_LEFT: f64 = 5.0;

/// Logical plot height.
pub const PLOT_HEIGHT: f64 = 100.0 - MARGIN_TOP - MARGIN_BOTTOM;
/// Plot width before the first resize.
pub const INITIAL_WIDTH: f64 = 600.0 - MARGIN_LEFT - MARGIN_RIGHT;
pub const MIN_PLOT_WIDTH: f64 = 100.0;

pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(10);

/// Interpolated points per segment of the monotone curve.
const CURVE_SAMPLES: usize = 8;

/// Linear mapping from a data domain to a rounded pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0.round();
        }
        (r0 + (value - d0) / (d1 - d0) * (r1 - r0)).round()
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    entries: Vec<DisplayEntry>,
    highlighted: Vec<DisplayEntry>,
    current_move: u32,
    width: f64,
    x: LinearScale,
    y: LinearScale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartState {
    /// Nothing to plot yet. Hosts show a placeholder instead of an empty chart.
    NoData,
    Ready(ChartModel),
}

impl ChartModel {
    /// Build the model for a container of `container_width` logical units.
    pub fn build(
        entries: Vec<DisplayEntry>,
        highlighted: Vec<DisplayEntry>,
        current_move: u32,
        container_width: f64,
    ) -> ChartState {
        let Some(last) = entries.last() else {
            return ChartState::NoData;
        };
        let width = plot_width(container_width);
        let x = LinearScale::new((0.0, last.move_number as f64), (0.0, width));
        let y = LinearScale::new((0.0, 100.0), (PLOT_HEIGHT, 0.0));
        ChartState::Ready(Self {
            entries,
            highlighted,
            current_move,
            width,
            x,
            y,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        PLOT_HEIGHT
    }

    pub fn x(&self) -> &LinearScale {
        &self.x
    }

    pub fn y(&self) -> &LinearScale {
        &self.y
    }

    pub fn entries(&self) -> &[DisplayEntry] {
        &self.entries
    }

    pub fn current_move(&self) -> u32 {
        self.current_move
    }

    pub fn last_move(&self) -> u32 {
        self.entries.last().map(|e| e.move_number).unwrap_or(0)
    }

    /// Entries with their boundary points at move 0 and the last move.
    pub fn series(&self) -> Vec<DisplayEntry> {
        let mut series = Vec::with_capacity(self.entries.len() + 2);
        series.push(DisplayEntry::boundary(0));
        series.extend(self.entries.iter().copied());
        series.push(DisplayEntry::boundary(self.last_move()));
        series
    }

    /// The series in plot coordinates, smoothed with a monotone curve.
    pub fn line(&self) -> Vec<(f64, f64)> {
        let points: Vec<(f64, f64)> = self
            .series()
            .iter()
            .map(|e| self.point(e))
            .collect();
        monotone_curve(&points, CURVE_SAMPLES)
    }

    /// Y coordinate of the 50% baseline the area is filled against.
    pub fn baseline(&self) -> f64 {
        self.y.scale(50.0)
    }

    pub fn point(&self, entry: &DisplayEntry) -> (f64, f64) {
        (
            self.x.scale(entry.move_number as f64),
            self.y.scale(entry.win_rate * 100.0),
        )
    }

    pub fn highlighted_points(&self) -> Vec<(f64, f64)> {
        self.highlighted.iter().map(|e| self.point(e)).collect()
    }

    pub fn cursor_x(&self) -> f64 {
        self.x.scale(self.current_move as f64)
    }

    /// Entry nearest to a pointer x position in plot coordinates.
    ///
    /// Equal distances resolve to the later move. Pointers beyond either
    /// end resolve to the first or last entry.
    pub fn nearest_entry(&self, pointer_x: f64) -> Option<DisplayEntry> {
        let target = self.x.invert(pointer_x);
        let i = self
            .entries
            .partition_point(|e| (e.move_number as f64) < target);

        match (i.checked_sub(1).map(|j| self.entries[j]), self.entries.get(i).copied()) {
            (Some(before), Some(after)) => {
                let to_before = target - before.move_number as f64;
                let to_after = after.move_number as f64 - target;
                Some(if to_before >= to_after { after } else { before })
            }
            (Some(only), None) | (None, Some(only)) => Some(only),
            (None, None) => None,
        }
    }

    pub fn nearest_move(&self, pointer_x: f64) -> Option<u32> {
        self.nearest_entry(pointer_x).map(|e| e.move_number)
    }
}

fn plot_width(container_width: f64) -> f64 {
    (container_width - MARGIN_LEFT - MARGIN_RIGHT).max(MIN_PLOT_WIDTH)
}

/// Cubic interpolation that preserves monotonicity between points.
///
/// Tangents follow Steffen's method. Runs of strictly increasing x are
/// interpolated independently; a repeated x becomes a vertical step.
pub fn monotone_curve(points: &[(f64, f64)], samples: usize) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    let mut start = 0;
    for i in 1..=points.len() {
        let run_ends = i == points.len() || points[i].0 <= points[i - 1].0;
        if run_ends {
            out.extend(monotone_run(&points[start..i], samples.max(1)));
            start = i;
        }
    }
    out
}

fn monotone_run(points: &[(f64, f64)], samples: usize) -> Vec<(f64, f64)> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let n = points.len();
    let h: Vec<f64> = points.windows(2).map(|w| w[1].0 - w[0].0).collect();
    let s: Vec<f64> = points
        .windows(2)
        .zip(&h)
        .map(|(w, h)| (w[1].1 - w[0].1) / h)
        .collect();

    let mut tangents = vec![0.0; n];
    for i in 1..n - 1 {
        let (s0, s1) = (s[i - 1], s[i]);
        let p = (s0 * h[i] + s1 * h[i - 1]) / (h[i - 1] + h[i]);
        tangents[i] = (s0.signum() + s1.signum()) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
        if s0 == 0.0 || s1 == 0.0 {
            tangents[i] = 0.0;
        }
    }
    tangents[0] = (3.0 * s[0] - tangents[1]) / 2.0;
    tangents[n - 1] = (3.0 * s[n - 2] - tangents[n - 2]) / 2.0;

    let mut out = Vec::with_capacity((n - 1) * samples + 1);
    out.push(points[0]);
    for i in 0..n - 1 {
        let (x0, y0) = points[i];
        let (x1, y1) = points[i + 1];
        let dx = h[i];
        for k in 1..=samples {
            let t = k as f64 / samples as f64;
            let t2 = t * t;
            let t3 = t2 * t;
            let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
            let h10 = t3 - 2.0 * t2 + t;
            let h01 = -2.0 * t3 + 3.0 * t2;
            let h11 = t3 - t2;
            let y = h00 * y0 + h10 * dx * tangents[i] + h01 * y1 + h11 * dx * tangents[i + 1];
            out.push((x0 + t * (x1 - x0), y));
        }
    }
    out
}

/// Recomputes the chart only when its inputs change.
///
/// Entries are compared by value; the current move and width by equality.
#[derive(Debug)]
pub struct ChartPresenter {
    entries: Vec<DisplayEntry>,
    highlighted: Vec<DisplayEntry>,
    current_move: u32,
    container_width: f64,
    state: ChartState,
}

impl Default for ChartPresenter {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            highlighted: Vec::new(),
            current_move: 0,
            container_width: INITIAL_WIDTH + MARGIN_LEFT + MARGIN_RIGHT,
            state: ChartState::NoData,
        }
    }
}

impl ChartPresenter {
    pub fn state(&self) -> &ChartState {
        &self.state
    }

    /// Returns `true` when the model was rebuilt.
    pub fn update(
        &mut self,
        entries: &[DisplayEntry],
        highlighted: &[DisplayEntry],
        current_move: u32,
    ) -> bool {
        if self.entries == entries
            && self.highlighted == highlighted
            && self.current_move == current_move
            && !matches!(self.state, ChartState::NoData if !entries.is_empty())
        {
            return false;
        }
        self.entries = entries.to_vec();
        self.highlighted = highlighted.to_vec();
        self.current_move = current_move;
        self.rebuild();
        true
    }

    pub fn resize(&mut self, container_width: f64) {
        if self.container_width != container_width {
            self.container_width = container_width;
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        self.state = ChartModel::build(
            self.entries.clone(),
            self.highlighted.clone(),
            self.current_move,
            self.container_width,
        );
    }
}

/// Pointer interaction on the chart.
///
/// Hovering only moves the crosshair. Pressing selects the nearest move;
/// dragging while pressed selects again only when the nearest move
/// changes.
#[derive(Debug, Default)]
pub struct ChartCursor {
    pressed: bool,
    last_move: Option<u32>,
    hover: Option<DisplayEntry>,
}

impl ChartCursor {
    pub fn hover(&self) -> Option<DisplayEntry> {
        self.hover
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn press(&mut self, model: &ChartModel, pointer_x: f64) -> Option<u32> {
        self.pressed = true;
        self.last_move = None;
        self.hover = model.nearest_entry(pointer_x);
        let mv = self.hover?.move_number;
        self.last_move = Some(mv);
        Some(mv)
    }

    pub fn moved(&mut self, model: &ChartModel, pointer_x: f64) -> Option<u32> {
        self.hover = model.nearest_entry(pointer_x);
        let mv = self.hover?.move_number;
        if self.pressed && self.last_move != Some(mv) {
            self.last_move = Some(mv);
            return Some(mv);
        }
        None
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    pub fn leave(&mut self) {
        self.pressed = false;
        self.hover = None;
    }
}

/// Coalesces bursts of resize events.
#[derive(Debug)]
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<(f64, Instant)>,
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE)
    }
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a resize; any earlier pending width is replaced.
    pub fn request(&mut self, width: f64, now: Instant) {
        self.pending = Some((width, now + self.delay));
    }

    /// The width to apply, once the delay has passed without new requests.
    pub fn poll(&mut self, now: Instant) -> Option<f64> {
        match self.pending {
            Some((width, deadline)) if now >= deadline => {
                self.pending = None;
                Some(width)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
