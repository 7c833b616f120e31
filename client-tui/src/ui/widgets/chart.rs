use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};
use review::{ChartModel, ChartState, DisplayEntry};

use crate::ui::theme::Theme;

/// Chart units per terminal column.
const UNITS_PER_COLUMN: f64 = 8.0;

/// Maps terminal cells to chart coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartGeometry {
    inner: Rect,
}

impl ChartGeometry {
    pub fn new(area: Rect) -> Self {
        Self {
            inner: Block::default().borders(Borders::ALL).inner(area),
        }
    }

    /// Container width, in chart units, for a chart drawn in this area.
    pub fn container_width(&self) -> f64 {
        f64::from(self.inner.width) * UNITS_PER_COLUMN
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.inner.x
            && column < self.inner.x + self.inner.width
            && row >= self.inner.y
            && row < self.inner.y + self.inner.height
    }

    /// Pointer position in plot coordinates for a terminal column.
    pub fn pointer_x(&self, model: &ChartModel, column: u16) -> f64 {
        let span = f64::from(self.inner.width.max(1));
        let offset = f64::from(column.saturating_sub(self.inner.x)) + 0.5;
        (offset / span * model.width()).clamp(0.0, model.width())
    }

    fn column_of(&self, model: &ChartModel, plot_x: f64) -> u16 {
        let span = f64::from(self.inner.width.max(1));
        let col = (plot_x / model.width() * span).floor() as u16;
        self.inner.x + col.min(self.inner.width.saturating_sub(1))
    }

    fn row_of(&self, model: &ChartModel, plot_y: f64) -> u16 {
        let span = f64::from(self.inner.height.saturating_sub(1));
        let row = (plot_y / model.height() * span).round() as u16;
        self.inner.y + row.min(self.inner.height.saturating_sub(1))
    }
}

pub struct WinRateChart<'a> {
    pub state: &'a ChartState,
    pub hover: Option<DisplayEntry>,
    pub theme: &'a Theme,
    pub focused: bool,
}

impl Widget for WinRateChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.hover {
            Some(entry) => format!(
                " Win rate: move {}, {:.1}% ",
                entry.move_number,
                entry.win_rate * 100.0
            ),
            None => " Win rate ".to_string(),
        };
        let border = if self.focused {
            self.theme.panel_border_selected
        } else {
            self.theme.panel_border
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let model = match self.state {
            ChartState::Ready(model) => model,
            ChartState::NoData => {
                let text = "No analysis yet";
                let x = inner.x + inner.width.saturating_sub(text.len() as u16) / 2;
                let y = inner.y + inner.height / 2;
                buf.set_string(x, y, text, Style::default().fg(self.theme.muted));
                return;
            }
        };

        let geometry = ChartGeometry::new(area);
        let line = model.line();
        let baseline_row = geometry.row_of(model, model.baseline());

        for column in inner.x..inner.x + inner.width {
            let plot_x = geometry.pointer_x(model, column);
            let Some(plot_y) = sample(&line, plot_x) else {
                continue;
            };
            let line_row = geometry.row_of(model, plot_y);

            // Black's share above the baseline, White's below.
            let (top, bottom, fill) = if line_row <= baseline_row {
                (line_row, baseline_row, self.theme.chart_black)
            } else {
                (baseline_row, line_row, self.theme.chart_white)
            };
            for row in top..=bottom {
                buf.set_string(column, row, "\u{2591}", Style::default().fg(fill));
            }
            buf.set_string(
                column,
                baseline_row,
                "\u{2500}",
                Style::default().fg(self.theme.chart_baseline),
            );
            buf.set_string(
                column,
                line_row,
                "\u{2022}",
                Style::default().fg(self.theme.chart_line),
            );
        }

        for (x, y) in model.highlighted_points() {
            buf.set_string(
                geometry.column_of(model, x),
                geometry.row_of(model, y),
                "\u{25c6}",
                Style::default().fg(self.theme.chart_highlight),
            );
        }

        let cursor_column = geometry.column_of(model, model.cursor_x());
        for row in inner.y..inner.y + inner.height {
            buf.set_string(
                cursor_column,
                row,
                "\u{2502}",
                Style::default()
                    .fg(self.theme.chart_cursor)
                    .add_modifier(Modifier::BOLD),
            );
        }

        if let Some(entry) = self.hover {
            let (x, y) = model.point(&entry);
            buf.set_string(
                geometry.column_of(model, x),
                geometry.row_of(model, y),
                "\u{25cb}",
                Style::default().fg(self.theme.chart_cursor),
            );
        }
    }
}

/// Linear interpolation of the curve at `x`.
fn sample(line: &[(f64, f64)], x: f64) -> Option<f64> {
    let (first, last) = (line.first()?, line.last()?);
    if x <= first.0 {
        return Some(first.1);
    }
    if x >= last.0 {
        return Some(last.1);
    }
    let i = line.partition_point(|p| p.0 < x);
    let (x0, y0) = line[i - 1];
    let (x1, y1) = line[i];
    if x1 <= x0 {
        return Some(y1);
    }
    Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}
