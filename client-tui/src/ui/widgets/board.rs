use goban::{decode_moves, BoardSize, Intersection, Position, StoneColor};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};
use review::{BoardSurface, ColoredCircle, Heatmap, MarkKind, Marks};

use crate::ui::theme::Theme;

const CELL_WIDTH: u16 = 3;
const ROW_LABEL_WIDTH: u16 = 3;
const COLUMN_LETTERS: &str = "ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Review annotations as last pushed to the board.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BoardOverlay {
    marks: Marks,
    heatmap: Option<Heatmap>,
    circles: Vec<ColoredCircle>,
}

impl BoardSurface for BoardOverlay {
    fn set_marks(&mut self, marks: &Marks) {
        self.marks = marks.clone();
    }

    fn set_heatmap(&mut self, heatmap: Option<&Heatmap>) {
        self.heatmap = heatmap.cloned();
    }

    fn set_colored_circles(&mut self, circles: &[ColoredCircle]) {
        self.circles = circles.to_vec();
    }
}

impl BoardOverlay {
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty() && self.heatmap.is_none() && self.circles.is_empty()
    }

    fn label_at(&self, at: Intersection) -> Option<&str> {
        self.marks.labels.iter().find_map(|(pos, kind)| match kind {
            MarkKind::Label(text) if *pos == at => Some(text.as_str()),
            _ => None,
        })
    }

    fn is_played(&self, at: Intersection) -> bool {
        self.marks
            .labels
            .iter()
            .any(|(pos, kind)| *pos == at && *kind == MarkKind::PlayedMove)
    }

    fn circle_at(&self, at: Intersection) -> Option<&ColoredCircle> {
        self.circles.iter().find(|c| c.at == at)
    }

    /// Continuation stones as `(ply offset, intersection, color)`.
    fn sequence(&self) -> Vec<(u32, Intersection, Option<StoneColor>)> {
        let black = self.decoded(self.marks.black.as_deref());
        let white = self.decoded(self.marks.white.as_deref());
        self.marks
            .sequence
            .iter()
            .filter_map(|(ply, encoded)| {
                let at = *decode_moves(encoded).ok()?.first()?;
                let color = if black.contains(&at) {
                    Some(StoneColor::Black)
                } else if white.contains(&at) {
                    Some(StoneColor::White)
                } else {
                    None
                };
                Some((*ply, at, color))
            })
            .collect()
    }

    fn decoded(&self, moves: Option<&str>) -> Vec<Intersection> {
        moves
            .and_then(|m| decode_moves(m).ok())
            .unwrap_or_default()
    }
}

/// Maps intersections to terminal cells and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    origin_x: u16,
    origin_y: u16,
    size: BoardSize,
}

impl BoardGeometry {
    /// Geometry of a board rendered into `area` (including its border).
    pub fn new(area: Rect, size: BoardSize) -> Self {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        Self {
            origin_x: inner.x + ROW_LABEL_WIDTH,
            origin_y: inner.y + 1,
            size,
        }
    }

    /// Terminal size needed to show the whole board.
    pub fn required(size: BoardSize) -> (u16, u16) {
        (
            u16::from(size.width) * CELL_WIDTH + ROW_LABEL_WIDTH + 2,
            u16::from(size.height) + 4,
        )
    }

    fn cell(&self, at: Intersection) -> (u16, u16) {
        (
            self.origin_x + at.x as u16 * CELL_WIDTH,
            self.origin_y + at.y as u16,
        )
    }

    /// Intersection under a terminal cell, if any.
    pub fn intersection_at(&self, column: u16, row: u16) -> Option<Intersection> {
        let dx = column.checked_sub(self.origin_x)?;
        let dy = row.checked_sub(self.origin_y)?;
        let at = Intersection::new(i32::from(dx / CELL_WIDTH), i32::from(dy));
        self.size.contains(at).then_some(at)
    }
}

pub struct BoardWidget<'a> {
    pub position: &'a Position,
    pub overlay: &'a BoardOverlay,
    pub last_move: Option<Intersection>,
    pub theme: &'a Theme,
    pub title: &'a str,
}

impl Widget for BoardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.panel_border));
        let inner = block.inner(area);
        block.render(area, buf);

        let size = self.position.size();
        let geometry = BoardGeometry::new(area, size);
        let (need_w, need_h) = BoardGeometry::required(size);
        if area.width < need_w || area.height < need_h {
            buf.set_string(
                inner.x,
                inner.y,
                "Terminal too small for the board",
                Style::default().fg(self.theme.warning),
            );
            return;
        }

        self.render_labels(&geometry, inner, buf);

        let heat_max = self.overlay.heatmap.as_ref().map(Heatmap::max).unwrap_or(0.0);
        let sequence = self.overlay.sequence();

        for y in 0..i32::from(size.height) {
            for x in 0..i32::from(size.width) {
                let at = Intersection::new(x, y);
                let (cx, cy) = geometry.cell(at);

                let mut bg = self.theme.board_bg;
                if let Some(heatmap) = &self.overlay.heatmap {
                    let value = heatmap.value(at);
                    if value > 0.0 && heat_max > 0.0 {
                        bg = self.theme.heat(value / heat_max);
                    }
                }
                let circle = self.overlay.circle_at(at);
                if let Some(circle) = circle {
                    bg = self.theme.on_board(circle.fill);
                }

                let base = Style::default().bg(bg);
                buf.set_string(cx, cy, "   ", base);

                if let Some(circle) = circle.filter(|c| c.border_width.is_some()) {
                    let border = circle
                        .border_color
                        .map(|c| self.theme.on_board(c))
                        .unwrap_or(self.theme.grid_line);
                    let style = base.fg(border);
                    buf.set_string(cx, cy, "[", style);
                    buf.set_string(cx + 2, cy, "]", style);
                }

                // Glyphs sit in the middle column; longer labels use the whole cell.
                let (text, style) = self.intersection_glyph(at, size, &sequence);
                let text: String = text.chars().take(CELL_WIDTH as usize).collect();
                let offset = match text.chars().count() {
                    1 => 1,
                    n => (CELL_WIDTH - n as u16) / 2,
                };
                buf.set_string(cx + offset, cy, text, base.patch(style));
            }
        }
    }
}

impl BoardWidget<'_> {
    fn render_labels(&self, geometry: &BoardGeometry, inner: Rect, buf: &mut Buffer) {
        let size = self.position.size();
        let style = Style::default().fg(self.theme.board_label);
        for (x, letter) in COLUMN_LETTERS.chars().take(size.width as usize).enumerate() {
            let (cx, _) = geometry.cell(Intersection::new(x as i32, 0));
            buf.set_string(cx + 1, inner.y, letter.to_string(), style);
        }
        for y in 0..size.height {
            let (_, cy) = geometry.cell(Intersection::new(0, i32::from(y)));
            let row = size.height - y;
            buf.set_string(inner.x, cy, format!("{row:>2}"), style);
        }
    }

    fn intersection_glyph(
        &self,
        at: Intersection,
        size: BoardSize,
        sequence: &[(u32, Intersection, Option<StoneColor>)],
    ) -> (String, Style) {
        let stone = self.position.stone_at(at);

        if stone.is_none() {
            if let Some((ply, _, color)) = sequence.iter().find(|(_, pos, _)| *pos == at) {
                let fg = match color {
                    Some(StoneColor::Black) => self.theme.black_stone,
                    Some(StoneColor::White) => self.theme.white_stone,
                    None => self.theme.sequence_label,
                };
                return (
                    ply.to_string(),
                    Style::default().fg(fg).add_modifier(Modifier::BOLD),
                );
            }
            if let Some(label) = self.overlay.label_at(at) {
                let fg = if self.overlay.is_played(at) {
                    self.theme.played_mark
                } else {
                    self.theme.candidate_label
                };
                return (label.to_string(), Style::default().fg(fg).add_modifier(Modifier::BOLD));
            }
            if self.overlay.is_played(at) {
                return ("\u{25c6}".to_string(), Style::default().fg(self.theme.played_mark));
            }
        }

        match stone {
            Some(color) => {
                let fg = match color {
                    StoneColor::Black => self.theme.black_stone,
                    StoneColor::White => self.theme.white_stone,
                };
                let mut style = Style::default().fg(fg);
                if self.last_move == Some(at) {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                ("\u{25cf}".to_string(), style)
            }
            None if is_star_point(at, size) => (
                "\u{2022}".to_string(),
                Style::default().fg(self.theme.star_point),
            ),
            None => ("\u{00b7}".to_string(), Style::default().fg(self.theme.grid_line)),
        }
    }
}

fn is_star_point(at: Intersection, size: BoardSize) -> bool {
    let points = |n: u8| -> Vec<i32> {
        let n = i32::from(n);
        match n {
            19 => vec![3, 9, 15],
            13 => vec![3, 6, 9],
            9 => vec![2, 4, 6],
            _ => Vec::new(),
        }
    };
    points(size.width).contains(&at.x) && points(size.height).contains(&at.y)
}
