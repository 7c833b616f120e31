use ratatui::style::Color;
use review::Rgba;

/// All colors used by the TUI, grouped by purpose.
/// Swap between presets (Dark / Light) to adapt to the terminal background.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    // ── Board ──────────────────────────────────────────────────────
    pub board_bg: Color,
    pub grid_line: Color,
    pub star_point: Color,
    pub black_stone: Color,
    pub white_stone: Color,
    pub board_label: Color,

    // ── Overlays ──────────────────────────────────────────────────
    /// Heatmap background at weight 0 and at the strongest candidate.
    pub heatmap: (Color, Color),
    pub candidate_label: Color,
    pub played_mark: Color,
    pub sequence_label: Color,

    // ── Panel chrome ──────────────────────────────────────────────
    pub panel_border: Color,
    pub panel_border_selected: Color,
    pub panel_border_dimmed: Color,

    // ── Semantic status ───────────────────────────────────────────
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub info: Color,
    pub muted: Color,

    // ── Text ──────────────────────────────────────────────────────
    pub text_primary: Color,
    pub text_secondary: Color,

    // ── Win-rate chart ────────────────────────────────────────────
    pub chart_black: Color,
    pub chart_white: Color,
    pub chart_line: Color,
    pub chart_baseline: Color,
    pub chart_cursor: Color,
    pub chart_highlight: Color,
}

impl Theme {
    /// Designed for terminals with a dark background.
    pub fn dark() -> Self {
        Self {
            board_bg: Color::Rgb(205, 160, 90),
            grid_line: Color::Rgb(90, 60, 30),
            star_point: Color::Rgb(60, 40, 20),
            black_stone: Color::Rgb(0, 0, 0),
            white_stone: Color::Rgb(255, 255, 255),
            board_label: Color::Yellow,

            heatmap: (Color::Rgb(205, 160, 90), Color::Rgb(0, 130, 255)),
            candidate_label: Color::Rgb(20, 20, 20),
            played_mark: Color::Rgb(200, 30, 30),
            sequence_label: Color::Rgb(0, 90, 200),

            panel_border: Color::Cyan,
            panel_border_selected: Color::Yellow,
            panel_border_dimmed: Color::DarkGray,

            positive: Color::Green,
            negative: Color::Red,
            warning: Color::Yellow,
            info: Color::Cyan,
            muted: Color::DarkGray,

            text_primary: Color::White,
            text_secondary: Color::Gray,

            chart_black: Color::Rgb(40, 40, 40),
            chart_white: Color::Rgb(220, 220, 220),
            chart_line: Color::Rgb(0, 130, 255),
            chart_baseline: Color::DarkGray,
            chart_cursor: Color::Yellow,
            chart_highlight: Color::Red,
        }
    }

    /// Designed for terminals with a light background.
    pub fn light() -> Self {
        Self {
            board_bg: Color::Rgb(225, 185, 120),
            grid_line: Color::Rgb(70, 45, 20),
            star_point: Color::Rgb(40, 25, 10),
            black_stone: Color::Rgb(0, 0, 0),
            white_stone: Color::Rgb(255, 255, 255),
            board_label: Color::Rgb(120, 90, 20),

            heatmap: (Color::Rgb(225, 185, 120), Color::Rgb(0, 110, 230)),
            candidate_label: Color::Rgb(0, 0, 0),
            played_mark: Color::Rgb(180, 20, 20),
            sequence_label: Color::Rgb(0, 70, 170),

            panel_border: Color::Rgb(30, 110, 140),
            panel_border_selected: Color::Rgb(160, 130, 30),
            panel_border_dimmed: Color::Rgb(170, 170, 170),

            positive: Color::Rgb(30, 140, 30),
            negative: Color::Rgb(200, 40, 40),
            warning: Color::Rgb(180, 140, 0),
            info: Color::Rgb(30, 110, 140),
            muted: Color::Rgb(150, 150, 150),

            text_primary: Color::Rgb(30, 30, 30),
            text_secondary: Color::Rgb(100, 100, 100),

            chart_black: Color::Rgb(60, 60, 60),
            chart_white: Color::Rgb(235, 235, 235),
            chart_line: Color::Rgb(0, 110, 230),
            chart_baseline: Color::Rgb(150, 150, 150),
            chart_cursor: Color::Rgb(160, 130, 30),
            chart_highlight: Color::Rgb(200, 40, 40),
        }
    }

    pub fn from_preference(pref: Option<&str>) -> Self {
        match pref {
            Some("light") => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn toggle(&mut self) {
        *self = if self.is_dark() {
            Self::light()
        } else {
            Self::dark()
        };
    }

    pub fn is_dark(&self) -> bool {
        self.text_primary == Color::White
    }

    pub fn name(&self) -> &'static str {
        if self.is_dark() {
            "Dark"
        } else {
            "Light"
        }
    }

    /// Heatmap background for a weight relative to the strongest candidate.
    pub fn heat(&self, weight: f64) -> Color {
        blend(self.heatmap.0, self.heatmap.1, weight.clamp(0.0, 1.0))
    }

    /// Composite an overlay color onto the board background.
    pub fn on_board(&self, color: Rgba) -> Color {
        blend(
            self.board_bg,
            Color::Rgb(color.r, color.g, color.b),
            f64::from(color.a),
        )
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

fn blend(from: Color, to: Color, t: f64) -> Color {
    match (from, to) {
        (Color::Rgb(r0, g0, b0), Color::Rgb(r1, g1, b1)) => {
            let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
            Color::Rgb(mix(r0, r1), mix(g0, g1), mix(b0, b1))
        }
        _ if t >= 0.5 => to,
        _ => from,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_theme_is_dark() {
        let theme = Theme::dark();
        assert!(theme.is_dark());
        assert_eq!(theme.name(), "Dark");
    }

    #[test]
    fn light_theme_is_not_dark() {
        let theme = Theme::light();
        assert!(!theme.is_dark());
        assert_eq!(theme.name(), "Light");
    }

    #[test]
    fn toggle_switches_presets() {
        let mut theme = Theme::dark();
        theme.toggle();
        assert_eq!(theme, Theme::light());
        theme.toggle();
        assert_eq!(theme, Theme::dark());
    }

    #[test]
    fn preference_defaults_to_dark() {
        assert!(Theme::from_preference(None).is_dark());
        assert!(Theme::from_preference(Some("solarized")).is_dark());
        assert!(!Theme::from_preference(Some("light")).is_dark());
    }

    #[test]
    fn heat_runs_from_board_to_highlight() {
        let theme = Theme::dark();
        assert_eq!(theme.heat(0.0), theme.heatmap.0);
        assert_eq!(theme.heat(1.0), theme.heatmap.1);
        // weights above one are clamped
        assert_eq!(theme.heat(3.5), theme.heatmap.1);
    }

    #[test]
    fn transparent_overlay_keeps_board_color() {
        let theme = Theme::dark();
        assert_eq!(theme.on_board(Rgba::TRANSPARENT), theme.board_bg);
        assert_eq!(
            theme.on_board(Rgba::ENGINE_BLUE),
            Color::Rgb(0, 130, 255)
        );
    }
}
