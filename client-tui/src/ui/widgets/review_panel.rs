use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use review::{
    engine_display_name, DeltaDisplay, DeltaTrend, MoveAnalysis, Review, StrengthTier,
    WinRateSplit,
};

use crate::ui::theme::Theme;

pub struct ReviewPanel<'a> {
    pub reviews: &'a [Review],
    pub selected: Option<&'a str>,
    pub analysis: Option<&'a MoveAnalysis>,
    pub move_number: u32,
    pub delta: Option<f64>,
    pub next_move: Option<String>,
    pub loading: bool,
    pub reviewing: bool,
    pub can_request_full: bool,
    pub status: Option<&'a str>,
    pub theme: &'a Theme,
}

impl Widget for ReviewPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" AI Review ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.panel_border));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line<'static>> = Vec::new();

        if self.loading {
            lines.push(Line::from(Span::styled(
                "Loading reviews\u{2026}",
                Style::default().fg(self.theme.muted),
            )));
        } else if self.reviews.is_empty() {
            let text = if self.reviewing {
                "Queueing AI review\u{2026}"
            } else {
                "No AI review for this game"
            };
            lines.push(Line::from(Span::styled(
                text,
                Style::default().fg(self.theme.warning),
            )));
        }

        for review in self.reviews {
            lines.push(self.review_line(review));
        }

        if !self.reviews.is_empty() {
            lines.push(Line::raw(""));
            self.push_move_lines(&mut lines, inner.width);
        }

        if self.can_request_full {
            lines.push(Line::raw(""));
            lines.push(Line::from(vec![
                Span::styled("[f] ", Style::default().fg(self.theme.info)),
                Span::raw("request full review"),
            ]));
        }

        if let Some(status) = self.status {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                status.to_string(),
                Style::default().fg(self.theme.text_secondary),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

impl ReviewPanel<'_> {
    fn review_line(&self, review: &Review) -> Line<'static> {
        let is_selected = self.selected == Some(review.id.as_str());
        let marker = if is_selected { "\u{25b6} " } else { "  " };
        let tier = StrengthTier::of(review);
        let badge = match tier {
            StrengthTier::Fast => "fast".to_string(),
            other => format!("{:<3}", other.badge()),
        };
        let text_style = if is_selected {
            Style::default()
                .fg(self.theme.text_primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.text_secondary)
        };

        Line::from(vec![
            Span::styled(marker, Style::default().fg(self.theme.panel_border_selected)),
            Span::styled(format!("{badge:<4} "), Style::default().fg(self.theme.info)),
            Span::styled(review_summary(review), text_style),
            Span::styled(
                format!("  {}", review.date.format("%Y-%m-%d %H:%M")),
                Style::default().fg(self.theme.muted),
            ),
        ])
    }

    fn push_move_lines(&self, lines: &mut Vec<Line<'static>>, width: u16) {
        let Some(analysis) = self.analysis else {
            lines.push(Line::from(Span::styled(
                format!("Move {}: not analyzed", self.move_number),
                Style::default().fg(self.theme.muted),
            )));
            return;
        };

        let split = WinRateSplit::new(analysis.pre_move_win_rate);
        let (black, white) = split.labels();
        lines.push(Line::from(vec![
            Span::raw(format!("Move {}  ", self.move_number)),
            Span::styled(format!("B {black}"), Style::default().fg(self.theme.text_primary)),
            Span::raw("  "),
            Span::styled(format!("W {white}"), Style::default().fg(self.theme.text_secondary)),
        ]));
        lines.push(split_bar(&split, width.saturating_sub(2), self.theme));

        if let Some(next) = &self.next_move {
            let mut spans = vec![Span::raw(format!("Next: {next}"))];
            if let Some(delta) = self.delta {
                let display = DeltaDisplay::new(delta);
                let color = match display.trend() {
                    DeltaTrend::Positive => self.theme.positive,
                    DeltaTrend::Negative => self.theme.negative,
                    DeltaTrend::Neutral => self.theme.text_secondary,
                };
                spans.push(Span::raw("  "));
                spans.push(Span::styled(display.to_string(), Style::default().fg(color)));
            }
            lines.push(Line::from(spans));
        }
    }
}

/// One-line description: engine, version, network.
pub fn review_summary(review: &Review) -> String {
    let mut text = engine_display_name(&review.engine).to_string();
    if !review.engine_version.is_empty() {
        text.push(' ');
        text.push_str(&review.engine_version);
    }
    if review.network_size > 0 {
        text.push_str(&format!(" {}b", review.network_size));
    }
    if !review.network.is_empty() {
        let short: String = review.network.chars().take(8).collect();
        text.push_str(&format!(" {short}"));
    }
    text
}

fn split_bar(split: &WinRateSplit, width: u16, theme: &Theme) -> Line<'static> {
    let width = usize::from(width);
    let black = ((split.black / 100.0) * width as f64).round() as usize;
    let black = black.min(width);
    Line::from(vec![
        Span::styled("\u{2588}".repeat(black), Style::default().fg(theme.chart_black)),
        Span::styled(
            "\u{2588}".repeat(width - black),
            Style::default().fg(theme.chart_white),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use review::ReviewType;

    fn review(id: &str, engine: &str, review_type: ReviewType, strength: u32) -> Review {
        Review {
            id: id.to_string(),
            engine: engine.to_string(),
            engine_version: "0.17".to_string(),
            network_size: 40,
            network: "0123456789abcdef".to_string(),
            review_type,
            strength,
            ..Default::default()
        }
    }

    fn render(panel: ReviewPanel<'_>) -> Vec<String> {
        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);
        panel.render(area, &mut buf);
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }

    fn panel<'a>(reviews: &'a [Review], theme: &'a Theme) -> ReviewPanel<'a> {
        ReviewPanel {
            reviews,
            selected: None,
            analysis: None,
            move_number: 0,
            delta: None,
            next_move: None,
            loading: false,
            reviewing: false,
            can_request_full: false,
            status: None,
            theme,
        }
    }

    #[test]
    fn summary_names_engine_and_network() {
        let text = review_summary(&review("a", "katago", ReviewType::Full, 2000));
        assert_eq!(text, "KataGo 0.17 40b 01234567");
        assert_eq!(review_summary(&Review::default()), "AI");
    }

    #[test]
    fn queued_state_is_shown() {
        let theme = Theme::dark();
        let rows = render(ReviewPanel {
            reviewing: true,
            ..panel(&[], &theme)
        });
        assert!(rows[1].contains("Queueing AI review"));
    }

    #[test]
    fn selected_review_is_marked() {
        let theme = Theme::dark();
        let reviews = vec![
            review("a", "leela_zero", ReviewType::Full, 1700),
            review("b", "katago", ReviewType::Fast, 100),
        ];
        let rows = render(ReviewPanel {
            selected: Some("b"),
            ..panel(&reviews, &theme)
        });
        assert!(rows[1].contains("III"));
        assert!(rows[1].contains("Leela Zero"));
        assert!(rows[2].starts_with("\u{2502}\u{25b6} fast"));
    }

    #[test]
    fn move_details_show_split_and_delta() {
        let theme = Theme::dark();
        let reviews = vec![review("a", "katago", ReviewType::Fast, 100)];
        let analysis = MoveAnalysis {
            move_number: 12,
            pre_move_win_rate: 0.625,
            ..Default::default()
        };
        let rows = render(ReviewPanel {
            selected: Some("a"),
            analysis: Some(&analysis),
            move_number: 12,
            delta: Some(-0.034),
            next_move: Some("D4".to_string()),
            can_request_full: true,
            ..panel(&reviews, &theme)
        });
        let text = rows.join("\n");
        assert!(text.contains("B 62.5%"));
        assert!(text.contains("W 37.5%"));
        assert!(text.contains("Next: D4  \u{2212} 3.4pp"));
        assert!(text.contains("request full review"));
    }
}
