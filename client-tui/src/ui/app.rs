//! View state sitting between the controller and the terminal.

use std::time::Instant;

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use goban::Position;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};
use review::{ChartCursor, ChartPresenter, ChartState, ResizeDebouncer};
use review_client::{PushEvent, PushSender, ReviewService};
use tracing::{debug, warn};

use super::input::{map_key, Command, HELP};
use super::theme::Theme;
use super::widgets::{
    BoardGeometry, BoardOverlay, BoardWidget, ChartGeometry, ReviewPanel, WinRateChart,
};
use crate::controller::ReviewController;

const CHART_HEIGHT: u16 = 10;
const PANEL_MIN_WIDTH: u16 = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ScreenLayout {
    board: Rect,
    panel: Rect,
    chart: Rect,
    footer: Rect,
}

fn screen_layout(area: Rect, board_width: u16) -> ScreenLayout {
    let [main, chart, footer] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(CHART_HEIGHT),
        Constraint::Length(1),
    ])
    .areas(area);
    let [board, panel] = Layout::horizontal([
        Constraint::Length(board_width),
        Constraint::Min(PANEL_MIN_WIDTH),
    ])
    .areas(main);
    ScreenLayout {
        board,
        panel,
        chart,
        footer,
    }
}

pub struct App<S: ReviewService> {
    pub controller: ReviewController<S>,
    pub theme: Theme,
    overlay: BoardOverlay,
    /// Win-rate change at the cursor, from the last sync.
    delta: Option<f64>,
    presenter: ChartPresenter,
    chart_cursor: ChartCursor,
    debouncer: ResizeDebouncer,
    chart_width: Option<f64>,
    layout: ScreenLayout,
    push: PushSender,
}

impl<S: ReviewService> App<S> {
    pub fn new(controller: ReviewController<S>, theme: Theme, push: PushSender) -> Self {
        let mut app = Self {
            controller,
            theme,
            overlay: BoardOverlay::default(),
            delta: None,
            presenter: ChartPresenter::default(),
            chart_cursor: ChartCursor::default(),
            debouncer: ResizeDebouncer::default(),
            chart_width: None,
            layout: ScreenLayout::default(),
            push,
        };
        app.sync();
        app
    }

    pub fn overlay(&self) -> &BoardOverlay {
        &self.overlay
    }

    pub fn delta(&self) -> Option<f64> {
        self.delta
    }

    pub fn chart_state(&self) -> &ChartState {
        self.presenter.state()
    }

    /// Push the controller's current review state to the board and chart.
    pub fn sync(&mut self) {
        let annotation = self.controller.annotation();
        annotation.apply_to(&mut self.overlay);
        self.delta = annotation.delta;
        let (entries, highlighted) = self.controller.chart_entries();
        self.presenter
            .update(&entries, &highlighted, self.controller.current_move_number());
    }

    /// Apply a pending chart resize once it has settled. Returns whether the
    /// chart changed.
    pub fn poll_resize(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(width) => {
                self.presenter.resize(width);
                true
            }
            None => false,
        }
    }

    pub async fn handle_push(&mut self, event: PushEvent) {
        self.controller.handle_push(event).await;
        self.sync();
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        let Some(command) = map_key(key) else {
            return AppAction::Continue;
        };
        debug!(?command, "key command");
        match command {
            Command::Quit => return AppAction::Quit,
            Command::NextMove => self.controller.next_move(),
            Command::PrevMove => self.controller.prev_move(),
            Command::Start => self.controller.go_to_start(),
            Command::End => self.controller.go_to_end(),
            Command::NextReview => self.controller.cycle_review(true).await,
            Command::PrevReview => self.controller.cycle_review(false).await,
            Command::Refresh => {
                if let Err(e) = self.push.send(PushEvent::refresh()) {
                    warn!("Failed to request refresh: {}", e);
                }
            }
            Command::RequestFullReview => self.controller.request_full_review().await,
            Command::PlaySuggestion => self.controller.play_suggestion(),
            Command::BackToTrunk => self.controller.back_to_trunk(),
            Command::ToggleTheme => self.theme.toggle(),
        }
        self.sync();
        AppAction::Continue
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let chart = ChartGeometry::new(self.layout.chart);
        if !chart.contains(mouse.column, mouse.row) {
            if self.chart_cursor.hover().is_some() || self.chart_cursor.is_pressed() {
                self.chart_cursor.leave();
            }
            if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                self.click_board(mouse.column, mouse.row);
            }
            return;
        }

        let ChartState::Ready(model) = self.presenter.state() else {
            return;
        };
        let x = chart.pointer_x(model, mouse.column);
        let selected = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.chart_cursor.press(model, x),
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                self.chart_cursor.moved(model, x)
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.chart_cursor.release();
                None
            }
            _ => None,
        };
        if let Some(move_number) = selected {
            self.controller.go_to_move(move_number);
            self.sync();
        }
    }

    fn click_board(&mut self, column: u16, row: u16) {
        let geometry = BoardGeometry::new(self.layout.board, self.controller.tree().size());
        let Some(at) = geometry.intersection_at(column, row) else {
            return;
        };
        match self.controller.play(at) {
            Ok(()) => self.sync(),
            Err(e) => {
                debug!("Ignoring board click: {}", e);
                self.controller.status_message = Some(format!("Cannot play there: {}", e));
            }
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let size = self.controller.tree().size();
        let (board_width, _) = BoardGeometry::required(size);
        self.layout = screen_layout(frame.area(), board_width);

        let width = ChartGeometry::new(self.layout.chart).container_width();
        if self.chart_width != Some(width) {
            self.chart_width = Some(width);
            self.debouncer.request(width, Instant::now());
        }

        let tree = self.controller.tree();
        let cursor = self.controller.cursor();
        let position = tree
            .position_at(cursor)
            .unwrap_or_else(|e| {
                warn!("Cannot replay position: {}", e);
                Position::empty(size)
            });
        let last_move = tree.parent(cursor).map(|_| tree.mv(cursor));
        let title = match self.controller.game() {
            Some(game) => format!(
                " {} (B) vs {} (W) ",
                game.players.black.username, game.players.white.username
            ),
            None => format!(" Game {} ", self.controller.game_id()),
        };
        frame.render_widget(
            BoardWidget {
                position: &position,
                overlay: &self.overlay,
                last_move,
                theme: &self.theme,
                title: &title,
            },
            self.layout.board,
        );

        frame.render_widget(
            ReviewPanel {
                reviews: self.controller.reviews(),
                selected: self.controller.selected_id(),
                analysis: self.controller.current_analysis(),
                move_number: self.controller.current_move_number(),
                delta: self.delta,
                next_move: self.controller.next_move_coords(),
                loading: self.controller.is_loading(),
                reviewing: self.controller.is_reviewing(),
                can_request_full: self.controller.can_request_full_review(),
                status: self.controller.status_message.as_deref(),
                theme: &self.theme,
            },
            self.layout.panel,
        );

        frame.render_widget(
            WinRateChart {
                state: self.presenter.state(),
                hover: self.chart_cursor.hover(),
                theme: &self.theme,
                focused: self.chart_cursor.is_pressed(),
            },
            self.layout.chart,
        );

        frame.render_widget(
            Paragraph::new(HELP).style(Style::default().fg(self.theme.muted)),
            self.layout.footer,
        );
    }
}
