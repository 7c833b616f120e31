mod common;

use std::time::{Duration, Instant};

use client_tui::ui::{theme::Theme, App, AppAction};
use client_tui::ReviewController;
use common::{analyzed_review, service_with};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, Terminal};
use review::{ChartState, ReviewType};
use review_client::{push, MockReviewService, PushEvent, PushStream};
use tokio_stream::StreamExt;

const WIDTH: u16 = 120;
const HEIGHT: u16 = 40;
// Chart occupies the ten rows above the footer.
const CHART_ROW: u16 = HEIGHT - 1 - 10 + 2;

async fn loaded_app() -> (App<MockReviewService>, PushStream, Terminal<TestBackend>) {
    let service = service_with(vec![analyzed_review("a", ReviewType::Fast)]);
    let mut controller = ReviewController::new(service, 42, "leela_zero");
    controller.load().await;
    let (tx, rx) = push::channel();
    let mut app = App::new(controller, Theme::dark(), tx);
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
    terminal.draw(|f| app.draw(f)).unwrap();
    (app, rx, terminal)
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    (0..HEIGHT)
        .map(|y| (0..WIDTH).map(|x| buf[(x, y)].symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

#[tokio::test]
async fn renders_players_and_review() {
    let (_app, _rx, terminal) = loaded_app().await;
    let text = screen_text(&terminal);
    assert!(text.contains("alice (B) vs bob (W)"));
    assert!(text.contains("Leela Zero"));
    assert!(text.contains("request full review"));
}

#[tokio::test]
async fn keys_navigate_and_quit() {
    let (mut app, _rx, _terminal) = loaded_app().await;
    assert_eq!(app.controller.current_move_number(), 3);

    assert_eq!(app.handle_key(key(KeyCode::Left)).await, AppAction::Continue);
    assert_eq!(app.controller.current_move_number(), 2);
    app.handle_key(key(KeyCode::Home)).await;
    assert_eq!(app.controller.current_move_number(), 0);

    app.handle_key(key(KeyCode::Char('T'))).await;
    assert!(!app.theme.is_dark());

    assert_eq!(app.handle_key(key(KeyCode::Char('q'))).await, AppAction::Quit);
}

#[tokio::test]
async fn refresh_key_injects_push_event() {
    let (mut app, mut rx, _terminal) = loaded_app().await;
    app.handle_key(key(KeyCode::Char('r'))).await;
    assert_eq!(rx.next().await, Some(PushEvent::refresh()));
}

#[tokio::test]
async fn chart_drag_selects_moves() {
    let (mut app, _rx, _terminal) = loaded_app().await;
    assert!(matches!(app.chart_state(), ChartState::Ready(_)));

    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 1, CHART_ROW));
    assert_eq!(app.controller.current_move_number(), 0);

    app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), WIDTH - 2, CHART_ROW));
    assert_eq!(app.controller.current_move_number(), 2);

    app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), WIDTH - 2, CHART_ROW));
    // Hovering after release does not navigate.
    app.handle_mouse(mouse(MouseEventKind::Moved, 1, CHART_ROW));
    assert_eq!(app.controller.current_move_number(), 2);
}

#[tokio::test]
async fn board_click_plays_a_variation() {
    let (mut app, _rx, _terminal) = loaded_app().await;
    // Top-left intersection: inside the border, past the row labels and header.
    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 4, 2));
    let tree = app.controller.tree();
    assert!(!tree.is_trunk(app.controller.cursor()));
    assert_eq!(tree.mv(app.controller.cursor()), goban::Intersection::new(0, 0));
}

#[tokio::test]
async fn resize_is_applied_after_debounce() {
    let (mut app, _rx, _terminal) = loaded_app().await;
    let later = Instant::now() + Duration::from_millis(20);
    assert!(app.poll_resize(later));
    assert!(!app.poll_resize(later + Duration::from_millis(20)));
}

#[tokio::test]
async fn push_updates_sync_the_overlay() {
    let (mut app, _rx, _terminal) = loaded_app().await;
    app.controller.go_to_move(1);
    app.sync();
    assert!(!app.overlay().is_empty());

    app.handle_push(PushEvent::ReviewUpdated {
        ai_review_id: Some("missing".into()),
        refresh: false,
    })
    .await;
    assert!(app.controller.active().is_none());
    assert!(app.overlay().is_empty());
}

#[tokio::test]
async fn navigation_refreshes_cached_delta() {
    let (mut app, _rx, mut terminal) = loaded_app().await;
    assert_eq!(app.delta(), None);

    app.handle_key(key(KeyCode::Home)).await;
    app.handle_key(key(KeyCode::Right)).await;
    assert_eq!(app.controller.current_move_number(), 1);
    let delta = app.delta().expect("delta at move 1");
    assert!((delta - 0.2).abs() < 1e-9);
    assert_eq!(app.delta(), app.controller.annotation().delta);

    terminal.draw(|f| app.draw(f)).unwrap();
    assert!(screen_text(&terminal).contains("+ 20.0pp"));
}
