use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use review_client::{push, PushEvent, PushStream, ReviewService};

use super::app::{App, AppAction};
use super::theme::Theme;
use crate::controller::ReviewController;

/// UI refresh interval, which also bounds how late a debounced resize lands.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

pub struct AppOptions {
    pub theme: Theme,
    /// Background refresh period; `None` disables it.
    pub refresh: Option<Duration>,
}

/// Set up the terminal, run the review UI until the user quits, and restore
/// the terminal even when the loop fails.
pub async fn run_app<S: ReviewService>(
    controller: ReviewController<S>,
    options: AppOptions,
) -> anyhow::Result<()> {
    let (push_tx, push_rx) = push::channel();
    let mut app = App::new(controller, options.theme, push_tx.clone());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let refresh_task = options.refresh.map(|period| {
        let tx = push_tx.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately; the initial load covers it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(PushEvent::refresh()).is_err() {
                    break;
                }
            }
        })
    });

    // Draw once so the loading state is visible while the first fetches run.
    let result = match terminal.draw(|f| app.draw(f)) {
        Ok(_) => {
            app.controller.load().await;
            app.sync();
            run_ui_loop(&mut terminal, &mut app, push_rx).await
        }
        Err(e) => Err(e.into()),
    };

    if let Some(task) = refresh_task {
        task.abort();
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_ui_loop<B: ratatui::backend::Backend, S: ReviewService>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
    mut push_rx: PushStream,
) -> anyhow::Result<()> {
    let mut term_events = EventStream::new();
    let mut frame_tick = tokio::time::interval(FRAME_INTERVAL);

    loop {
        terminal.draw(|f| app.draw(f))?;

        tokio::select! {
            biased;

            // Keyboard / mouse / resize (highest priority)
            maybe_event = term_events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if app.handle_key(key).await == AppAction::Quit {
                            tracing::info!("Quit requested");
                            return Ok(());
                        }
                    }
                    Some(Ok(Event::Mouse(mouse))) => app.handle_mouse(mouse),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("Terminal event error: {}", e);
                    }
                    None => return Ok(()),
                }
            }

            // Push events, refresh ticks and the manual refresh key
            Some(event) = push_rx.next() => {
                tracing::debug!(?event, "push event");
                app.handle_push(event).await;
            }

            _ = frame_tick.tick() => {
                app.poll_resize(Instant::now());
            }
        }
    }
}
