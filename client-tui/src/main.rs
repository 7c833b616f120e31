use anyhow::Context;
use clap::Parser;
use client_tui::config;
use client_tui::ui::{render_loop::AppOptions, theme::Theme};
use client_tui::ReviewController;
use review_client::HttpReviewClient;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Browse the AI reviews of a Go game in the terminal.
#[derive(Parser)]
#[command(name = "goreview", version, about = "Terminal viewer for AI game reviews")]
struct Cli {
    /// Game to review
    game_id: u64,

    /// Review server, e.g. https://online-go.com
    #[arg(long)]
    host: Option<String>,

    /// Path prefix of the REST endpoints
    #[arg(long)]
    api_prefix: Option<String>,

    /// Engine to request when the game has no review
    #[arg(long)]
    engine: Option<String>,

    /// Seconds between background refreshes (0 disables)
    #[arg(long)]
    refresh: Option<u64>,

    /// Color theme: dark or light
    #[arg(long)]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing with file output; the terminal belongs to the UI
    let log_dir = config::get_log_dir();
    std::fs::create_dir_all(&log_dir).ok();
    let file_appender = tracing_appender::rolling::daily(&log_dir, "goreview");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let host = cli.host.unwrap_or_else(config::get_host);
    let api_prefix = cli.api_prefix.unwrap_or_else(config::get_api_prefix);
    let engine = cli.engine.unwrap_or_else(config::get_engine);
    let refresh = match cli.refresh {
        Some(secs) => config::refresh_interval(secs),
        None => config::get_refresh_interval(),
    };
    let theme = Theme::from_preference(Some(&cli.theme.unwrap_or_else(config::get_theme)));

    tracing::info!(game_id = cli.game_id, %host, %engine, "goreview starting up");

    let mut client = HttpReviewClient::new(&host, &api_prefix)
        .with_context(|| format!("invalid review server {host}"))?;
    if let Some(token) = config::get_api_token() {
        client = client.with_token(token);
    }

    let controller = ReviewController::new(client, cli.game_id, engine);
    client_tui::ui::run_app(controller, AppOptions { theme, refresh }).await?;

    tracing::info!("goreview shutting down");
    Ok(())
}
