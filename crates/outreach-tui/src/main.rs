use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use outreach_core::logging::{default_log_dir, init_logging};
use outreach_core::{
    api_base, Config, HttpApi, SharedState, SyncOrchestrator, ViewState, BACKEND_URL_ENV,
};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "outreach")]
#[command(about = "Terminal dashboard for AI-assisted LinkedIn outreach", version)]
struct Cli {
    /// Backend base URL, e.g. http://localhost:8000
    #[arg(long)]
    backend_url: Option<String>,
    /// Config file to read instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory for outreach.log
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Write --backend-url to the config file for later runs
    #[arg(long, requires = "backend_url")]
    save_backend_url: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;

    let env_url = std::env::var(BACKEND_URL_ENV).ok();
    let backend_url = config.resolve_backend_url(cli.backend_url.as_deref(), env_url.as_deref())?;

    if cli.save_backend_url {
        config.backend_url = Some(backend_url.clone());
        match &cli.config {
            Some(path) => config.save_to(path),
            None => config.save(),
        }
        .context("saving configuration")?;
    }

    // Logging failures are not fatal; the dashboard still works without a log file
    let log_dir = match cli.log_dir {
        Some(dir) => Ok(dir),
        None => default_log_dir(),
    };
    if let Err(e) = log_dir.and_then(|dir| init_logging(&dir)) {
        eprintln!("warning: logging disabled: {:#}", e);
    }

    let api = HttpApi::new(&api_base(&backend_url), config.request_timeout())
        .context("creating backend client")?;
    tracing::info!(backend = %backend_url, "starting outreach dashboard");

    let state = SharedState::new(ViewState::new(config.generation_defaults()));
    let sync = SyncOrchestrator::new(Arc::new(api), state);
    let mut app = App::new(sync, backend_url);

    tui::install_panic_hook();
    let mut terminal = tui::init().context("initializing terminal")?;

    app.start_bootstrap();
    let result = run(&mut terminal, &mut app).await;

    tui::restore().context("restoring terminal")?;
    result
}

async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();

    while !app.should_quit {
        let state = app.state().clone();
        terminal.draw(|frame| {
            let view = state.lock();
            ui::render(app, &view, frame);
        })?;

        let Some(event) = events.next().await else {
            break;
        };
        handler::handle_event(app, event).await?;
    }

    tracing::info!("outreach dashboard exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_backend_url_requires_a_url() {
        assert!(Cli::try_parse_from(["outreach", "--save-backend-url"]).is_err());

        let cli = Cli::try_parse_from([
            "outreach",
            "--backend-url",
            "http://localhost:8000",
            "--save-backend-url",
        ])
        .unwrap();
        assert!(cli.save_backend_url);
        assert_eq!(cli.backend_url.as_deref(), Some("http://localhost:8000"));
    }
}
