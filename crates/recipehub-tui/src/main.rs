//! Recipe Hub TUI - a terminal client for browsing and sharing recipes.
//!
//! Browsing is open to everyone; creating, editing and deleting recipes
//! requires signing in with an email and password.

mod app;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use recipehub_core::{ClientContext, Config, Route};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE_NAME: &str = "recipehub.log";

const USAGE: &str = "\
Usage: recipehub [OPTIONS]

Options:
  --base-url <url>  API base URL (overrides RECIPEHUB_API_BASE_URL and the config file)
  --logout          Clear the stored session and exit
  -h, --help        Print this help";

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    base_url: Option<String>,
    logout: bool,
    help: bool,
}

fn parse_args<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--base-url" => match args.next() {
                Some(url) => parsed.base_url = Some(url),
                None => bail!("--base-url requires a value"),
            },
            "--logout" => parsed.logout = true,
            "-h" | "--help" => parsed.help = true,
            other => match other.strip_prefix("--base-url=") {
                Some(url) => parsed.base_url = Some(url.to_string()),
                None => bail!("Unknown argument: {}", other),
            },
        }
    }
    Ok(parsed)
}

/// Initialize the tracing subscriber, writing to a log file so the terminal
/// stays clean. Returns the guard that flushes the writer on drop.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let dir = config.log_dir().ok()?;
    std::fs::create_dir_all(&dir).ok()?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, LOG_FILE_NAME));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = parse_args(std::env::args().skip(1))
        .map_err(|e| anyhow::anyhow!("{}\n\n{}", e, USAGE))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {:#}. Using default settings.", e);
            Config::default()
        }
    };

    // Initialize logging
    let _log_guard = init_tracing(&config);
    info!("Recipe Hub TUI starting");

    let base_url = args.base_url.unwrap_or_else(|| config.api_base_url());
    if base_url.is_empty() {
        warn!("No API base URL configured; requests will fail");
    }
    let ctx = ClientContext::from_config(&config, &base_url)
        .context("Failed to open the session store")?;

    if args.logout {
        ctx.session.clear()?;
        println!("Signed out.");
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(ctx, config);
    app.start(Route::home());

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Recipe Hub TUI shutting down");
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        // Apply finished requests, route changes and external session changes
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
