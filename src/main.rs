//! octoterm - a keyboard-driven terminal interface for a GitHub account.
//!
//! The operator signs in with a username and a personal access token;
//! both live only in process memory and are discarded (and zeroized) on
//! exit. Repository, gist, issue, workflow, notification, and account
//! operations run against the GitHub REST API.

mod api;
mod app;
mod auth;
mod config;
mod models;
mod ui;
mod utils;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use auth::Credential;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr only; no file sink exists, so nothing a task logs
/// can outlive the process. Use RUST_LOG to control the level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("octoterm starting");

    // `--prompt` asks for credentials on the plain terminal (token read
    // without echo) before the TUI takes over the screen.
    let prompt_login = std::env::args().any(|a| a == "--prompt");

    let mut app = App::new()?;

    // All entry points converge on the same credential flow: prompt,
    // environment, or the in-TUI login form.
    if prompt_login {
        let credential = Credential::acquire_interactive()?;
        // On failure the login overlay shows the error once the TUI is up.
        let _ = app.login_with_credential(credential).await;
    } else {
        match Credential::from_env() {
            Ok(Some(credential)) => {
                let _ = app.login_with_credential(credential).await;
            }
            Ok(None) => {}
            Err(e) => {
                anyhow::bail!("environment credentials: {}", e);
            }
        }
    }

    if !app.is_authenticated() {
        app.start_login();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("octoterm shutting down");

    // Propagate so the process exits non-zero on unrecovered failures.
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
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

                // Handle input
                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Fold in completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
