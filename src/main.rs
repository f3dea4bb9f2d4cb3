//! clubapply - Club Application Assistant
//!
//! A terminal front end that walks a student through a club application and
//! hands the collected details to the coaching backend's agents.

use anyhow::{Context, Result};
use clubapply::application::App;
use clubapply::infrastructure::{AgentBackend, AgentService, ApiClient, Config};
use clubapply::presentation::{InputHandler, render_ui};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::fs::File;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// How long to wait for a key before checking on running agent calls.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Entry point for the clubapply terminal application.
///
/// Reads configuration, sends logs to a file so they stay off the terminal,
/// then runs the event loop until the user quits.
fn main() -> Result<()> {
    let config = Config::from_env()?;

    let log_file = File::create(&config.log_file)
        .with_context(|| format!("Could not open log file {}", config.log_file))?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_ansi(false),
        )
        .init();

    info!("Starting clubapply v{} against {}", env!("CARGO_PKG_VERSION"), config.api_url);

    let client = ApiClient::new(&config.api_url)?;
    let backend: Arc<dyn AgentBackend> = Arc::new(AgentService::new(client));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend)?;

    let mut app = App::new(backend);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "terminal loop failed");
        println!("{err:?}");
    }

    info!("clubapply exiting");
    Ok(())
}

/// Main application event loop.
///
/// Redraws, waits up to [`TICK_RATE`] for a key, and lets the app pick up
/// any agent call that finished in the meantime.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    InputHandler::handle_key_event(app, key.code, key.modifiers);
                }
            }
        }
        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}
