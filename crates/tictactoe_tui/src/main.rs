//! Terminal frontend for tic-tac-toe against the heuristic AI.

#![warn(missing_docs)]

mod app;
mod config;
mod input;
mod ui;

use anyhow::{Context, Result};
use app::App;
use config::{CONFIG_FILE, TuiConfig};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use input::Action;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tictactoe_core::{GameDriver, GameEvent, GameHandle};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info, instrument, warn};
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = TuiConfig::load_or_default(Path::new(CONFIG_FILE))?;
    init_tracing(&config)?;

    info!("Starting tic-tac-toe");

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let (handle, mut events, driver) = GameDriver::spawn();
    let res = run_app(&mut terminal, &handle, &mut events);

    if handle.shutdown().is_err() {
        warn!("Driver already stopped");
    }
    if let Err(e) = driver.await {
        error!(error = %e, "Driver task failed");
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!("Exiting");
    res
}

// Logs go to a file so they do not corrupt the terminal UI.
fn init_tracing(config: &TuiConfig) -> Result<()> {
    let log_file = std::fs::File::create(config.log_file()).with_context(|| {
        format!("Failed to create log file {}", config.log_file().display())
    })?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

#[instrument(skip_all)]
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    handle: &GameHandle,
    events: &mut UnboundedReceiver<GameEvent>,
) -> Result<()> {
    let mut app = App::new();

    loop {
        while let Ok(event) = events.try_recv() {
            app.handle_event(event);
        }

        terminal.draw(|frame| ui::draw(frame, &app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match input::action_for(key.code, app.cursor()) {
            Some(Action::Quit) => {
                info!("Player quit");
                return Ok(());
            }
            Some(Action::Reset) => handle.reset()?,
            Some(Action::MoveCursor(position)) => app.set_cursor(position),
            Some(Action::SelectCursor) => handle.select_cell(app.cursor().to_index())?,
            Some(Action::Select(position)) => {
                app.set_cursor(position);
                handle.select_cell(position.to_index())?;
            }
            None => {}
        }
    }
}
