//! Movieflix - terminal client for the Movieflix catalog
//!
//! # Usage
//!
//! ```bash
//! # Interactive
//! movieflix
//!
//! # Scripted
//! movieflix login alice --password secret
//! movieflix search "blade runner"
//! movieflix info 78 --json
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use movieflix::app::App;
use movieflix::cli::{Cli, ExitCode, Output};
use movieflix::commands::{self, CommandContext};
use movieflix::config::Config;
use movieflix::logging;
use movieflix::session::SessionContext;
use movieflix::ui;

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.is_cli_mode() {
        let exit_code = run_cli(cli).await;
        std::process::exit(exit_code.into());
    } else {
        run_tui(cli).await
    }
}

/// Run one subcommand
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);

    let config_filter = cli
        .config
        .as_deref()
        .and_then(|p| Config::load_from(p).ok())
        .unwrap_or_else(Config::load)
        .log_filter;
    logging::init_cli(config_filter.as_deref(), cli.quiet);

    let ctx = match CommandContext::from_cli(&cli) {
        Ok(ctx) => ctx,
        Err(e) => return output.error(format!("{:#}", e), ExitCode::InvalidArgs),
    };

    match cli.command {
        Some(command) => commands::run(&ctx, command, &output).await,
        // Handled by is_cli_mode check
        None => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Raw mode on the alternate screen
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Undo [`init_terminal`]
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Build the app from config and the stored session
fn build_app(cli: &Cli) -> Result<App> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    if let Some(path) = logging::init_tui(config.log_filter.as_deref())? {
        info!(log = %path.display(), "movieflix starting");
    }

    let session = SessionContext::open_default().context("Could not read stored session")?;

    let api = config.client(Arc::new(session), cli.api_url.as_deref());
    info!(base_url = %api.base_url(), "api client ready");
    Ok(App::new(api, config.guard()))
}

/// Run interactive TUI
async fn run_tui(cli: Cli) -> Result<()> {
    // Fail before touching the terminal so errors stay readable
    let mut app = build_app(&cli)?;

    let mut terminal = init_terminal()?;
    app.start();

    let result = run_event_loop(&mut terminal, &mut app).await;

    // Restore before reporting so the error is readable
    restore_terminal(&mut terminal)?;

    if let Err(e) = &result {
        error!(error = %e, "event loop failed");
    }
    result
}

/// Main event loop - applies finished background work, renders, handles input
async fn run_event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    while app.running {
        app.drain();

        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout so background results show up promptly
        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Releases and repeats are reported on some platforms
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        tokio::task::yield_now().await;
    }

    info!("movieflix exiting");
    Ok(())
}
