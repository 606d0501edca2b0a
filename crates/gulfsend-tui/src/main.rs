use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gulfsend_tui::app::App;
use gulfsend_tui::clipboard::SystemClipboard;
use gulfsend_tui::config::Config;
use ratatui::prelude::*;
use tracing::info;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(config.log_file.as_deref())?;

    let dashboard_config = config.dashboard_config();
    dashboard_config.validate()?;

    // Clipboard writes and copy timers run on this runtime; the UI loop
    // itself stays on the main thread.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let _guard = runtime.enter();

    let clipboard = Arc::new(SystemClipboard::spawn());
    let app = App::new(dashboard_config, config.registry(), clipboard);
    info!(keys = app.dashboard().list().len(), "gulfsend starting");

    run_tui(app)
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_tui(app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }

    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        // Poll while a copy is in flight or its flag is waiting to revert,
        // block on input otherwise.
        if app.needs_polling() {
            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if should_quit(&app, key) {
                        break;
                    }
                    app.handle_key(key);
                }
            } else {
                app.tick();
            }
        } else if let Event::Key(key) = event::read()? {
            if should_quit(&app, key) {
                break;
            }
            app.handle_key(key);
        }
    }

    info!("gulfsend exiting");
    Ok(())
}

fn should_quit(app: &App, key: KeyEvent) -> bool {
    // Ctrl+C always quits; q quits unless we're in an input mode
    (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        || (key.code == KeyCode::Char('q') && !app.is_input_mode())
}
