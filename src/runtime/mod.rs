use std::time::Duration;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::RodioEngine;
use crate::library::BlobStore;

mod cli;
mod event_loop;
mod keys;
mod logging;
mod settings;
mod startup;

use cli::Cli;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (settings, warnings) = settings::load_settings(cli.config.as_deref());
    for w in &warnings {
        eprintln!("turntable: {w}");
    }

    let log_file = logging::init(&settings.log);
    for w in &warnings {
        log::warn!("{w}");
    }
    log::info!(
        "turntable {} starting, log file {:?}",
        env!("CARGO_PKG_VERSION"),
        log_file
    );

    let blobs = BlobStore::new();
    let engine = RodioEngine::open();
    let mut app = startup::build_app(engine, &cli.paths, &settings, &blobs);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app);
    if run_result.is_err() {
        app.player.shutdown(Duration::ZERO);
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    startup::save_playlists(&app, &settings);
    drop(app);
    log::debug!(
        "{} blobs ({} bytes) still held at exit",
        blobs.live(),
        blobs.live_bytes()
    );
    log::info!("bye");

    run_result
}
