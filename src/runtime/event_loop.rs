use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::RodioEngine;
use crate::config;
use crate::runtime::keys::KeyMap;
use crate::ui;

/// Input wait per iteration; also bounds how stale the screen can get.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main terminal event loop: drives playback, draws, and feeds key presses
/// to the app. Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<RodioEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut keys = KeyMap::default();

    loop {
        app.tick(Instant::now());
        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(action) = keys.map(key, app.prompt.is_some()) else {
            continue;
        };

        log::trace!("key {:?} -> {action:?}", key.code);
        if app.apply(action) {
            app.player
                .shutdown(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(());
        }
    }
}
