//! Application model types: `App`, the list `View`s and the `Action`s the
//! runtime feeds into it.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::audio::Engine;
use crate::config::{ControlsSettings, LibrarySettings, Settings};
use crate::library::{SourceUrl, Track, pick_files, scan_folders};
use crate::player::{PlaybackError, Player, PlayerEvent};
use crate::playlists::Playlists;

use super::notices::Notices;

/// Which list the main pane shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Library,
    Queue,
    Favorites,
    Recent,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            Self::Library => Self::Queue,
            Self::Queue => Self::Favorites,
            Self::Favorites => Self::Recent,
            Self::Recent => Self::Library,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Library => " library ",
            Self::Queue => " up next ",
            Self::Favorites => " favorites ",
            Self::Recent => " recently played ",
        }
    }
}

/// Everything the user can ask for. Key handling maps to these; `App::apply`
/// carries them out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    TogglePlay,
    Next,
    Previous,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    ToggleRepeat,
    ToggleShuffle,
    ToggleFavorite,
    ToggleHelp,
    CursorDown,
    CursorUp,
    CursorTop,
    CursorBottom,
    PlaySelected,
    SeekBack,
    SeekForward,
    RateDown,
    RateUp,
    ResetRate,
    CycleView,
    OpenPrompt,
    PromptChar(char),
    PromptBackspace,
    PromptSubmit,
    /// Close whatever overlay is open.
    Dismiss,
    RemoveSelected,
    Quit,
}

/// The main application model.
pub struct App<E: Engine> {
    pub player: Player<E>,
    pub playlists: Playlists,
    library: LibrarySettings,
    controls: ControlsSettings,

    pub view: View,
    /// Cursor position inside the active view.
    pub selected: usize,
    /// Whether the cursor jumps to the track that starts playing.
    pub follow_playback: bool,
    pub help_open: bool,
    /// Text of the open-path prompt while it is shown.
    pub prompt: Option<String>,
    pub notices: Notices,
}

impl<E: Engine> App<E> {
    pub fn new(player: Player<E>, playlists: Playlists, settings: &Settings) -> Self {
        Self {
            player,
            playlists,
            library: settings.library.clone(),
            controls: settings.controls.clone(),
            view: View::Library,
            selected: 0,
            follow_playback: settings.ui.follow_playback,
            help_open: false,
            prompt: None,
            notices: Notices::new(Duration::from_secs(settings.ui.notice_seconds)),
        }
    }

    /// Tracks of the active view, in display order.
    pub fn visible(&self) -> Vec<&Track> {
        match self.view {
            View::Library => self.player.catalog().tracks().iter().collect(),
            View::Queue => self.player.queue().iter().collect(),
            View::Favorites => self.resolve(self.playlists.favorites()),
            View::Recent => self.resolve(self.playlists.recently_played()),
        }
    }

    // Playlist entries whose track is not in the catalog this session are hidden.
    fn resolve<'a>(&'a self, urls: &'a [SourceUrl]) -> Vec<&'a Track> {
        let catalog = self.player.catalog();
        urls.iter().filter_map(|u| catalog.get_by_url(u)).collect()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.visible().get(self.selected).copied()
    }

    fn selected_url(&self) -> Option<SourceUrl> {
        self.selected_track().map(|t| t.url.clone())
    }

    pub fn is_favorite(&self, url: &SourceUrl) -> bool {
        self.playlists.is_favorite(url)
    }

    /// Carry out `action`. Returns true when the app should quit.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::TogglePlay => {
                self.follow_playback_on();
                let result = if self.player.current_url().is_some() {
                    self.player.toggle()
                } else {
                    self.play_selected()
                };
                self.report(result);
            }
            Action::Next => {
                self.follow_playback_on();
                let result = self.player.next();
                self.report(result);
            }
            Action::Previous => {
                self.follow_playback_on();
                let result = self.player.previous();
                self.report(result);
            }
            Action::VolumeUp => self.step_volume(self.controls.volume_step),
            Action::VolumeDown => self.step_volume(-self.controls.volume_step),
            Action::ToggleMute => self.player.toggle_mute(),
            Action::ToggleRepeat => {
                let on = !self.player.state().repeat_one;
                self.player.set_repeat(on);
            }
            Action::ToggleShuffle => {
                let on = !self.player.state().shuffle;
                self.player.set_shuffle(on);
            }
            Action::ToggleFavorite => self.toggle_favorite(),
            Action::ToggleHelp => self.help_open = !self.help_open,
            Action::CursorDown => self.move_cursor(1),
            Action::CursorUp => self.move_cursor(-1),
            Action::CursorTop => {
                self.follow_playback_off();
                self.selected = 0;
            }
            Action::CursorBottom => {
                self.follow_playback_off();
                self.selected = self.visible().len().saturating_sub(1);
            }
            Action::PlaySelected => {
                self.follow_playback_on();
                let result = self.play_selected();
                self.report(result);
            }
            Action::SeekBack => {
                let result = self.player.seek_by(-(self.controls.scrub_seconds as f64));
                self.report(result);
            }
            Action::SeekForward => {
                let result = self.player.seek_by(self.controls.scrub_seconds as f64);
                self.report(result);
            }
            Action::RateDown => self.step_rate(-self.controls.rate_step),
            Action::RateUp => self.step_rate(self.controls.rate_step),
            Action::ResetRate => self.player.set_rate(1.0),
            Action::CycleView => {
                self.view = self.view.next();
                self.selected = 0;
                self.follow_current();
            }
            Action::OpenPrompt => {
                self.help_open = false;
                self.prompt = Some(String::new());
            }
            Action::PromptChar(c) => {
                if let Some(text) = self.prompt.as_mut() {
                    text.push(c);
                }
            }
            Action::PromptBackspace => {
                if let Some(text) = self.prompt.as_mut() {
                    text.pop();
                }
            }
            Action::PromptSubmit => {
                if let Some(text) = self.prompt.take() {
                    self.open_path(&text);
                }
            }
            Action::Dismiss => {
                self.prompt = None;
                self.help_open = false;
            }
            Action::RemoveSelected => self.remove_selected(),
        }
        false
    }

    /// Drive playback and age the notices. Called every loop iteration.
    pub fn tick(&mut self, now: Instant) {
        for event in self.player.pump(now) {
            self.on_player_event(event);
        }
        self.notices.expire(now);
    }

    fn on_player_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Started(url) => {
                self.playlists.record_played(&url);
                if self.follow_playback {
                    self.follow(&url);
                }
            }
            PlayerEvent::Ended(_) => {}
            PlayerEvent::LoadFailed(e) | PlayerEvent::PlayFailed(e) => {
                self.notices.error(e.to_string());
            }
        }
    }

    fn play_selected(&mut self) -> Result<(), PlaybackError> {
        match self.selected_url() {
            Some(url) => self.player.select(&url),
            None => Ok(()),
        }
    }

    fn report(&mut self, result: Result<(), PlaybackError>) {
        if let Err(e) = result {
            self.notices.error(e.to_string());
        }
    }

    fn step_volume(&mut self, delta: f32) {
        let volume = self.player.state().volume + delta;
        // Round to the step grid so repeated presses land on 0.0 and 1.0 exactly.
        self.player.set_volume((volume * 100.0).round() / 100.0);
    }

    fn step_rate(&mut self, delta: f32) {
        let rate = self.player.state().rate + delta;
        self.player.set_rate((rate * 100.0).round() / 100.0);
    }

    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
        self.follow_current();
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    fn follow_current(&mut self) {
        if let Some(url) = self.player.current_url().cloned() {
            self.follow(&url);
        }
    }

    fn follow(&mut self, url: &SourceUrl) {
        let found = self.visible().iter().position(|t| &t.url == url);
        if let Some(i) = found {
            self.selected = i;
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        self.follow_playback_off();
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let len = len as isize;
        let next = (self.selected.min(len as usize - 1) as isize + delta).rem_euclid(len);
        self.selected = next as usize;
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Favorite the playing track, or the selected one when nothing plays.
    fn toggle_favorite(&mut self) {
        let target = self
            .player
            .current_url()
            .cloned()
            .or_else(|| self.selected_url());
        let Some(url) = target else {
            return;
        };
        let title = self
            .player
            .catalog()
            .get_by_url(&url)
            .map(|t| t.title.clone())
            .unwrap_or_else(|| url.to_string());
        if self.playlists.toggle_favorite(&url) {
            self.notices.info(format!("Added {title} to favorites"));
        } else {
            self.notices.info(format!("Removed {title} from favorites"));
        }
        self.clamp_selection();
    }

    fn remove_selected(&mut self) {
        let Some(url) = self.selected_url() else {
            return;
        };
        if let Some(track) = self.player.remove(&url) {
            self.playlists.forget(&url);
            self.notices.info(format!("Removed {}", track.title));
        }
        self.clamp_selection();
    }

    /// Add a folder (scanned) or a single file to the catalog.
    pub fn open_path(&mut self, input: &str) {
        let input = input.trim();
        if input.is_empty() {
            return;
        }
        let path = expand_home(input);

        let added = if path.is_dir() {
            let report = scan_folders(std::slice::from_ref(&path), &self.library);
            if let Some(summary) = report.failure_summary() {
                self.notices.error(summary);
            }
            self.player.merge(report.tracks)
        } else {
            let (tracks, errors) = pick_files(std::slice::from_ref(&path), &self.library);
            if let Some(e) = errors.first() {
                self.notices.error(e.to_string());
            }
            self.player.merge(tracks)
        };

        if added > 0 {
            log::info!("added {added} tracks from {}", path.display());
            self.notices.info(format!("Added {added} tracks"));
        } else if path.is_dir() {
            self.notices.info(format!("No new tracks in {}", path.display()));
        }
    }
}

fn expand_home(input: &str) -> PathBuf {
    match (input.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(input),
    }
}
