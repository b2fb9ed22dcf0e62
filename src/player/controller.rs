use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::audio::{Engine, EngineError, EngineHandle, LoadTicket, Loaded};
use crate::config::Settings;
use crate::library::{Catalog, SourceUrl, Track};

use super::error::PlaybackError;
use super::navigation::{Direction, pick_index};
use super::state::{MAX_RATE, MIN_RATE, PlaybackState, PlayerEvent};
use super::ticker::ProgressTicker;
use super::transport::{Status, Transport};

/// Volume restored by unmuting when there is nothing better to restore.
const UNMUTE_VOLUME: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct PlayerOptions {
    pub volume: f32,
    pub rate: f32,
    pub repeat_one: bool,
    pub shuffle: bool,
    pub progress_interval: Duration,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            volume: 1.0,
            rate: 1.0,
            repeat_one: false,
            shuffle: false,
            progress_interval: Duration::from_millis(250),
        }
    }
}

impl From<&Settings> for PlayerOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            volume: settings.audio.default_volume,
            rate: settings.audio.playback_rate,
            repeat_one: settings.playback.repeat_one,
            shuffle: settings.playback.shuffle,
            progress_interval: Duration::from_millis(settings.audio.progress_interval_ms),
        }
    }
}

/// Owner of the catalog and of the single engine handle.
///
/// Every mutation goes through here, which is what keeps the identity of
/// `current`, the transport state and the progress ticker consistent.
pub struct Player<E: Engine> {
    engine: E,
    catalog: Catalog,
    transport: Transport<E::Handle>,
    current: Option<SourceUrl>,
    generation: u64,
    position: Duration,
    duration: Duration,
    volume: f32,
    muted_from: Option<f32>,
    rate: f32,
    repeat_one: bool,
    shuffle: bool,
    ticker: ProgressTicker,
    rng: SmallRng,
    events: Vec<PlayerEvent>,
}

impl<E: Engine> Player<E> {
    pub fn new(engine: E, options: PlayerOptions) -> Self {
        Self::with_rng(engine, options, SmallRng::from_os_rng())
    }

    /// Like `new`, with a caller-provided shuffle source.
    pub fn with_rng(engine: E, options: PlayerOptions, rng: SmallRng) -> Self {
        Self {
            engine,
            catalog: Catalog::new(),
            transport: Transport::Idle,
            current: None,
            generation: 0,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            volume: clamp_volume(options.volume).unwrap_or(1.0),
            muted_from: None,
            rate: clamp_rate(options.rate).unwrap_or(1.0),
            repeat_one: options.repeat_one,
            shuffle: options.shuffle,
            ticker: ProgressTicker::new(options.progress_interval),
            rng,
            events: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Append tracks, de-duplicated by url.
    pub fn merge<I>(&mut self, tracks: I) -> usize
    where
        I: IntoIterator<Item = Track>,
    {
        self.catalog.merge(tracks)
    }

    /// Remove a track. Removing the current track stops playback and
    /// clears `current` before returning.
    pub fn remove(&mut self, url: &SourceUrl) -> Option<Track> {
        if self.current.as_ref() == Some(url) {
            log::info!("current track {url} removed, stopping");
            self.stop();
            self.current = None;
            self.duration = Duration::ZERO;
        }
        self.catalog.remove(url)
    }

    pub fn current_url(&self) -> Option<&SourceUrl> {
        self.current.as_ref()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref().and_then(|u| self.catalog.get_by_url(u))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current.as_ref().and_then(|u| self.catalog.position(u))
    }

    /// Tracks after the current one, in catalog order.
    pub fn queue(&self) -> &[Track] {
        match &self.current {
            Some(url) => self.catalog.after(url),
            None => &[],
        }
    }

    pub fn status(&self) -> Status {
        self.transport.status()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn state(&self) -> PlaybackState {
        let status = self.transport.status();
        PlaybackState {
            current: self.current.clone(),
            status,
            is_playing: status == Status::Playing,
            position_secs: self.position.as_secs_f64(),
            duration_secs: self.duration.as_secs_f64(),
            volume: self.volume,
            rate: self.rate,
            repeat_one: self.repeat_one,
            shuffle: self.shuffle,
        }
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Release any handle and start loading `url`. Does not start playback.
    pub fn load(&mut self, url: &SourceUrl) -> Result<(), PlaybackError> {
        self.begin_load(url, false)
    }

    /// Load `url` and play it as soon as it is ready.
    pub fn select(&mut self, url: &SourceUrl) -> Result<(), PlaybackError> {
        self.load(url)?;
        self.play()
    }

    fn begin_load(&mut self, url: &SourceUrl, play_when_ready: bool) -> Result<(), PlaybackError> {
        let seeded = self
            .catalog
            .get_by_url(url)
            .ok_or_else(|| PlaybackError::NotInCatalog(url.clone()))?
            .duration
            .unwrap_or_default();

        self.release();
        self.generation += 1;
        self.current = Some(url.clone());
        self.position = Duration::ZERO;
        self.duration = seeded;

        let ticket = LoadTicket {
            generation: self.generation,
            url: url.clone(),
        };
        let Some(track) = self.catalog.get_by_url(url) else {
            return Err(PlaybackError::NotInCatalog(url.clone()));
        };

        match self.engine.begin_load(ticket, track) {
            Ok(()) => {
                log::debug!("loading {url} (generation {})", self.generation);
                self.transport = Transport::Loading {
                    generation: self.generation,
                    play_when_ready,
                };
                Ok(())
            }
            Err(e) => {
                let err = PlaybackError::Load {
                    url: url.clone(),
                    reason: e.to_string(),
                };
                log::warn!("{err}");
                self.transport = Transport::Errored(err.clone());
                Err(err)
            }
        }
    }

    /// Stop playback and drop the handle. `current` is kept so `play` can reload it.
    pub fn stop(&mut self) {
        self.release();
        self.position = Duration::ZERO;
    }

    fn release(&mut self) {
        // Dropping the old transport drops its handle.
        drop(self.transport.replace(Transport::Idle));
        self.ticker.stop();
    }

    pub fn play(&mut self) -> Result<(), PlaybackError> {
        let Some(url) = self.current.clone() else {
            return Ok(());
        };

        match self.transport.status() {
            Status::Playing => Ok(()),
            Status::Loading => {
                if let Transport::Loading {
                    play_when_ready, ..
                } = &mut self.transport
                {
                    *play_when_ready = true;
                }
                Ok(())
            }
            Status::Ready | Status::Paused => self.start_handle(url),
            Status::Idle | Status::Ended | Status::Errored => self.begin_load(&url, true),
        }
    }

    fn start_handle(&mut self, url: SourceUrl) -> Result<(), PlaybackError> {
        let mut result = Ok(());
        let mut first_start = false;

        self.transport = match self.transport.replace(Transport::Idle) {
            Transport::Ready(mut h) => {
                first_start = true;
                match h.play() {
                    Ok(()) => Transport::Playing(h),
                    Err(e) => Transport::Errored(self.play_failure(&url, e, &mut result)),
                }
            }
            Transport::Paused(mut h) => match h.play() {
                Ok(()) => Transport::Playing(h),
                Err(e) => Transport::Errored(self.play_failure(&url, e, &mut result)),
            },
            other => other,
        };

        self.sync_ticker();
        if first_start && result.is_ok() {
            log::info!("playing {url}");
            self.events.push(PlayerEvent::Started(url));
        }
        result
    }

    fn play_failure(
        &self,
        url: &SourceUrl,
        e: EngineError,
        result: &mut Result<(), PlaybackError>,
    ) -> PlaybackError {
        let err = PlaybackError::Play {
            url: url.clone(),
            reason: e.to_string(),
        };
        log::warn!("{err}");
        *result = Err(err.clone());
        err
    }

    pub fn pause(&mut self) {
        self.transport = match self.transport.replace(Transport::Idle) {
            Transport::Playing(mut h) => {
                h.pause();
                self.position = self.capped(h.position());
                Transport::Paused(h)
            }
            Transport::Loading { generation, .. } => Transport::Loading {
                generation,
                play_when_ready: false,
            },
            other => other,
        };
        self.sync_ticker();
    }

    pub fn toggle(&mut self) -> Result<(), PlaybackError> {
        if self.transport.status() == Status::Playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Jump to `secs`, clamped to `[0, duration]`. No-op without a handle.
    pub fn seek_to(&mut self, secs: f64) -> Result<(), PlaybackError> {
        let max = self.duration.as_secs_f64();
        let Some(handle) = self.transport.handle_mut() else {
            return Ok(());
        };

        let target = if secs.is_nan() { 0.0 } else { secs.clamp(0.0, max) };
        let to = Duration::from_secs_f64(target);
        self.position = to;

        match handle.seek(to) {
            Ok(()) => Ok(()),
            Err(e) => {
                let actual = handle.position();
                self.position = self.capped(actual);
                let err = PlaybackError::Seek {
                    reason: e.to_string(),
                };
                log::warn!("{err}");
                Err(err)
            }
        }
    }

    pub fn seek_by(&mut self, delta_secs: f64) -> Result<(), PlaybackError> {
        self.seek_to(self.position.as_secs_f64() + delta_secs)
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.muted_from = None;
        self.apply_volume(volume);
    }

    /// Mute, or restore the level from before muting.
    pub fn toggle_mute(&mut self) {
        if self.volume > 0.0 {
            self.muted_from = Some(self.volume);
            self.apply_volume(0.0);
        } else {
            let restore = self
                .muted_from
                .take()
                .filter(|v| *v > 0.0)
                .unwrap_or(UNMUTE_VOLUME);
            self.apply_volume(restore);
        }
    }

    fn apply_volume(&mut self, volume: f32) {
        let Some(volume) = clamp_volume(volume) else {
            return;
        };
        self.volume = volume;
        if let Some(h) = self.transport.handle_mut() {
            h.set_volume(volume);
        }
    }

    pub fn set_rate(&mut self, rate: f32) {
        let Some(rate) = clamp_rate(rate) else {
            return;
        };
        self.rate = rate;
        if let Some(h) = self.transport.handle_mut() {
            h.set_rate(rate);
        }
    }

    pub fn set_repeat(&mut self, repeat_one: bool) {
        self.repeat_one = repeat_one;
        if let Some(h) = self.transport.handle_mut() {
            h.set_looping(repeat_one);
        }
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    pub fn next(&mut self) -> Result<(), PlaybackError> {
        self.step(Direction::Forward)
    }

    pub fn previous(&mut self) -> Result<(), PlaybackError> {
        self.step(Direction::Backward)
    }

    fn step(&mut self, direction: Direction) -> Result<(), PlaybackError> {
        let current = self.current_index();
        let len = self.catalog.len();
        let Some(target) = pick_index(current, len, direction, self.shuffle, &mut self.rng) else {
            return Ok(());
        };
        let Some(url) = self.catalog.get(target).map(|t| t.url.clone()) else {
            return Ok(());
        };
        self.select(&url)
    }

    /// Apply load completions, react to natural track end and sample the
    /// position when the ticker fires. Returns what happened since the last call.
    pub fn pump(&mut self, now: Instant) -> Vec<PlayerEvent> {
        while let Some(loaded) = self.engine.poll_loaded() {
            self.apply_loaded(loaded);
        }

        let ended = match &mut self.transport {
            Transport::Playing(h) => h.poll_ended(),
            _ => false,
        };
        if ended {
            self.on_track_ended();
        }

        if self.ticker.fire(now) {
            if let Some(pos) = self.transport.handle().map(|h| h.position()) {
                self.position = self.capped(pos);
            }
        }

        std::mem::take(&mut self.events)
    }

    fn apply_loaded(&mut self, loaded: Loaded<E::Handle>) {
        let Loaded { ticket, result } = loaded;

        let play_when_ready = match &self.transport {
            Transport::Loading {
                generation,
                play_when_ready,
            } if *generation == ticket.generation && self.current.as_ref() == Some(&ticket.url) => {
                *play_when_ready
            }
            _ => {
                log::debug!(
                    "ignoring stale load of {} (generation {})",
                    ticket.url,
                    ticket.generation
                );
                return;
            }
        };

        match result {
            Ok(mut handle) => {
                handle.set_volume(self.volume);
                handle.set_rate(self.rate);
                handle.set_looping(self.repeat_one);
                if let Some(d) = handle.duration().filter(|d| !d.is_zero()) {
                    self.duration = d;
                }
                self.transport = Transport::Ready(handle);
                log::debug!("loaded {}", ticket.url);

                if play_when_ready {
                    if let Err(e) = self.start_handle(ticket.url) {
                        self.events.push(PlayerEvent::PlayFailed(e));
                    }
                }
            }
            Err(e) => {
                let err = PlaybackError::Load {
                    url: ticket.url,
                    reason: e.to_string(),
                };
                log::warn!("{err}");
                self.transport = Transport::Errored(err.clone());
                self.sync_ticker();
                self.events.push(PlayerEvent::LoadFailed(err));
            }
        }
    }

    fn on_track_ended(&mut self) {
        let Some(url) = self.current.clone() else {
            return;
        };
        log::debug!("{url} ended");
        self.release();
        self.transport = Transport::Ended;
        self.position = self.duration;
        self.events.push(PlayerEvent::Ended(url));

        // A looping handle never ends, so reaching here with repeat-one means
        // the restart itself failed; stay put rather than skipping ahead.
        if self.repeat_one {
            return;
        }
        if let Err(e) = self.next() {
            self.events.push(PlayerEvent::LoadFailed(e));
        }
    }

    /// Fade out the live handle and release it.
    pub fn shutdown(&mut self, fade: Duration) {
        if let Transport::Playing(h) = &mut self.transport {
            h.fade_out(fade);
        }
        self.release();
    }

    fn sync_ticker(&mut self) {
        if self.transport.status() == Status::Playing {
            self.ticker.start(Instant::now());
        } else {
            self.ticker.stop();
        }
    }

    fn capped(&self, pos: Duration) -> Duration {
        if self.duration.is_zero() {
            pos
        } else {
            pos.min(self.duration)
        }
    }
}

impl<E: Engine> Drop for Player<E> {
    fn drop(&mut self) {
        self.release();
    }
}

fn clamp_volume(volume: f32) -> Option<f32> {
    (!volume.is_nan()).then(|| volume.clamp(0.0, 1.0))
}

fn clamp_rate(rate: f32) -> Option<f32> {
    (!rate.is_nan()).then(|| rate.clamp(MIN_RATE, MAX_RATE))
}
