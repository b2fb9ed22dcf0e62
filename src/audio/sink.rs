//! The rodio-backed engine handle.
//!
//! Each handle wraps its own paused `Sink`; nothing is shared between
//! handles, so dropping one releases everything it held.

use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink};

use crate::library::Source;

use super::engine::EngineHandle;
use super::media::{MediaReader, open_decoder};
use super::types::EngineError;

pub struct RodioHandle {
    sink: Sink,
    source: Source,
    duration: Option<Duration>,
    looping: bool,
}

/// Create a paused handle for an already decoded source.
pub(super) fn create_handle(
    stream: &OutputStream,
    decoder: Decoder<MediaReader>,
    source: Source,
    duration: Option<Duration>,
) -> RodioHandle {
    let sink = Sink::connect_new(stream.mixer());
    sink.append(decoder);
    sink.pause();
    RodioHandle {
        sink,
        source,
        duration,
        looping: false,
    }
}

impl EngineHandle for RodioHandle {
    fn play(&mut self) -> Result<(), EngineError> {
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek(&mut self, to: Duration) -> Result<(), EngineError> {
        self.sink
            .try_seek(to)
            .map_err(|e| EngineError::Seek(e.to_string()))
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn set_rate(&mut self, rate: f32) {
        self.sink.set_speed(rate);
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn poll_ended(&mut self) -> bool {
        if self.sink.is_paused() || !self.sink.empty() {
            return false;
        }
        if !self.looping {
            return true;
        }

        // Repeat-one: queue the same source again on this sink.
        match open_decoder(&self.source) {
            Ok((decoder, _)) => {
                self.sink.append(decoder);
                false
            }
            Err(e) => {
                log::warn!("cannot restart looping track: {e}");
                true
            }
        }
    }

    fn fade_out(&mut self, over: Duration) {
        let fade_out_ms = over.as_millis() as u64;
        if fade_out_ms == 0 {
            self.sink.set_volume(0.0);
            return;
        }
        let steps: u64 = 20;
        let step_ms = (fade_out_ms / steps).max(1);
        let start = self.sink.volume();
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            self.sink.set_volume(start * (1.0 - t));
            thread::sleep(Duration::from_millis(step_ms));
        }
        self.sink.set_volume(0.0);
    }
}
