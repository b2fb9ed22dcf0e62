use std::time::Duration;

use crate::library::Track;

use super::types::{EngineError, LoadTicket, Loaded};

/// Produces engine handles. Loads are asynchronous: `begin_load` only posts
/// the request, and the finished handle shows up later from `poll_loaded`.
pub trait Engine {
    type Handle: EngineHandle;

    /// Post a load for `track`. Fails synchronously only when the engine
    /// cannot accept work at all (e.g. no output device).
    fn begin_load(&mut self, ticket: LoadTicket, track: &Track) -> Result<(), EngineError>;

    /// Next finished load, if any. Never blocks.
    fn poll_loaded(&mut self) -> Option<Loaded<Self::Handle>>;
}

/// One decoded track bound to the output. Dropping it releases the output.
pub trait EngineHandle {
    fn play(&mut self) -> Result<(), EngineError>;
    fn pause(&mut self);
    fn seek(&mut self, to: Duration) -> Result<(), EngineError>;
    fn position(&self) -> Duration;
    /// Length reported by the decoder, when it knows.
    fn duration(&self) -> Option<Duration>;
    fn set_volume(&mut self, volume: f32);
    fn set_rate(&mut self, rate: f32);
    /// While looping the handle restarts itself and never reports an end.
    fn set_looping(&mut self, looping: bool);
    /// True once playback ran out and will not restart.
    fn poll_ended(&mut self) -> bool;
    /// Ramp the volume down to zero over `over`, blocking.
    fn fade_out(&mut self, over: Duration);
}
