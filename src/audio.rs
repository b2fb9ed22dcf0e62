//! Audio engine: the seam the playback controller talks to, and its rodio
//! implementation (output stream, background decode thread, per-track sinks).

mod engine;
mod media;
mod output;
mod sink;
mod thread;
mod types;

pub use engine::{Engine, EngineHandle};
pub use output::RodioEngine;
pub use types::{EngineError, LoadTicket, Loaded};

#[cfg(test)]
mod tests;
