//! Playback controller: the catalog, the transport state machine around the
//! single engine handle, navigation and progress sampling.

mod controller;
mod error;
mod navigation;
mod state;
mod ticker;
mod transport;

pub use controller::{Player, PlayerOptions};
pub use error::PlaybackError;
pub use navigation::{Direction, pick_index};
pub use state::{MAX_RATE, MIN_RATE, PlaybackState, PlayerEvent};
pub use ticker::ProgressTicker;
pub use transport::Status;

#[cfg(test)]
pub(crate) mod fake;
