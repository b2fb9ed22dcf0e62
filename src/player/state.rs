use crate::library::SourceUrl;

use super::error::PlaybackError;
use super::transport::Status;

pub const MIN_RATE: f32 = 0.25;
pub const MAX_RATE: f32 = 2.0;

/// Snapshot of everything a renderer needs about playback.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current: Option<SourceUrl>,
    pub status: Status,
    pub is_playing: bool,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub volume: f32,
    pub rate: f32,
    pub repeat_one: bool,
    pub shuffle: bool,
}

/// Things that happened during `Player::pump`.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Started(SourceUrl),
    Ended(SourceUrl),
    LoadFailed(PlaybackError),
    PlayFailed(PlaybackError),
}
