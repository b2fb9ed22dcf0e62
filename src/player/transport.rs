use super::error::PlaybackError;

/// Transport state. A handle exists exactly in `Ready`, `Playing` and
/// `Paused`, so "playing without a handle" cannot be expressed.
pub enum Transport<H> {
    Idle,
    Loading { generation: u64, play_when_ready: bool },
    Ready(H),
    Playing(H),
    Paused(H),
    Ended,
    Errored(PlaybackError),
}

/// Handle-free view of `Transport` for renderers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Ended,
    Errored,
}

impl<H> Transport<H> {
    pub fn status(&self) -> Status {
        match self {
            Self::Idle => Status::Idle,
            Self::Loading { .. } => Status::Loading,
            Self::Ready(_) => Status::Ready,
            Self::Playing(_) => Status::Playing,
            Self::Paused(_) => Status::Paused,
            Self::Ended => Status::Ended,
            Self::Errored(_) => Status::Errored,
        }
    }

    pub fn handle(&self) -> Option<&H> {
        match self {
            Self::Ready(h) | Self::Playing(h) | Self::Paused(h) => Some(h),
            _ => None,
        }
    }

    pub fn handle_mut(&mut self) -> Option<&mut H> {
        match self {
            Self::Ready(h) | Self::Playing(h) | Self::Paused(h) => Some(h),
            _ => None,
        }
    }

    /// Replace the state, returning the old one (and with it any handle).
    pub fn replace(&mut self, next: Transport<H>) -> Transport<H> {
        std::mem::replace(self, next)
    }
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Stopped",
            Self::Loading => "Loading",
            Self::Ready => "Ready",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Ended => "Ended",
            Self::Errored => "Error",
        }
    }
}
