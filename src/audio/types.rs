//! Audio-related small types shared by the engine seam and its users.

use thiserror::Error;

use crate::library::SourceUrl;

/// Identifies one load request. A completion is only applied when its
/// ticket still matches what the controller is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub url: SourceUrl,
}

/// Completion of an asynchronous load.
#[derive(Debug)]
pub struct Loaded<H> {
    pub ticket: LoadTicket,
    pub result: Result<H, EngineError>,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot open source: {0}")]
    Open(#[from] std::io::Error),
    #[error("cannot decode source: {0}")]
    Decode(String),
    #[error("seek failed: {0}")]
    Seek(String),
    #[error("audio output unavailable: {0}")]
    Output(String),
}
