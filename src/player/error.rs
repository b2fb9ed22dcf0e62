use thiserror::Error;

use crate::library::SourceUrl;

/// Failures of controller operations. None of them are fatal: the
/// controller is left stopped (or unchanged) and the caller decides how
/// to tell the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    #[error("cannot load {url}: {reason}")]
    Load { url: SourceUrl, reason: String },
    #[error("cannot start {url}: {reason}")]
    Play { url: SourceUrl, reason: String },
    #[error("seek failed: {reason}")]
    Seek { reason: String },
    #[error("{0} is not in the catalog")]
    NotInCatalog(SourceUrl),
}
