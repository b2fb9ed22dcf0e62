use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::blob::Blob;

/// Artist shown for tracks whose tags carry no artist.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Identity of a track: `file:///abs/path` or `blob:turntable/<n>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceUrl(String);

impl SourceUrl {
    /// Locator for a file. Relative paths are resolved against the working
    /// directory; bytes that are not valid UTF-8 and reserved characters are
    /// percent-encoded.
    pub fn for_path(path: &Path) -> Self {
        let abs = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        match Url::from_file_path(&abs) {
            Ok(url) => Self(url.into()),
            Err(()) => Self(format!("file://{}", abs.to_string_lossy())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blob(&self) -> bool {
        self.0.starts_with("blob:")
    }
}

impl From<&str> for SourceUrl {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SourceUrl {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the audio bytes of a track come from.
#[derive(Clone, Debug)]
pub enum Source {
    File(PathBuf),
    /// In-memory bytes, valid for the process lifetime.
    Blob(Blob),
}

#[derive(Clone, Debug)]
pub struct Track {
    pub url: SourceUrl,
    pub source: Source,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration: Option<Duration>,
    pub artwork: Option<PathBuf>,
    pub display: String,
}

impl Track {
    /// A file track with metadata derived from its file name only.
    pub fn from_path(path: &Path) -> Self {
        let title = title_from_name(path.file_name().and_then(|s| s.to_str()).unwrap_or(""));
        Self {
            url: SourceUrl::for_path(path),
            source: Source::File(path.to_path_buf()),
            display: title.clone(),
            title,
            artist: UNKNOWN_ARTIST.to_string(),
            album: None,
            duration: None,
            artwork: None,
        }
    }

    /// A track backed by an in-memory blob; `name` supplies the title.
    pub fn from_blob(name: &str, blob: Blob) -> Self {
        let title = title_from_name(name);
        Self {
            url: blob.url(),
            source: Source::Blob(blob),
            display: title.clone(),
            title,
            artist: UNKNOWN_ARTIST.to_string(),
            album: None,
            duration: None,
            artwork: None,
        }
    }

    /// Artist, or `None` for the placeholder.
    pub fn known_artist(&self) -> Option<&str> {
        let a = self.artist.trim();
        if a.is_empty() || a == UNKNOWN_ARTIST {
            None
        } else {
            Some(a)
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            Source::File(p) => Some(p),
            Source::Blob(_) => None,
        }
    }
}

/// Strip a trailing extension from a file name; used when there are no tags.
pub fn title_from_name(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
        .trim();
    if stem.is_empty() {
        "UNKNOWN".to_string()
    } else {
        stem.to_string()
    }
}
