use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collection::{Playlist, Playlists};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("playlist store i/o: {0}")]
    Io(#[from] io::Error),
    #[error("playlist store is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot serialize playlists: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default, rename = "playlist")]
    playlists: Vec<Playlist>,
}

/// Read the store at `path`. A missing file is an empty collection.
pub fn load_playlists(path: &Path, history_limit: usize) -> Result<Playlists, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("no playlist store at {}", path.display());
            return Ok(Playlists::new(history_limit));
        }
        Err(e) => return Err(e.into()),
    };
    let file: StoreFile = toml::from_str(&text)?;
    log::info!(
        "loaded {} playlists from {}",
        file.playlists.len(),
        path.display()
    );
    Ok(Playlists::from_stored(file.playlists, history_limit))
}

/// Write the store, creating parent directories. Goes through a temporary
/// sibling so a crash mid-write leaves the old file intact.
pub fn save_playlists(path: &Path, playlists: &Playlists) -> Result<(), StoreError> {
    let file = StoreFile {
        playlists: playlists.persistable(),
    };
    let text = toml::to_string_pretty(&file)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("toml.tmp");
    fs::write(&tmp, text)?;
    fs::rename(&tmp, path)?;
    log::debug!("saved playlists to {}", path.display());
    Ok(())
}
