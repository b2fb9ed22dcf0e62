//! Explicit track selection: file arguments and streamed (ephemeral) input.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::LibrarySettings;

use super::blob::BlobStore;
use super::model::Track;
use super::scan::{is_audio_file, track_from_path};

#[derive(Debug, Error)]
pub enum PickError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a supported audio file", .0.display())]
    NotAudio(PathBuf),
}

/// Turn user-chosen files into tracks. Bad entries are returned alongside, not fatal.
pub fn pick_files(paths: &[PathBuf], settings: &LibrarySettings) -> (Vec<Track>, Vec<PickError>) {
    let mut tracks = Vec::new();
    let mut errors = Vec::new();
    for path in paths {
        match pick_file(path, settings) {
            Ok(track) => tracks.push(track),
            Err(e) => {
                log::warn!("{e}");
                errors.push(e);
            }
        }
    }
    (tracks, errors)
}

fn pick_file(path: &Path, settings: &LibrarySettings) -> Result<Track, PickError> {
    let meta = path.metadata().map_err(|source| PickError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_file() || !is_audio_file(path, settings) {
        return Err(PickError::NotAudio(path.to_path_buf()));
    }
    // Absolute locators keep identity stable regardless of the working directory.
    let abs = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    Ok(track_from_path(&abs, settings))
}

/// Read `reader` to the end into a blob owned by the returned track.
pub fn import_reader<R: Read>(name: &str, mut reader: R, store: &BlobStore) -> io::Result<Track> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    if bytes.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("{name}: no audio data"),
        ));
    }
    let blob = store.insert(bytes);
    log::info!("imported {name} as {} ({} bytes)", blob.url(), blob.len());
    Ok(Track::from_blob(name, blob))
}
