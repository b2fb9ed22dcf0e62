use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::display_from_fields;
use super::model::Track;

const ARTWORK_NAMES: [&str; 5] = ["cover.jpg", "cover.png", "folder.jpg", "folder.png", "front.jpg"];

/// A folder that could not be read. Scanning continues past it.
#[derive(Debug, Error)]
#[error("cannot read {}: {reason}", folder.display())]
pub struct ScanFailure {
    pub folder: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ScanReport {
    pub tracks: Vec<Track>,
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    /// One-line summary for the user, only when something failed.
    pub fn failure_summary(&self) -> Option<String> {
        match self.failures.as_slice() {
            [] => None,
            [one] => Some(one.to_string()),
            many => Some(format!(
                "{} folders could not be read (first: {})",
                many.len(),
                many[0].folder.display()
            )),
        }
    }
}

/// Platform default folders: `$XDG_MUSIC_DIR`, `~/Music`, `~/Downloads`.
pub fn default_folders() -> Vec<PathBuf> {
    let mut folders: Vec<PathBuf> = Vec::new();
    if let Some(dir) = env::var_os("XDG_MUSIC_DIR").filter(|v| !v.is_empty()) {
        folders.push(PathBuf::from(dir));
    }
    if let Some(home) = env::var_os("HOME") {
        let home = PathBuf::from(home);
        folders.push(home.join("Music"));
        folders.push(home.join("Downloads"));
    }
    let mut seen = std::collections::HashSet::new();
    folders.retain(|f| seen.insert(f.clone()));
    folders
}

pub(super) fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Scan every folder; unreadable folders are logged and reported, never fatal.
pub fn scan_folders(folders: &[PathBuf], settings: &LibrarySettings) -> ScanReport {
    let mut report = ScanReport::default();
    for folder in folders {
        match scan(folder, settings) {
            Ok(mut tracks) => {
                log::info!("scanned {}: {} tracks", folder.display(), tracks.len());
                report.tracks.append(&mut tracks);
            }
            Err(failure) => {
                log::warn!("{failure}");
                report.failures.push(failure);
            }
        }
    }
    report
}

/// Scan a single folder. Entries are returned in file-name order.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Result<Vec<Track>, ScanFailure> {
    let meta = fs::metadata(dir).map_err(|e| ScanFailure {
        folder: dir.to_path_buf(),
        reason: e.to_string(),
    })?;
    if !meta.is_dir() {
        return Err(ScanFailure {
            folder: dir.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    // Walk from the resolved root so every locator is absolute and matches
    // what `pick_files` produces for the same file.
    let root = dir
        .canonicalize()
        .or_else(|_| std::path::absolute(dir))
        .unwrap_or_else(|_| dir.to_path_buf());

    let mut walker = WalkDir::new(&root)
        .follow_links(settings.follow_links)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()));

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut artwork_cache: HashMap<PathBuf, Option<PathBuf>> = HashMap::new();
    let mut tracks: Vec<Track> = Vec::new();

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(ScanFailure {
                    folder: dir.to_path_buf(),
                    reason: err.to_string(),
                });
            }
            Err(err) => {
                log::warn!("skipping entry under {}: {err}", dir.display());
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_dir() || !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let mut track = track_from_path(path, settings);
        if let Some(parent) = path.parent() {
            track.artwork = artwork_cache
                .entry(parent.to_path_buf())
                .or_insert_with(|| find_artwork(parent))
                .clone();
        }
        tracks.push(track);
    }

    Ok(tracks)
}

/// Build a track for one file, reading tags when enabled.
pub fn track_from_path(path: &Path, settings: &LibrarySettings) -> Track {
    let mut track = Track::from_path(path);

    if settings.read_tags {
        match lofty::read_from_path(path) {
            Ok(tagged) => {
                track.duration = Some(tagged.properties().duration());

                if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    if let Some(v) = tag.title().filter(|v| !v.trim().is_empty()) {
                        track.title = v.trim().to_string();
                    }
                    if let Some(v) = tag.artist().filter(|v| !v.trim().is_empty()) {
                        track.artist = v.trim().to_string();
                    }
                    if let Some(v) = tag.album().filter(|v| !v.trim().is_empty()) {
                        track.album = Some(v.trim().to_string());
                    }
                }
            }
            Err(e) => log::debug!("no tags for {}: {e}", path.display()),
        }
    }

    track.display = display_from_fields(
        Some(path),
        track.url.as_str(),
        &track.title,
        track.known_artist(),
        track.album.as_deref(),
        &settings.display_fields,
        &settings.display_separator,
    );
    track
}

fn find_artwork(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut names: Vec<PathBuf> = entries.filter_map(Result::ok).map(|e| e.path()).collect();
    names.sort();
    ARTWORK_NAMES.iter().find_map(|wanted| {
        names
            .iter()
            .find(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.eq_ignore_ascii_case(wanted))
                    .unwrap_or(false)
            })
            .cloned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackDisplayField;
    use crate::library::UNKNOWN_ARTIST;
    use std::fs;
    use tempfile::tempdir;

    fn filename_settings() -> LibrarySettings {
        LibrarySettings {
            read_tags: false,
            display_fields: vec![TrackDisplayField::Filename],
            ..LibrarySettings::default()
        }
    }

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.m4a"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn scan_filters_non_audio_and_keeps_file_name_order() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("a.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let tracks = scan(dir.path(), &filename_settings()).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].title, "a");
        assert_eq!(tracks[1].title, "b");
        assert!(tracks.iter().all(|t| t.artist == UNKNOWN_ARTIST));
        assert!(tracks[0].url.as_str().starts_with("file://"));
    }

    #[test]
    fn scan_is_shallow_by_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let tracks = scan(dir.path(), &filename_settings()).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].display, "root");

        let settings = LibrarySettings {
            recursive: true,
            ..filename_settings()
        };
        assert_eq!(scan(dir.path(), &settings).unwrap().len(), 2);
    }

    #[test]
    fn scan_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        fs::write(d1.join("one.mp3"), b"not real").unwrap();
        fs::write(d2.join("two.mp3"), b"not real").unwrap();

        // WalkDir depth counts root as 0, children as 1, grandchildren as 2...
        let settings = LibrarySettings {
            recursive: true,
            max_depth: Some(2),
            ..filename_settings()
        };
        let names: Vec<String> = scan(dir.path(), &settings)
            .unwrap()
            .into_iter()
            .map(|t| t.display)
            .collect();
        assert!(names.contains(&"root".to_string()));
        assert!(names.contains(&"one".to_string()));
        assert!(!names.contains(&"two".to_string()));
    }

    #[test]
    fn scan_skips_hidden_by_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let tracks = scan(dir.path(), &filename_settings()).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].display, "visible");
    }

    #[test]
    fn scan_finds_artwork_beside_tracks() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("song.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("Cover.JPG"), b"jpeg").unwrap();

        let tracks = scan(dir.path(), &filename_settings()).unwrap();
        let art = tracks[0].artwork.as_ref().unwrap();
        assert_eq!(art.file_name().unwrap(), "Cover.JPG");
    }

    #[test]
    fn scan_folders_reports_missing_folder_and_keeps_going() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("ok.mp3"), b"not real").unwrap();
        let missing = dir.path().join("does-not-exist");

        let report = scan_folders(&[missing.clone(), dir.path().to_path_buf()], &filename_settings());
        assert_eq!(report.tracks.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].folder, missing);
        assert!(report.failure_summary().unwrap().contains("does-not-exist"));
    }

    #[test]
    fn failure_summary_counts_multiple_folders() {
        let report = scan_folders(
            &[PathBuf::from("/nonexistent/a"), PathBuf::from("/nonexistent/b")],
            &filename_settings(),
        );
        assert!(report.tracks.is_empty());
        let summary = report.failure_summary().unwrap();
        assert!(summary.starts_with("2 folders could not be read"));
    }

    #[test]
    fn scan_of_a_file_is_a_failure() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("x.mp3");
        fs::write(&file, b"not real").unwrap();
        assert!(scan(&file, &filename_settings()).is_err());
    }
}
