use std::io;
use std::path::PathBuf;

use crate::app::App;
use crate::audio::{Engine, RodioEngine};
use crate::config::{self, Settings};
use crate::library::{BlobStore, Track, default_folders, import_reader, pick_files, scan_folders};
use crate::player::{Player, PlayerOptions};
use crate::playlists::{self, Playlists};

/// Build the app: gather tracks from the command line (or the music
/// folders), restore playlists and apply playback defaults. Nothing plays yet.
pub fn build_app(
    engine: RodioEngine,
    paths: &[PathBuf],
    settings: &Settings,
    blobs: &BlobStore,
) -> App<RodioEngine> {
    let mut problems: Vec<String> = Vec::new();
    if !engine.has_output() {
        problems.push("no audio output device; playback is unavailable".to_string());
    }

    let mut player = Player::new(engine, PlayerOptions::from(settings));
    let tracks = collect_tracks(paths, settings, blobs, &mut problems);
    let added = player.merge(tracks);
    log::info!("catalog holds {added} tracks");

    let playlists = restore_playlists(settings, &mut problems);
    let mut app = App::new(player, playlists, settings);
    for p in problems {
        app.notices.error(p);
    }
    if app.player.catalog().is_empty() {
        app.notices.info("No tracks yet. Press o to open a folder or file.");
    }
    app
}

fn collect_tracks(
    paths: &[PathBuf],
    settings: &Settings,
    blobs: &BlobStore,
    problems: &mut Vec<String>,
) -> Vec<Track> {
    if paths.is_empty() {
        let folders = if settings.library.folders.is_empty() {
            default_folders()
        } else {
            settings.library.folders.clone()
        };
        let report = scan_folders(&folders, &settings.library);
        // Missing default folders are normal, only complain about configured ones.
        if !settings.library.folders.is_empty() {
            problems.extend(report.failure_summary());
        }
        return report.tracks;
    }

    let mut tracks = Vec::new();
    for path in paths {
        if path.as_os_str() == "-" {
            match import_reader("stdin", io::stdin().lock(), blobs) {
                Ok(track) => tracks.push(track),
                Err(e) => problems.push(format!("cannot read stdin: {e}")),
            }
        } else if path.is_dir() {
            let report = scan_folders(std::slice::from_ref(path), &settings.library);
            problems.extend(report.failure_summary());
            tracks.extend(report.tracks);
        } else {
            let (picked, errors) = pick_files(std::slice::from_ref(path), &settings.library);
            problems.extend(errors.iter().map(ToString::to_string));
            tracks.extend(picked);
        }
    }
    tracks
}

fn playlists_path(settings: &Settings) -> Option<PathBuf> {
    if !settings.playlists.persist {
        return None;
    }
    settings
        .playlists
        .path
        .clone()
        .or_else(config::default_playlists_path)
}

fn restore_playlists(settings: &Settings, problems: &mut Vec<String>) -> Playlists {
    let limit = settings.playlists.history_limit;
    let Some(path) = playlists_path(settings) else {
        return Playlists::new(limit);
    };
    match playlists::load_playlists(&path, limit) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("{e}");
            problems.push(format!("playlists not restored: {e}"));
            Playlists::new(limit)
        }
    }
}

/// Write playlists back when persistence is on. Failures are only logged:
/// by now the terminal is restored and we are on our way out.
pub fn save_playlists<E: Engine>(app: &App<E>, settings: &Settings) {
    let Some(path) = playlists_path(settings) else {
        return;
    };
    if let Err(e) = playlists::save_playlists(&path, &app.playlists) {
        log::error!("{e}");
        eprintln!("turntable: {e}");
    }
}
