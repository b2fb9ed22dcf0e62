use super::*;
use crate::config::Settings;
use crate::library::{SourceUrl, Track};
use crate::player::fake::{Fake, FakeEngine};
use crate::player::{Player, PlayerOptions, Status};
use crate::playlists::Playlists;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn t(name: &str) -> Track {
    Track::from_path(&PathBuf::from(format!("/music/{name}.mp3")))
}

fn u(name: &str) -> SourceUrl {
    t(name).url
}

fn settings() -> Settings {
    let mut s = Settings::default();
    s.library.read_tags = false;
    s
}

fn app_with(names: &[&str]) -> (App<FakeEngine>, Rc<RefCell<Fake>>) {
    let fake = Rc::new(RefCell::new(Fake::default()));
    let mut player = Player::with_rng(
        FakeEngine(fake.clone()),
        PlayerOptions::default(),
        SmallRng::seed_from_u64(1),
    );
    player.merge(names.iter().map(|n| t(n)));
    let app = App::new(player, Playlists::new(10), &settings());
    (app, fake)
}

fn settle(app: &mut App<FakeEngine>, fake: &Rc<RefCell<Fake>>) {
    loop {
        let pending = fake.borrow().pending.len();
        if pending == 0 {
            break;
        }
        for _ in 0..pending {
            fake.borrow_mut().finish_next(true);
        }
        app.tick(Instant::now());
    }
}

#[test]
fn cursor_wraps_and_stops_following() {
    let (mut app, _fake) = app_with(&["a", "b", "c"]);
    assert!(app.follow_playback);
    app.apply(Action::CursorUp);
    assert_eq!(app.selected, 2);
    assert!(!app.follow_playback);
    app.apply(Action::CursorDown);
    assert_eq!(app.selected, 0);
}

#[test]
fn cursor_top_and_bottom() {
    let (mut app, _fake) = app_with(&["a", "b", "c"]);
    app.apply(Action::CursorBottom);
    assert_eq!(app.selected, 2);
    app.apply(Action::CursorTop);
    assert_eq!(app.selected, 0);
}

#[test]
fn cursor_on_empty_library_stays_put() {
    let (mut app, _fake) = app_with(&[]);
    app.apply(Action::CursorDown);
    app.apply(Action::CursorBottom);
    assert_eq!(app.selected, 0);
    assert!(app.selected_track().is_none());
}

#[test]
fn play_selected_records_history() {
    let (mut app, fake) = app_with(&["a", "b"]);
    app.apply(Action::CursorDown);
    app.apply(Action::PlaySelected);
    settle(&mut app, &fake);

    assert_eq!(app.player.status(), Status::Playing);
    assert_eq!(app.playlists.recently_played(), &[u("b")]);
}

#[test]
fn toggle_play_starts_selection_when_idle() {
    let (mut app, fake) = app_with(&["a", "b"]);
    app.apply(Action::TogglePlay);
    settle(&mut app, &fake);
    assert_eq!(app.player.current_url(), Some(&u("a")));

    app.apply(Action::TogglePlay);
    assert_eq!(app.player.status(), Status::Paused);
}

#[test]
fn following_playback_moves_the_cursor() {
    let (mut app, fake) = app_with(&["a", "b", "c"]);
    app.apply(Action::PlaySelected);
    settle(&mut app, &fake);
    app.apply(Action::Next);
    settle(&mut app, &fake);
    assert_eq!(app.selected, 1);

    app.apply(Action::CursorDown);
    app.apply(Action::CursorDown);
    assert!(!app.follow_playback);
    fake.borrow().last_handle().borrow_mut().ended = true;
    app.tick(Instant::now());
    settle(&mut app, &fake);
    assert_eq!(app.player.current_url(), Some(&u("c")));
    assert_eq!(app.selected, 0);
}

#[test]
fn favorite_targets_the_playing_track() {
    let (mut app, fake) = app_with(&["a", "b"]);
    app.apply(Action::PlaySelected);
    settle(&mut app, &fake);
    app.apply(Action::CursorDown);

    app.apply(Action::ToggleFavorite);
    assert!(app.is_favorite(&u("a")));
    assert!(!app.is_favorite(&u("b")));
    assert!(app.notices.latest().is_some_and(|n| n.text.contains("Added")));

    app.apply(Action::ToggleFavorite);
    assert!(!app.is_favorite(&u("a")));
}

#[test]
fn favorite_without_playback_uses_selection() {
    let (mut app, _fake) = app_with(&["a", "b"]);
    app.apply(Action::CursorDown);
    app.apply(Action::ToggleFavorite);
    assert_eq!(app.playlists.favorites(), &[u("b")]);
}

#[test]
fn views_cycle_and_show_their_tracks() {
    let (mut app, fake) = app_with(&["a", "b", "c"]);
    app.apply(Action::PlaySelected);
    settle(&mut app, &fake);
    app.apply(Action::ToggleFavorite);

    app.apply(Action::CycleView);
    assert_eq!(app.view, View::Queue);
    let queue: Vec<_> = app.visible().iter().map(|t| t.url.clone()).collect();
    assert_eq!(queue, vec![u("b"), u("c")]);

    app.apply(Action::CycleView);
    assert_eq!(app.view, View::Favorites);
    assert_eq!(app.visible().len(), 1);

    app.apply(Action::CycleView);
    assert_eq!(app.view, View::Recent);
    assert_eq!(app.visible()[0].url, u("a"));

    app.apply(Action::CycleView);
    assert_eq!(app.view, View::Library);
}

#[test]
fn removing_the_selected_track_cleans_up() {
    let (mut app, fake) = app_with(&["a", "b"]);
    app.apply(Action::PlaySelected);
    settle(&mut app, &fake);
    app.apply(Action::ToggleFavorite);

    app.apply(Action::RemoveSelected);
    assert!(app.player.current_url().is_none());
    assert_eq!(app.player.status(), Status::Idle);
    assert!(app.playlists.favorites().is_empty());
    assert!(app.playlists.recently_played().is_empty());
    assert_eq!(app.visible().len(), 1);
    assert_eq!(app.selected, 0);
}

#[test]
fn removing_last_row_clamps_the_cursor() {
    let (mut app, _fake) = app_with(&["a", "b"]);
    app.apply(Action::CursorBottom);
    app.apply(Action::RemoveSelected);
    assert_eq!(app.selected, 0);
    assert_eq!(app.selected_track().map(|t| t.url.clone()), Some(u("a")));
}

#[test]
fn volume_steps_stop_at_the_bounds() {
    let (mut app, _fake) = app_with(&[]);
    for _ in 0..20 {
        app.apply(Action::VolumeUp);
    }
    assert_eq!(app.player.state().volume, 1.0);
    for _ in 0..20 {
        app.apply(Action::VolumeDown);
    }
    assert_eq!(app.player.state().volume, 0.0);
}

#[test]
fn rate_steps_and_resets() {
    let (mut app, _fake) = app_with(&[]);
    app.apply(Action::RateUp);
    assert_eq!(app.player.state().rate, 1.25);
    app.apply(Action::RateDown);
    app.apply(Action::RateDown);
    assert_eq!(app.player.state().rate, 0.75);
    app.apply(Action::ResetRate);
    assert_eq!(app.player.state().rate, 1.0);
}

#[test]
fn repeat_and_shuffle_toggle() {
    let (mut app, _fake) = app_with(&["a"]);
    app.apply(Action::ToggleRepeat);
    app.apply(Action::ToggleShuffle);
    let state = app.player.state();
    assert!(state.repeat_one);
    assert!(state.shuffle);
    app.apply(Action::ToggleRepeat);
    assert!(!app.player.state().repeat_one);
}

#[test]
fn seek_keys_use_scrub_seconds() {
    let (mut app, fake) = app_with(&["a"]);
    app.apply(Action::PlaySelected);
    settle(&mut app, &fake);
    app.apply(Action::SeekForward);
    app.apply(Action::SeekForward);
    app.apply(Action::SeekBack);
    assert_eq!(app.player.position(), Duration::from_secs(5));
}

#[test]
fn load_failures_become_notices() {
    let (mut app, fake) = app_with(&["a"]);
    app.apply(Action::PlaySelected);
    fake.borrow_mut().finish_next(false);
    app.tick(Instant::now());
    let notice = app.notices.latest().expect("a notice");
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.text.contains("cannot load"));
}

#[test]
fn refused_play_becomes_a_notice() {
    let (mut app, fake) = app_with(&["a"]);
    fake.borrow_mut().refuse = true;
    app.apply(Action::PlaySelected);
    assert_eq!(app.player.status(), Status::Errored);
    assert!(app.notices.latest().is_some());
}

#[test]
fn prompt_editing_and_cancel() {
    let (mut app, _fake) = app_with(&[]);
    app.apply(Action::OpenPrompt);
    for c in "abc".chars() {
        app.apply(Action::PromptChar(c));
    }
    app.apply(Action::PromptBackspace);
    assert_eq!(app.prompt.as_deref(), Some("ab"));
    app.apply(Action::Dismiss);
    assert!(app.prompt.is_none());
}

#[test]
fn prompt_opens_a_folder() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("one.mp3"), b"x").unwrap();
    std::fs::write(dir.path().join("two.flac"), b"x").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

    let (mut app, _fake) = app_with(&[]);
    app.apply(Action::OpenPrompt);
    for c in dir.path().to_string_lossy().chars() {
        app.apply(Action::PromptChar(c));
    }
    app.apply(Action::PromptSubmit);

    assert!(app.prompt.is_none());
    assert_eq!(app.player.catalog().len(), 2);
    assert!(app.notices.latest().is_some_and(|n| n.text == "Added 2 tracks"));

    // Opening it again adds nothing new.
    app.open_path(&dir.path().to_string_lossy());
    assert_eq!(app.player.catalog().len(), 2);
}

#[test]
fn prompt_opens_a_single_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("song.ogg");
    std::fs::write(&file, b"x").unwrap();

    let (mut app, _fake) = app_with(&[]);
    app.open_path(&file.to_string_lossy());
    assert_eq!(app.player.catalog().len(), 1);
}

#[test]
fn prompt_reports_missing_paths() {
    let (mut app, _fake) = app_with(&[]);
    app.open_path("/definitely/not/here.mp3");
    assert!(app.player.catalog().is_empty());
    assert_eq!(
        app.notices.latest().map(|n| n.level),
        Some(NoticeLevel::Error)
    );
}

#[test]
fn help_toggles_and_dismisses() {
    let (mut app, _fake) = app_with(&[]);
    app.apply(Action::ToggleHelp);
    assert!(app.help_open);
    app.apply(Action::Dismiss);
    assert!(!app.help_open);
}

#[test]
fn quit_is_reported() {
    let (mut app, _fake) = app_with(&[]);
    assert!(!app.apply(Action::ToggleHelp));
    assert!(app.apply(Action::Quit));
}

#[test]
fn notices_expire_and_are_capped() {
    let mut notices = Notices::new(Duration::from_secs(4));
    let now = Instant::now();
    for i in 0..5 {
        notices.push(format!("n{i}"), NoticeLevel::Info, now);
    }
    assert_eq!(notices.iter().count(), 3);
    assert_eq!(notices.latest().map(|n| n.text.as_str()), Some("n4"));

    notices.expire(now + Duration::from_secs(3));
    assert!(!notices.is_empty());
    notices.expire(now + Duration::from_secs(5));
    assert!(notices.is_empty());
}
