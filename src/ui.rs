//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. It only
//! reads from `App`; every change goes through `App::apply`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, NoticeLevel};
use crate::audio::Engine;
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::player::Status;

/// Render the shortcut help, incorporating the configured steps.
fn controls_lines(controls: &ControlsSettings) -> Vec<String> {
    let rows: [(&str, String); 18] = [
        ("space/p", "play/pause".to_string()),
        ("l/→  h/←", "next/previous song".to_string()),
        ("+/↑  -/↓", format!("volume +/-{:.0}%", controls.volume_step * 100.0)),
        ("m", "mute".to_string()),
        (",/.", format!("seek -/+{}s", controls.scrub_seconds)),
        ("[/]", format!("rate -/+{}", controls.rate_step)),
        ("=", "reset rate".to_string()),
        ("r", "repeat one".to_string()),
        ("s", "shuffle".to_string()),
        ("f", "favorite".to_string()),
        ("j/k", "up/down".to_string()),
        ("gg/G", "top/bottom".to_string()),
        ("enter", "play selected song".to_string()),
        ("tab", "switch list".to_string()),
        ("o", "open folder or file".to_string()),
        ("d", "remove from library".to_string()),
        ("?", "close help".to_string()),
        ("q", "quit".to_string()),
    ];
    rows.iter()
        .map(|(k, v)| format!("{k:>9}  {v}"))
        .collect()
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(
    elapsed: Duration,
    total: Option<Duration>,
    ui: &UiSettings,
) -> Option<String> {
    if ui.now_playing_time_fields.is_empty() {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    let rem = t.saturating_sub(elapsed);
                    parts.push(format!("-{}", format_mmss(rem)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn status_text<E: Engine>(app: &App<E>) -> String {
    let state = app.player.state();
    let mut parts: Vec<String> = Vec::new();

    match app.player.current_track() {
        Some(track) => {
            let mark = if app.is_favorite(&track.url) { " ♥" } else { "" };
            parts.push(format!("Song: {}{}", track.display, mark));
        }
        None => parts.push("Song: -".to_string()),
    }
    parts.push(state.status.label().to_string());

    if state.volume == 0.0 {
        parts.push("Vol: muted".to_string());
    } else {
        parts.push(format!("Vol: {:.0}%", state.volume * 100.0));
    }
    if (state.rate - 1.0).abs() > f32::EPSILON {
        parts.push(format!("Rate: {:.2}x", state.rate));
    }
    parts.push(format!("Shuffle: {}", on_off(state.shuffle)));
    parts.push(format!("Repeat-one: {}", on_off(state.repeat_one)));

    if app.follow_playback {
        parts.push("CURSOR: Follow".to_string());
    } else {
        parts.push("CURSOR: Free-roam".to_string());
    }

    parts.join(" • ")
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw<E: Engine>(
    frame: &mut Frame,
    app: &App<E>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" turntable ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status_par = Paragraph::new(status_text(app))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Progress
    {
        let elapsed = app.player.position();
        let total = Some(app.player.duration()).filter(|d| !d.is_zero());
        let ratio = match total {
            Some(t) => (elapsed.as_secs_f64() / t.as_secs_f64()).clamp(0.0, 1.0),
            None => 0.0,
        };
        let label = match app.player.status() {
            Status::Loading => "loading…".to_string(),
            Status::Errored => "error".to_string(),
            _ => now_playing_time_text(elapsed, total, ui_settings).unwrap_or_default(),
        };
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" progress "))
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(ratio)
            .label(label);
        frame.render_widget(gauge, chunks[2]);
    }

    // Main list
    {
        let tracks = app.visible();
        let current = app.player.current_url();

        // Center the selected item when possible by creating a visible window.
        // Important: only build ListItems for the visible window (avoid allocating the entire list).
        let total = tracks.len();
        let list_height = chunks[3].height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = tracks[start..end]
            .iter()
            .map(|t| {
                let playing = if Some(&t.url) == current { "▶ " } else { "  " };
                let fav = if app.is_favorite(&t.url) { " ♥" } else { "" };
                ListItem::new(format!("{playing}{}{fav}", t.display))
            })
            .collect();

        let title = format!("{}({}) ", app.view.title(), total);
        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[3], &mut state);
    }

    // Footer: newest notice, else a hint.
    let footer = match app.notices.latest() {
        Some(n) if n.level == NoticeLevel::Error => Paragraph::new(n.text.as_str()).red(),
        Some(n) => Paragraph::new(n.text.as_str()),
        None => Paragraph::new("[?] help | [o] open | [tab] switch list | [q] quit").dim(),
    };
    let footer = footer.block(
        Block::default()
            .borders(Borders::ALL)
            .title(" messages ")
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            }),
    );
    frame.render_widget(footer, chunks[4]);

    if app.help_open {
        let lines = controls_lines(controls_settings);
        let popup_area = centered_rect_sized(44, lines.len() as u16 + 2, chunks[3]);
        frame.render_widget(Clear, popup_area);
        let help = Paragraph::new(lines.join("\n")).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls (? closes) "),
        );
        frame.render_widget(help, popup_area);
    }

    if let Some(text) = &app.prompt {
        let popup_area = centered_rect_sized(72, 3, frame.area());
        frame.render_widget(Clear, popup_area);
        let prompt = Paragraph::new(format!("{text}_")).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" open folder or file (enter/esc) "),
        );
        frame.render_widget(prompt, popup_area);
    }
}
