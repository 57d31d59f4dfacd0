//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, InputMode};
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::player::{PlaybackStatus, PlayerState};
use crate::playlist::PlaylistStore;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play selected song");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next song");
    // H/L and +/- are filled dynamically from config.
    map.insert("m", "mute");
    map.insert("a", "add songs");
    map.insert("q", "quit");
    map
});

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Render the controls help text, incorporating scrub seconds and volume step.
fn controls_text(controls: &ControlsSettings) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "h/l", "H/L", "enter", "space/p", "+/-", "m", "gg/G", "a", "q",
    ];
    order
        .iter()
        .filter_map(|k| match *k {
            "H/L" => Some(format!("[H/L] scrub -/+{}s", controls.scrub_seconds)),
            "+/-" => Some(format!(
                "[+/-] volume ±{}%",
                (controls.volume_step * 100.0).round() as u32
            )),
            _ => CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)),
        })
        .collect::<Vec<String>>()
        .join(" | ")
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

/// The status line: current song with times, play state and volume.
fn status_text(status: &PlaybackStatus, playlist: &PlaylistStore, ui: &UiSettings) -> String {
    let mut parts: Vec<String> = Vec::new();

    let track = status.current_index.and_then(|i| playlist.get(i).ok());
    match (status.state(), track) {
        (PlayerState::Empty, _) | (_, None) => parts.push("No song selected".to_string()),
        (state, Some(track)) => {
            match now_playing_time_text(status.elapsed, status.total, ui) {
                Some(time) => parts.push(format!("Song: {} [{}]", track.display_name, time)),
                None => parts.push(format!("Song: {}", track.display_name)),
            }
            let label = if state == PlayerState::Playing { "Playing" } else { "Paused" };
            parts.push(label.to_string());
        }
    }

    if status.volume > 0.0 {
        parts.push(format!("Vol: {}%", (status.volume * 100.0).round() as u32));
    } else {
        parts.push("Vol: muted".to_string());
    }
    parts.push(format!("Tracks: {}", playlist.len()));

    parts.join(" • ")
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    playlist: &PlaylistStore,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let prompt_height = if app.mode == InputMode::AddPath || app.message.is_some() {
        3
    } else {
        0
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(prompt_height),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadence ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status_par = Paragraph::new(status_text(&app.status, playlist, ui_settings))
        .block(Block::bordered().padding(LEFT_PAD).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Progress
    let elapsed = format_mmss(app.status.elapsed);
    let total = app.status.total.map_or_else(|| "--:--".to_string(), format_mmss);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(app.status.progress().unwrap_or(0.0))
        .label(format!("{elapsed} / {total}"));
    frame.render_widget(gauge, chunks[2]);

    // Main list
    {
        // Center the selected item when possible by creating a visible window.
        // Important: only build ListItems for the visible window (avoid allocating the entire list).
        let total = playlist.len();
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

        let visible_items: Vec<ListItem> = playlist
            .iter()
            .enumerate()
            .skip(start)
            .take(end - start)
            .map(|(i, track)| {
                let active = app.status.current_index == Some(i);
                let marker = match (active, app.status.is_playing) {
                    (true, true) => "♪ ",
                    (true, false) => "· ",
                    _ => "  ",
                };
                let item = ListItem::new(format!("{marker}{}", track.display_name));
                if active { item.bold() } else { item }
            })
            .collect();

        let title = if total == 0 {
            " playlist is empty: press [a] to add songs ".to_string()
        } else {
            " playlist ".to_string()
        };
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

    // Prompt / message line
    if prompt_height > 0 {
        let (text, title) = if app.mode == InputMode::AddPath {
            (format!("{}_", app.input), " add file or folder (enter adds, esc cancels) ")
        } else {
            (app.message.clone().unwrap_or_default(), " info ")
        };
        let prompt = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .padding(LEFT_PAD)
                .title(title),
        );
        frame.render_widget(prompt, chunks[4]);
    }

    let footer = Paragraph::new(controls_text(controls_settings))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[5]);
}
