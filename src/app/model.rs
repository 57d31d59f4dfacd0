//! Application model types: `App` and `InputMode`.
//!
//! The `App` struct holds UI-only state: the list cursor, the add-path prompt
//! and the last playback status received from the controller.

use std::path::PathBuf;
use std::time::Duration;

use crate::player::PlaybackStatus;

/// What keystrokes currently mean.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a path to add to the playlist.
    AddPath,
}

/// The main application model.
pub struct App {
    pub selected: usize,
    pub status: PlaybackStatus,
    pub follow_playback: bool,

    pub mode: InputMode,
    pub input: String,
    pub message: Option<String>,
}

impl App {
    /// Create a new `App` seeded with the controller's current status.
    pub fn new(status: PlaybackStatus) -> Self {
        let selected = status.current_index.unwrap_or(0);
        Self {
            selected,
            status,
            follow_playback: true,
            mode: InputMode::Normal,
            input: String::new(),
            message: None,
        }
    }

    /// Take in a status published by the controller. The cursor jumps to the
    /// playing track whenever the current index changes, unless the user is
    /// roaming the list.
    pub fn apply_status(&mut self, status: PlaybackStatus) {
        let index_changed = status.current_index != self.status.current_index;
        if let Some(idx) = status.current_index {
            if index_changed {
                self.follow_playback = true;
            }
            if self.follow_playback {
                self.selected = idx;
            }
        }
        self.status = status;
    }

    /// Enable following playback (cursor follows currently playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }
    /// Disable follow-playback.
    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Move selection to the next track. Wraps around to the first.
    pub fn next(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % len;
    }

    /// Move selection to the previous track. Wraps around to the last.
    pub fn prev(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = if self.selected == 0 || self.selected >= len {
            len - 1
        } else {
            self.selected - 1
        };
    }

    pub fn top(&mut self) {
        self.selected = 0;
    }

    pub fn bottom(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Enter the add-path prompt with an empty line.
    pub fn enter_add_mode(&mut self) {
        self.mode = InputMode::AddPath;
        self.input.clear();
        self.message = None;
    }
    /// Leave the prompt, discarding what was typed.
    pub fn cancel_input(&mut self) {
        self.mode = InputMode::Normal;
        self.input.clear();
    }
    pub fn push_input_char(&mut self, c: char) {
        self.input.push(c);
    }
    pub fn pop_input_char(&mut self) {
        self.input.pop();
    }

    /// Leave the prompt and return the typed path, with a leading `~` expanded.
    pub fn take_input(&mut self) -> Option<PathBuf> {
        self.mode = InputMode::Normal;
        let raw = std::mem::take(&mut self.input);
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Some(rest) = raw.strip_prefix('~') {
            if rest.is_empty() || rest.starts_with('/') {
                if let Some(home) = std::env::var_os("HOME") {
                    return Some(PathBuf::from(home).join(rest.trim_start_matches('/')));
                }
            }
        }
        Some(PathBuf::from(raw))
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    /// Position to seek to when scrubbing by `delta_secs`, kept within
    /// `0..=total` the way a progress slider would. `None` without a track.
    pub fn scrub_target(&self, delta_secs: i64) -> Option<Duration> {
        self.status.current_index?;

        let current = self.status.elapsed.as_secs_f64();
        let mut target = (current + delta_secs as f64).max(0.0);
        if let Some(total) = self.status.total {
            target = target.min(total.as_secs_f64());
        }
        Some(Duration::from_secs_f64(target))
    }

    /// Volume after nudging the current one by `delta`.
    pub fn volume_target(&self, delta: f32) -> f32 {
        (self.status.volume + delta).clamp(0.0, 1.0)
    }
}
