use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::{App, InputMode};
use crate::audio::PlaybackPrimitive;
use crate::config;
use crate::library;
use crate::player::{PlaybackController, StatusSubscription};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: advances the controller, mirrors its status into
/// the UI model, draws, and handles keys. Returns `Ok(())` when the user quits.
pub fn run<P: PlaybackPrimitive>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<P>,
    subscription: &StatusSubscription,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        controller.tick();

        if let Some(status) = subscription.latest() {
            app.apply_status(status);
        }

        terminal.draw(|f| {
            ui::draw(
                f,
                app,
                controller.playlist(),
                &settings.ui,
                &settings.controls,
            )
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, controller, state) {
                    break;
                }
            }
        }
    }

    controller.shutdown(Duration::from_millis(settings.audio.quit_fade_out_ms));
    Ok(())
}

fn handle_prompt_key<P: PlaybackPrimitive>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<P>,
) {
    match key.code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Backspace => app.pop_input_char(),
        KeyCode::Enter => {
            let Some(path) = app.take_input() else {
                return;
            };
            if !path.exists() {
                warn!(path = %path.display(), "add: path does not exist");
                app.set_message(format!("not found: {}", path.display()));
                return;
            }

            let files = library::collect(&[path.clone()], &settings.library);
            let offered = files.len();
            let added = controller.add_tracks(files).len();
            debug!(path = %path.display(), offered, added, "add from prompt");
            app.set_message(match added {
                0 => format!("no audio files in {}", path.display()),
                1 => "added 1 track".to_string(),
                n => format!("added {n} tracks"),
            });
        }
        KeyCode::Char(c) if !c.is_control() => app.push_input_char(c),
        _ => {}
    }
}

/// Returns `true` when the user asked to quit.
fn handle_key_event<P: PlaybackPrimitive>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<P>,
    state: &mut EventLoopState,
) -> bool {
    if app.mode == InputMode::AddPath {
        state.pending_gg = false;
        handle_prompt_key(key, settings, app, controller);
        return false;
    }

    let len = controller.playlist().len();
    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('a') => app.enter_add_mode(),
        KeyCode::Esc => app.message = None,
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.follow_playback_off();
                app.top();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            app.follow_playback_off();
            app.bottom(len);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback_off();
            app.next(len);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback_off();
            app.prev(len);
        }
        KeyCode::Enter => {
            if len > 0 {
                app.follow_playback_on();
                if let Err(e) = controller.select_and_play(app.selected) {
                    warn!(error = %e, "select_and_play");
                    app.set_message(e.to_string());
                }
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            app.follow_playback_on();
            controller.toggle_play_pause();
        }
        KeyCode::Char('l') => {
            app.follow_playback_on();
            controller.play_next();
        }
        KeyCode::Char('h') => {
            app.follow_playback_on();
            controller.play_previous();
        }
        KeyCode::Char('L') | KeyCode::Char('H') => {
            let secs = settings.controls.scrub_seconds.min(i64::MAX as u64) as i64;
            let delta = if key.code == KeyCode::Char('L') { secs } else { -secs };
            if let Some(target) = app.scrub_target(delta) {
                if let Err(e) = controller.seek(target) {
                    debug!(error = %e, "scrub ignored");
                }
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            controller.set_volume(app.volume_target(settings.controls.volume_step));
        }
        KeyCode::Char('-') => {
            controller.set_volume(app.volume_target(-settings.controls.volume_step));
        }
        KeyCode::Char('m') => controller.toggle_mute(),
        _ => {}
    }

    false
}
