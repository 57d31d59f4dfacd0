use super::*;
use crate::audio::{Listener, ListenerId, ListenerSet, MediaEvent, PlaybackPrimitive};
use crate::config::PlaybackSettings;
use crate::library::{IncomingFile, LocatorRegistry, SourceLocator};
use crate::playlist::PlaylistStore;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Bind(u64),
    Play,
    Pause,
    Seek(Duration),
    Volume(f32),
}

#[derive(Default)]
struct Script {
    calls: Vec<Call>,
    volume: f32,
    position: Duration,
    duration: Option<Duration>,
    fail_play: bool,
    queued: Vec<MediaEvent>,
    listeners: ListenerSet,
}

/// In-memory primitive. Tests keep a clone to inspect calls and inject events.
#[derive(Clone, Default)]
struct ScriptedPrimitive(Rc<RefCell<Script>>);

impl ScriptedPrimitive {
    /// Deliver `event` to the listeners attached right now.
    fn emit(&self, event: MediaEvent) {
        self.0.borrow_mut().listeners.emit(event);
    }

    fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }

    fn binds(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Bind(_)))
            .count()
    }
}

impl PlaybackPrimitive for ScriptedPrimitive {
    fn bind(&mut self, locator: &SourceLocator) {
        let mut s = self.0.borrow_mut();
        s.calls.push(Call::Bind(locator.id()));
        s.volume = 1.0;
        s.position = Duration::ZERO;
        s.queued.clear();
        let duration = s.duration;
        s.queued.push(MediaEvent::MetadataReady { duration });
    }

    fn play(&mut self) {
        let mut s = self.0.borrow_mut();
        s.calls.push(Call::Play);
        let outcome = if s.fail_play {
            MediaEvent::PlayFailed("unsupported codec".into())
        } else {
            MediaEvent::PlayStarted
        };
        s.queued.push(outcome);
    }

    fn pause(&mut self) {
        self.0.borrow_mut().calls.push(Call::Pause);
    }

    fn set_position(&mut self, position: Duration) {
        let mut s = self.0.borrow_mut();
        s.calls.push(Call::Seek(position));
        s.position = position;
    }

    fn position(&self) -> Duration {
        self.0.borrow().position
    }

    fn duration(&self) -> Option<Duration> {
        self.0.borrow().duration
    }

    fn set_volume(&mut self, volume: f32) {
        let mut s = self.0.borrow_mut();
        s.calls.push(Call::Volume(volume));
        s.volume = volume;
    }

    fn volume(&self) -> f32 {
        self.0.borrow().volume
    }

    fn attach(&mut self) -> Listener {
        self.0.borrow_mut().listeners.attach()
    }

    fn detach(&mut self, id: ListenerId) {
        self.0.borrow_mut().listeners.detach(id);
    }

    fn poll(&mut self) {
        let mut s = self.0.borrow_mut();
        let queued: Vec<MediaEvent> = s.queued.drain(..).collect();
        for event in queued {
            s.listeners.emit(event);
        }
    }
}

fn audio(name: &str) -> IncomingFile {
    IncomingFile {
        name: name.into(),
        path: PathBuf::from("/music").join(name),
        media_type: "audio/mpeg".into(),
    }
}

fn player_with(
    names: &[&str],
    select_first_on_add: bool,
) -> (PlaybackController<ScriptedPrimitive>, ScriptedPrimitive) {
    let primitive = ScriptedPrimitive::default();
    primitive.0.borrow_mut().duration = Some(Duration::from_secs(180));
    let settings = PlaybackSettings {
        select_first_on_add,
    };
    let mut player = PlaybackController::new(
        primitive.clone(),
        PlaylistStore::new(LocatorRegistry::new()),
        &settings,
        0.75,
    );
    player.add_tracks(names.iter().map(|n| audio(n)));
    primitive.clear_calls();
    (player, primitive)
}

fn player(n: usize) -> (PlaybackController<ScriptedPrimitive>, ScriptedPrimitive) {
    let names: Vec<String> = (0..n).map(|i| format!("track{i}.mp3")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    player_with(&refs, false)
}

fn assert_consistent(player: &PlaybackController<ScriptedPrimitive>) {
    let status = player.status();
    if status.is_playing {
        assert!(status.current_index.is_some());
    }
    if let Some(i) = status.current_index {
        assert!(i < player.playlist().len());
    }
    assert!((0.0..=1.0).contains(&status.volume));
}

#[test]
fn play_next_on_empty_playlist_does_nothing() {
    let (mut player, primitive) = player(0);
    player.play_next();
    player.play_previous();

    assert_eq!(player.status().current_index, None);
    assert_eq!(player.state(), PlayerState::Empty);
    assert!(primitive.calls().is_empty());
}

#[test]
fn play_next_from_nothing_selects_first_and_plays() {
    let (mut player, primitive) = player_with(&["A.mp3", "B.mp3", "C.mp3"], false);
    assert_eq!(player.status().current_index, None);

    player.play_next();

    assert_eq!(player.status().current_index, Some(0));
    assert!(player.status().is_playing);
    assert_eq!(player.state(), PlayerState::Playing);
    assert!(primitive.calls().contains(&Call::Play));
}

#[test]
fn play_next_wraps_from_last_to_first() {
    let (mut player, _) = player(3);
    player.select_and_play(2).unwrap();

    player.play_next();
    assert_eq!(player.status().current_index, Some(0));
}

#[test]
fn play_previous_wraps_from_first_to_last() {
    let (mut player, _) = player(3);
    player.select_and_play(0).unwrap();

    player.play_previous();
    assert_eq!(player.status().current_index, Some(2));
}

#[test]
fn play_previous_from_nothing_selects_first() {
    let (mut player, _) = player(3);
    player.play_previous();
    assert_eq!(player.status().current_index, Some(0));
}

#[test]
fn n_nexts_return_to_the_starting_track() {
    for n in 1..=5 {
        for start in 0..n {
            let (mut player, _) = player(n);
            player.select_and_play(start).unwrap();
            for _ in 0..n {
                player.play_next();
                assert_consistent(&player);
            }
            assert_eq!(player.status().current_index, Some(start), "n={n} start={start}");
        }
    }
}

#[test]
fn previous_undoes_next() {
    let n = 4;
    for start in 0..n {
        let (mut player, _) = player(n);
        player.select_and_play(start).unwrap();
        player.play_next();
        player.play_previous();
        assert_eq!(player.status().current_index, Some(start));
    }
}

#[test]
fn toggling_twice_from_loaded_returns_to_loaded() {
    let (mut player, primitive) = player_with(&["A.mp3", "B.mp3"], true);
    assert_eq!(player.state(), PlayerState::Loaded);

    player.toggle_play_pause();
    assert_eq!(player.state(), PlayerState::Playing);
    player.toggle_play_pause();

    assert_eq!(player.state(), PlayerState::Loaded);
    assert_eq!(player.status().current_index, Some(0));
    assert_eq!(primitive.calls(), vec![Call::Play, Call::Pause]);

    // A late start confirmation does not flip the paused state back.
    player.tick();
    assert_eq!(player.state(), PlayerState::Loaded);
}

#[test]
fn toggle_without_a_track_does_nothing() {
    let (mut player, primitive) = player(2);
    player.toggle_play_pause();

    assert_eq!(player.state(), PlayerState::Empty);
    assert!(primitive.calls().is_empty());
}

#[test]
fn out_of_range_selection_is_rejected_without_side_effects() {
    let (mut player, primitive) = player(2);
    player.select_and_play(1).unwrap();
    primitive.clear_calls();

    assert_eq!(
        player.select_and_play(2),
        Err(PlayerError::OutOfRange { index: 2, len: 2 })
    );
    assert_eq!(player.status().current_index, Some(1));
    assert!(player.status().is_playing);
    assert!(primitive.calls().is_empty());
}

#[test]
fn ended_from_a_superseded_track_does_not_advance() {
    let (mut player, primitive) = player(3);
    player.select_and_play(0).unwrap();
    // Queued for track 0's binding but not yet applied.
    primitive.emit(MediaEvent::Ended);

    player.select_and_play(1).unwrap();
    player.tick();

    assert_eq!(player.status().current_index, Some(1));
    assert!(player.status().is_playing);
    assert_eq!(primitive.binds(), 2);
}

#[test]
fn ended_for_the_current_track_advances() {
    let (mut player, primitive) = player(3);
    player.select_and_play(1).unwrap();
    player.tick();

    primitive.emit(MediaEvent::Ended);
    player.process_events();

    assert_eq!(player.status().current_index, Some(2));
    assert!(player.status().is_playing);
}

#[test]
fn ended_on_the_last_track_wraps_around() {
    let (mut player, primitive) = player(2);
    player.select_and_play(1).unwrap();
    primitive.emit(MediaEvent::Ended);
    player.process_events();

    assert_eq!(player.status().current_index, Some(0));
}

#[test]
fn events_queued_behind_ended_are_not_applied_to_the_next_track() {
    let (mut player, primitive) = player(3);
    player.select_and_play(0).unwrap();
    player.tick();

    primitive.emit(MediaEvent::Ended);
    primitive.emit(MediaEvent::PositionChanged(Duration::from_secs(200)));
    player.process_events();

    assert_eq!(player.status().current_index, Some(1));
    assert_eq!(player.status().elapsed, Duration::ZERO);
}

#[test]
fn stale_position_updates_are_dropped() {
    let (mut player, primitive) = player(2);
    player.select_and_play(0).unwrap();
    primitive.emit(MediaEvent::PositionChanged(Duration::from_secs(30)));

    player.select_and_play(1).unwrap();
    player.process_events();

    assert_eq!(player.status().elapsed, Duration::ZERO);
}

#[test]
fn volume_is_reapplied_to_a_new_binding() {
    let (mut player, primitive) = player(3);
    player.select_and_play(0).unwrap();
    player.set_volume(0.3);

    player.select_and_play(1).unwrap();

    assert_eq!(primitive.volume(), 0.3);
    let calls = primitive.calls();
    let last_bind = calls.iter().rposition(|c| matches!(c, Call::Bind(_))).unwrap();
    let last_volume = calls.iter().rposition(|c| matches!(c, Call::Volume(_))).unwrap();
    let first_play_after_bind = calls[last_bind..]
        .iter()
        .position(|c| *c == Call::Play)
        .map(|p| p + last_bind)
        .unwrap();
    assert!(last_bind < last_volume && last_volume < first_play_after_bind);
}

#[test]
fn failed_start_leaves_the_track_loaded() {
    let (mut player, primitive) = player(2);
    primitive.0.borrow_mut().fail_play = true;

    player.select_and_play(0).unwrap();
    assert!(player.status().is_playing);

    player.tick();
    assert_eq!(player.state(), PlayerState::Loaded);
    assert_eq!(player.status().current_index, Some(0));
    assert_consistent(&player);

    // The controller stays usable.
    primitive.0.borrow_mut().fail_play = false;
    player.toggle_play_pause();
    player.tick();
    assert_eq!(player.state(), PlayerState::Playing);
}

#[test]
fn metadata_sets_total_and_position_updates_elapsed() {
    let (mut player, primitive) = player(1);
    player.select_and_play(0).unwrap();
    assert_eq!(player.status().total, None);

    player.tick();
    assert_eq!(player.status().total, Some(Duration::from_secs(180)));

    primitive.emit(MediaEvent::PositionChanged(Duration::from_secs(12)));
    player.process_events();
    assert_eq!(player.status().elapsed, Duration::from_secs(12));
}

#[test]
fn seek_requires_a_bound_track() {
    let (mut player, primitive) = player(2);
    assert_eq!(
        player.seek(Duration::from_secs(5)),
        Err(PlayerError::NothingLoaded)
    );
    assert!(primitive.calls().is_empty());
}

#[test]
fn seek_updates_elapsed_before_the_primitive_confirms() {
    let (mut player, primitive) = player(2);
    player.select_and_play(0).unwrap();
    player.tick();

    player.seek(Duration::from_secs(42)).unwrap();

    assert_eq!(player.status().elapsed, Duration::from_secs(42));
    assert!(primitive.calls().contains(&Call::Seek(Duration::from_secs(42))));
}

#[test]
fn set_volume_clamps_and_ignores_nan() {
    let (mut player, primitive) = player(1);
    player.set_volume(1.7);
    assert_eq!(player.status().volume, 1.0);
    player.set_volume(-0.2);
    assert_eq!(player.status().volume, 0.0);
    player.set_volume(f32::NAN);
    assert_eq!(player.status().volume, 0.0);
    assert_eq!(primitive.volume(), 0.0);
}

#[test]
fn mute_toggle_restores_the_last_audible_volume() {
    let (mut player, _) = player(1);
    player.set_volume(0.4);

    player.toggle_mute();
    assert_eq!(player.status().volume, 0.0);
    player.toggle_mute();
    assert_eq!(player.status().volume, 0.4);
}

fn player_at_volume(default_volume: f32) -> PlaybackController<ScriptedPrimitive> {
    PlaybackController::new(
        ScriptedPrimitive::default(),
        PlaylistStore::new(LocatorRegistry::new()),
        &PlaybackSettings {
            select_first_on_add: false,
        },
        default_volume,
    )
}

#[test]
fn unmute_before_any_change_restores_the_default_volume() {
    let mut player = player_at_volume(0.3);
    player.toggle_mute();
    assert_eq!(player.status().volume, 0.0);
    player.toggle_mute();
    assert_eq!(player.status().volume, 0.3);
}

#[test]
fn silent_default_unmutes_to_the_fallback_volume() {
    let mut player = player_at_volume(0.0);
    assert_eq!(player.status().volume, 0.0);
    player.toggle_mute();
    assert_eq!(player.status().volume, 0.75);
}

#[test]
fn volume_is_independent_of_play_state() {
    let (mut player, primitive) = player(1);
    player.set_volume(0.5);
    assert_eq!(player.state(), PlayerState::Empty);
    assert_eq!(primitive.volume(), 0.5);
}

#[test]
fn first_add_binds_the_first_track_paused() {
    let (mut player, primitive) = player_with(&[], true);
    player.add_tracks(vec![audio("A.mp3"), audio("B.mp3")]);

    assert_eq!(player.state(), PlayerState::Loaded);
    assert_eq!(player.status().current_index, Some(0));
    assert!(!primitive.calls().contains(&Call::Play));

    player.select_and_play(1).unwrap();
    player.add_tracks(vec![audio("C.mp3")]);
    assert_eq!(player.status().current_index, Some(1));
}

#[test]
fn intake_keeps_only_audio_files() {
    let (mut player, _) = player_with(&[], false);
    let text = IncomingFile {
        name: "notes.txt".into(),
        path: PathBuf::from("/music/notes.txt"),
        media_type: "text/plain".into(),
    };

    let ids = player.add_tracks(vec![audio("Song.mp3"), text]);

    assert_eq!(ids.len(), 1);
    assert_eq!(player.playlist().len(), 1);
    assert_eq!(player.playlist().get(0).unwrap().display_name, "Song");
}

#[test]
fn subscribers_see_distinct_updates_until_unsubscribed() {
    let (mut player, _) = player(2);
    let sub = player.subscribe();
    assert_eq!(sub.latest().unwrap().current_index, None);

    player.select_and_play(1).unwrap();
    let seen = sub.latest().unwrap();
    assert_eq!(seen.current_index, Some(1));
    assert!(seen.is_playing);

    // No change, nothing new.
    player.process_events();
    player.toggle_play_pause();
    player.toggle_play_pause();
    assert!(sub.latest().is_some());
    assert!(sub.latest().is_none());

    player.unsubscribe(sub.id());
    player.play_next();
    assert!(sub.latest().is_none());
}

#[test]
fn shutdown_silences_and_pauses() {
    let (mut player, primitive) = player(1);
    player.select_and_play(0).unwrap();

    player.shutdown(Duration::ZERO);

    assert!(!player.status().is_playing);
    assert_eq!(primitive.volume(), 0.0);
    assert_eq!(primitive.calls().last(), Some(&Call::Pause));
}

#[test]
fn invariants_hold_across_a_mixed_session() {
    let (mut player, primitive) = player(3);
    assert_consistent(&player);

    player.toggle_play_pause();
    assert_consistent(&player);
    player.play_next();
    assert_consistent(&player);
    player.tick();
    assert_consistent(&player);
    player.seek(Duration::from_secs(10)).unwrap();
    assert_consistent(&player);
    primitive.emit(MediaEvent::Ended);
    player.process_events();
    assert_consistent(&player);
    player.play_previous();
    assert_consistent(&player);
    player.toggle_play_pause();
    assert_consistent(&player);
    let _ = player.select_and_play(7);
    assert_consistent(&player);
    player.set_volume(3.0);
    assert_consistent(&player);
}

#[test]
fn first_track_selection_reaches_subscribers() {
    let (mut player, _) = player_with(&[], true);
    let sub = player.subscribe();
    assert_eq!(sub.latest().map(|s| s.current_index), Some(None));

    player.add_tracks(vec![audio("A.mp3")]);
    let seen = sub.latest().unwrap();
    assert_eq!(seen.current_index, Some(0));
    assert!(!seen.is_playing);
}
