//! The playback state machine.
//!
//! `PlaybackController` owns the playlist and the single live binding of a
//! `PlaybackPrimitive`. Commands mutate the current index and the primitive;
//! primitive events flow back through one listener that is replaced on every
//! track change, so events from a superseded track are never seen.

use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::audio::{Listener, MediaEvent, PlaybackPrimitive};
use crate::config::PlaybackSettings;
use crate::library::{IncomingFile, TrackId};
use crate::playlist::{PlaylistError, PlaylistStore};

use super::status::{
    PlaybackStatus, StatusSubscription, StatusWatchers, SubscriptionId,
};

/// Volume restored by `toggle_mute` when the configured default is silent.
const UNMUTE_FALLBACK_VOLUME: f32 = 0.75;
const FADE_STEPS: u32 = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("track index {index} is out of range (playlist has {len} tracks)")]
    OutOfRange { index: usize, len: usize },
    #[error("no track is loaded")]
    NothingLoaded,
}

impl From<PlaylistError> for PlayerError {
    fn from(e: PlaylistError) -> Self {
        match e {
            PlaylistError::OutOfRange { index, len } => Self::OutOfRange { index, len },
        }
    }
}

pub struct PlaybackController<P: PlaybackPrimitive> {
    playlist: PlaylistStore,
    primitive: P,
    listener: Option<Listener>,
    status: PlaybackStatus,
    unmuted_volume: f32,
    select_first_on_add: bool,
    watchers: StatusWatchers,
}

impl<P: PlaybackPrimitive> PlaybackController<P> {
    pub fn new(
        mut primitive: P,
        playlist: PlaylistStore,
        settings: &PlaybackSettings,
        default_volume: f32,
    ) -> Self {
        let volume = if default_volume.is_nan() {
            UNMUTE_FALLBACK_VOLUME
        } else {
            default_volume.clamp(0.0, 1.0)
        };
        primitive.set_volume(volume);

        Self {
            playlist,
            primitive,
            listener: None,
            status: PlaybackStatus::new(volume),
            unmuted_volume: if volume > 0.0 { volume } else { UNMUTE_FALLBACK_VOLUME },
            select_first_on_add: settings.select_first_on_add,
            watchers: StatusWatchers::default(),
        }
    }

    pub fn playlist(&self) -> &PlaylistStore {
        &self.playlist
    }

    pub fn status(&self) -> &PlaybackStatus {
        &self.status
    }

    #[cfg(test)]
    pub fn state(&self) -> super::status::PlayerState {
        self.status.state()
    }

    /// Register for status updates. The subscription receives the current
    /// status right away and every distinct status after that.
    pub fn subscribe(&mut self) -> StatusSubscription {
        self.watchers.subscribe(&self.status)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.watchers.unsubscribe(id);
    }

    /// Append the audio items of `files` to the playlist.
    ///
    /// With `select_first_on_add`, the first track is bound (paused) when
    /// nothing was selected yet.
    pub fn add_tracks<I>(&mut self, files: I) -> Vec<TrackId>
    where
        I: IntoIterator<Item = IncomingFile>,
    {
        let ids = self.playlist.add_tracks(files);

        if self.select_first_on_add && self.status.current_index.is_none() && !ids.is_empty() {
            if let Err(e) = self.rebind(0) {
                warn!(error = %e, "could not select the first track");
            }
        }

        self.publish();
        ids
    }

    /// Bind the track at `index` and start playing it.
    pub fn select_and_play(&mut self, index: usize) -> Result<(), PlayerError> {
        let len = self.playlist.len();
        if index >= len {
            return Err(PlayerError::OutOfRange { index, len });
        }

        self.rebind(index)?;
        self.status.is_playing = true;
        self.primitive.play();

        self.publish();
        Ok(())
    }

    /// Playing -> paused, paused -> playing. Does nothing without a bound track.
    pub fn toggle_play_pause(&mut self) {
        if self.status.current_index.is_none() {
            return;
        }

        if self.status.is_playing {
            self.primitive.pause();
            self.status.is_playing = false;
        } else {
            self.primitive.play();
            self.status.is_playing = true;
        }

        self.publish();
    }

    /// Advance to the next track, wrapping to the first after the last.
    pub fn play_next(&mut self) {
        let len = self.playlist.len();
        if len == 0 {
            return;
        }

        let next = match self.status.current_index {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        if let Err(e) = self.select_and_play(next) {
            warn!(error = %e, "play next failed");
        }
    }

    /// Step back to the previous track, wrapping to the last before the first.
    pub fn play_previous(&mut self) {
        let len = self.playlist.len();
        if len == 0 {
            return;
        }

        let prev = match self.status.current_index {
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        if let Err(e) = self.select_and_play(prev) {
            warn!(error = %e, "play previous failed");
        }
    }

    /// Move the playback position. `elapsed` is updated right away; the
    /// primitive's next position report settles it.
    ///
    /// The position is passed through unchecked.
    pub fn seek(&mut self, position: Duration) -> Result<(), PlayerError> {
        if self.status.current_index.is_none() {
            return Err(PlayerError::NothingLoaded);
        }

        self.primitive.set_position(position);
        self.status.elapsed = position;

        self.publish();
        Ok(())
    }

    /// Set the output gain, clamped to `0.0..=1.0`. NaN is ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }

        let volume = volume.clamp(0.0, 1.0);
        self.status.volume = volume;
        if volume > 0.0 {
            self.unmuted_volume = volume;
        }
        self.primitive.set_volume(volume);

        self.publish();
    }

    /// Silence the output, or restore the last audible volume. Until the
    /// volume is changed that is the default volume the controller was built
    /// with.
    pub fn toggle_mute(&mut self) {
        if self.status.volume > 0.0 {
            self.set_volume(0.0);
        } else {
            self.set_volume(self.unmuted_volume);
        }
    }

    /// Drive the primitive and apply whatever it reported.
    pub fn tick(&mut self) {
        self.primitive.poll();
        self.process_events();
    }

    /// Apply queued primitive events for the current binding.
    pub fn process_events(&mut self) {
        // Re-read the listener on every step: handling `Ended` rebinds, and the
        // rest of the old queue must not be applied to the new track.
        while let Some(event) = self.listener.as_ref().and_then(Listener::try_recv) {
            self.handle_event(event);
        }
        self.publish();
    }

    /// Point the primitive at the track at `index`.
    ///
    /// The old listener is detached (and its queue dropped) before the new
    /// source is bound, a fresh listener is attached, and the last-known
    /// volume is reapplied since a new binding starts at unity gain. The new
    /// binding is paused; callers decide whether to play.
    fn rebind(&mut self, index: usize) -> Result<(), PlayerError> {
        let track = self.playlist.get(index)?;

        if let Some(old) = self.listener.take() {
            self.primitive.detach(old.id());
        }
        self.primitive.bind(&track.locator);
        self.listener = Some(self.primitive.attach());
        self.primitive.set_volume(self.status.volume);

        self.status.current_index = Some(index);
        self.status.is_playing = false;
        self.status.elapsed = Duration::ZERO;
        self.status.total = None;

        debug!(index, id = %track.id, name = %track.display_name, "rebound");
        Ok(())
    }

    /// Fade the output to silence over `fade` and pause. Used on quit.
    pub fn shutdown(&mut self, fade: Duration) {
        if self.status.is_playing && !fade.is_zero() {
            let start = self.primitive.volume();
            let step = fade / FADE_STEPS;
            for i in 1..=FADE_STEPS {
                let t = i as f32 / FADE_STEPS as f32;
                self.primitive.set_volume(start * (1.0 - t));
                thread::sleep(step);
            }
        }

        self.primitive.set_volume(0.0);
        self.primitive.pause();
        self.status.is_playing = false;
        info!("playback shut down");
        self.publish();
    }

    fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::MetadataReady { duration } => {
                self.status.total = duration.or_else(|| self.primitive.duration());
                self.status.elapsed = self.primitive.position();
            }
            MediaEvent::PositionChanged(position) => {
                self.status.elapsed = position;
            }
            MediaEvent::Ended => {
                debug!(index = ?self.status.current_index, "track ended, advancing");
                self.play_next();
            }
            MediaEvent::PlayStarted => {
                debug!(index = ?self.status.current_index, "playback started");
            }
            MediaEvent::PlayFailed(reason) => {
                warn!(index = ?self.status.current_index, %reason, "playback failed to start");
                self.status.is_playing = false;
            }
        }
    }

    fn publish(&mut self) {
        self.watchers.publish(&self.status);
    }
}
