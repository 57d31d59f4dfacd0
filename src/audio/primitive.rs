use std::time::Duration;

use crate::library::SourceLocator;

use super::types::{Listener, ListenerId};

/// A host audio unit that can play one bound source at a time.
///
/// Everything here is synchronous except starting playback: `play` only
/// requests it, and the outcome arrives later as `MediaEvent::PlayStarted` or
/// `MediaEvent::PlayFailed`. Events are delivered to attached listeners when
/// `poll` runs, on the caller's thread.
pub trait PlaybackPrimitive {
    /// Replace the current source. The new binding starts paused at zero with
    /// unity gain.
    fn bind(&mut self, locator: &SourceLocator);

    /// Request playback of the bound source.
    fn play(&mut self);

    fn pause(&mut self);

    fn set_position(&mut self, position: Duration);

    fn position(&self) -> Duration;

    /// Total length of the bound source, once known.
    fn duration(&self) -> Option<Duration>;

    fn set_volume(&mut self, volume: f32);

    fn volume(&self) -> f32;

    fn attach(&mut self) -> Listener;

    fn detach(&mut self, id: ListenerId);

    /// Deliver any events that became due since the last call.
    fn poll(&mut self);
}
