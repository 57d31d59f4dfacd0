//! Playback control: the state machine between the playlist, the audio
//! primitive and the UI.

mod controller;
mod status;

pub use controller::{PlaybackController, PlayerError};
pub use status::{PlaybackStatus, PlayerState, StatusSubscription, SubscriptionId};

#[cfg(test)]
mod tests;
