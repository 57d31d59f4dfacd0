//! The playback primitive boundary and its rodio-backed implementation.
//!
//! `PlaybackPrimitive` is the only view the player has of the audio host;
//! `RodioPrimitive` implements it on top of a single rodio `Sink`.

mod events;
mod listeners;
mod output;
mod primitive;
mod sink;
mod types;

pub use output::RodioPrimitive;
pub use primitive::PlaybackPrimitive;
pub use types::{AudioError, Listener, ListenerId, MediaEvent};

#[cfg(test)]
pub(crate) use listeners::ListenerSet;

#[cfg(test)]
mod tests;
