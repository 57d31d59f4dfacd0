//! Audio-related small types.
//!
//! This module defines the events a playback primitive reports, the listener
//! handles used to receive them, and the errors raised while binding a source.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use thiserror::Error;

/// Asynchronous notifications from a playback primitive to its listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The bound source was opened; `duration` is `None` when the decoder
    /// cannot tell.
    MetadataReady { duration: Option<Duration> },
    /// Periodic position report while playing.
    PositionChanged(Duration),
    /// The bound source played to its end. Fires at most once per binding.
    Ended,
    /// A play request went through.
    PlayStarted,
    /// A play request could not be honoured.
    PlayFailed(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Receiving end of an attached listener. Dropping it discards anything still
/// queued.
#[derive(Debug)]
pub struct Listener {
    pub(crate) id: ListenerId,
    pub(crate) rx: Receiver<MediaEvent>,
}

impl Listener {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Next queued event, if any. Never blocks.
    pub fn try_recv(&self) -> Option<MediaEvent> {
        self.rx.try_recv().ok()
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),
    #[error("locator {0} is not registered")]
    UnknownLocator(String),
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
}
