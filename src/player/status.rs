//! Observable playback status and its subscribers.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

/// Coarse controller state, derived from `PlaybackStatus`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerState {
    /// Nothing is bound.
    Empty,
    /// A track is bound and paused.
    Loaded,
    /// A track is bound and playing (or has been asked to).
    Playing,
}

/// What the UI renders. Recomputed on every command and primitive event.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackStatus {
    pub current_index: Option<usize>,
    pub is_playing: bool,
    pub elapsed: Duration,
    /// `None` until the primitive reports the source's length.
    pub total: Option<Duration>,
    pub volume: f32,
}

impl PlaybackStatus {
    pub fn new(volume: f32) -> Self {
        Self {
            current_index: None,
            is_playing: false,
            elapsed: Duration::ZERO,
            total: None,
            volume,
        }
    }

    pub fn state(&self) -> PlayerState {
        match (self.current_index, self.is_playing) {
            (None, _) => PlayerState::Empty,
            (Some(_), false) => PlayerState::Loaded,
            (Some(_), true) => PlayerState::Playing,
        }
    }

    /// Fraction of the track played, when the total is known and non-zero.
    pub fn progress(&self) -> Option<f64> {
        let total = self.total?.as_secs_f64();
        if total <= 0.0 {
            return None;
        }
        Some((self.elapsed.as_secs_f64() / total).clamp(0.0, 1.0))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Receiving end of a status subscription.
#[derive(Debug)]
pub struct StatusSubscription {
    id: SubscriptionId,
    rx: Receiver<PlaybackStatus>,
}

impl StatusSubscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Most recent status published since the last call, if any.
    pub fn latest(&self) -> Option<PlaybackStatus> {
        self.rx.try_iter().last()
    }
}

#[derive(Debug, Default)]
pub(super) struct StatusWatchers {
    next_id: u64,
    senders: Vec<(SubscriptionId, Sender<PlaybackStatus>)>,
    last: Option<PlaybackStatus>,
}

impl StatusWatchers {
    /// Register a subscriber; it immediately receives `current`.
    pub(super) fn subscribe(&mut self, current: &PlaybackStatus) -> StatusSubscription {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        let (tx, rx) = mpsc::channel::<PlaybackStatus>();
        let _ = tx.send(current.clone());
        self.senders.push((id, tx));
        StatusSubscription { id, rx }
    }

    pub(super) fn unsubscribe(&mut self, id: SubscriptionId) {
        self.senders.retain(|(sid, _)| *sid != id);
    }

    /// Send `status` to every subscriber unless it equals the last one sent.
    pub(super) fn publish(&mut self, status: &PlaybackStatus) {
        if self.last.as_ref() == Some(status) {
            return;
        }
        self.senders.retain(|(_, tx)| tx.send(status.clone()).is_ok());
        self.last = Some(status.clone());
    }
}
