//! Event bookkeeping for a single-sink primitive, kept apart from the device.
//!
//! `EventBook` decides which `MediaEvent`s a binding produces and when they are
//! handed to listeners; `RodioPrimitive` only tells it what happened.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::listeners::ListenerSet;
use super::types::{Listener, ListenerId, MediaEvent};

#[derive(Debug)]
pub(super) struct EventBook {
    pending: VecDeque<MediaEvent>,
    listeners: ListenerSet,
    load_error: Option<String>,
    ended_fired: bool,
    position_interval: Duration,
    last_report: Option<Instant>,
}

impl EventBook {
    pub(super) fn new(position_interval: Duration) -> Self {
        Self {
            pending: VecDeque::new(),
            listeners: ListenerSet::new(),
            load_error: None,
            ended_fired: false,
            position_interval: position_interval.max(Duration::from_millis(1)),
            last_report: None,
        }
    }

    /// A new source was bound. Undelivered events of the previous binding are
    /// discarded. `loaded` carries the decoder's duration, or why it failed.
    pub(super) fn rebound(&mut self, loaded: Result<Option<Duration>, String>) {
        self.pending.clear();
        self.ended_fired = false;
        self.last_report = None;

        match loaded {
            Ok(duration) => {
                self.load_error = None;
                self.pending.push_back(MediaEvent::MetadataReady { duration });
            }
            Err(reason) => self.load_error = Some(reason),
        }
    }

    /// Playback was requested at `now`. Returns whether the source can play.
    pub(super) fn play_requested(&mut self, has_source: bool, now: Instant) -> bool {
        if has_source {
            self.last_report = Some(now);
            self.pending.push_back(MediaEvent::PlayStarted);
            return true;
        }

        let reason = self
            .load_error
            .clone()
            .unwrap_or_else(|| "no source bound".to_string());
        self.pending.push_back(MediaEvent::PlayFailed(reason));
        false
    }

    /// The sink ran dry. Only the first call per binding queues `Ended`.
    pub(super) fn ended(&mut self) {
        if !self.ended_fired {
            self.ended_fired = true;
            self.pending.push_back(MediaEvent::Ended);
        }
    }

    /// Whether a position report is due at `now`. Marks it as sent when it is.
    pub(super) fn position_due(&mut self, now: Instant) -> bool {
        let due = self
            .last_report
            .is_none_or(|last| now.saturating_duration_since(last) >= self.position_interval);
        if due {
            self.last_report = Some(now);
        }
        due
    }

    pub(super) fn position(&mut self, position: Duration) {
        self.pending.push_back(MediaEvent::PositionChanged(position));
    }

    pub(super) fn attach(&mut self) -> Listener {
        self.listeners.attach()
    }

    pub(super) fn detach(&mut self, id: ListenerId) {
        self.listeners.detach(id);
    }

    /// Hand every queued event to the attached listeners, oldest first.
    pub(super) fn flush(&mut self) {
        while let Some(event) = self.pending.pop_front() {
            self.listeners.emit(event);
        }
    }
}
