//! Fan-out of `MediaEvent`s to attached listeners.

use std::sync::mpsc::{self, Sender};

use super::types::{Listener, ListenerId, MediaEvent};

#[derive(Debug, Default)]
pub struct ListenerSet {
    next_id: u64,
    senders: Vec<(ListenerId, Sender<MediaEvent>)>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self) -> Listener {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        let (tx, rx) = mpsc::channel::<MediaEvent>();
        self.senders.push((id, tx));
        Listener { id, rx }
    }

    /// Stop delivering to `id`. Unknown ids are ignored.
    pub fn detach(&mut self, id: ListenerId) {
        self.senders.retain(|(sid, _)| *sid != id);
    }

    /// Deliver `event` to every attached listener. Listeners whose receiving
    /// end is gone are dropped.
    pub fn emit(&mut self, event: MediaEvent) {
        self.senders.retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.senders.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}
