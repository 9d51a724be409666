//! # Event bus.
//!
//! Every publisher of a bootstrap (sequencer, scanner, retry executor, timers, subscriber
//! workers) shares one [`Bus`]. The bootstrap's listener task is its main receiver and feeds
//! the [`SubscriberSet`](crate::SubscriberSet); tests subscribe directly to read raw events.
//!
//! Publishing never blocks. The ring buffer holds the last `capacity` events; a receiver that
//! falls further behind gets `RecvError::Lagged` and resumes at the oldest retained event.
//! Events published while nobody is subscribed are gone.

use tokio::sync::broadcast;

use super::event::Event;

/// Cloneable handle to the event channel of one bootstrap.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus retaining up to `capacity` events (at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes `ev` to the current receivers, if any.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Returns a receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
