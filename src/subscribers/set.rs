//! # Fan-out of bootstrap events to subscriber workers.
//!
//! ```text
//! emit(&Event) ──► wants(kind)? ──► try_send ──► [queue] ──► worker ──► on_event()
//!                      │ no              │ full/closed          └─ panic → SubscriberPanicked
//!                      └─ skipped        └─ SubscriberOverflow
//!
//! close() ──► drop every sender ──► workers finish their queues ──► joined
//! ```
//!
//! Each subscriber sees its events in publish order. There is no ordering across subscribers.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::components::panic_message;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

struct Worker {
    sub: Arc<dyn Subscribe>,
    tx: mpsc::Sender<Arc<Event>>,
    join: JoinHandle<()>,
}

impl Worker {
    fn spawn(sub: Arc<dyn Subscribe>, bus: Bus) -> Self {
        let (tx, mut rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));
        let handler = Arc::clone(&sub);
        let join = tokio::spawn(async move {
            while let Some(ev) = rx.recv().await {
                let call = AssertUnwindSafe(handler.on_event(&ev)).catch_unwind();
                if let Err(payload) = call.await {
                    bus.publish(Event::subscriber_panicked(
                        handler.name(),
                        panic_message(payload.as_ref()),
                    ));
                }
            }
        });
        Self { sub, tx, join }
    }
}

/// Subscribers of one bootstrap, each behind a bounded queue and a worker task.
pub struct SubscriberSet {
    workers: Vec<Worker>,
    bus: Bus,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber. Overflow and panic reports go to `bus`.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let workers = subs
            .into_iter()
            .map(|sub| Worker::spawn(sub, bus.clone()))
            .collect();
        Self { workers, bus }
    }

    /// Returns the number of subscribers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Returns `true` if there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Queues `event` for every subscriber that wants its kind. Never waits.
    pub fn emit(&self, event: &Event) {
        let mut shared: Option<Arc<Event>> = None;
        for worker in &self.workers {
            if !worker.sub.wants(event.kind) {
                continue;
            }
            let ev = shared.get_or_insert_with(|| Arc::new(event.clone()));
            let reason = match worker.tx.try_send(Arc::clone(ev)) {
                Ok(()) => continue,
                Err(TrySendError::Full(_)) => "full",
                Err(TrySendError::Closed(_)) => "closed",
            };
            // an overflow report that overflows itself is dropped
            if event.kind != EventKind::SubscriberOverflow {
                self.bus
                    .publish(Event::subscriber_overflow(worker.sub.name(), reason));
            }
        }
    }

    /// Lets every worker finish its queue, then joins them.
    pub async fn close(self) {
        let mut joins = Vec::with_capacity(self.workers.len());
        for worker in self.workers {
            drop(worker.tx);
            joins.push(worker.join);
        }
        for join in joins {
            let _ = join.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    struct Counter {
        seen: Arc<AtomicU32>,
        only: Option<EventKind>,
    }

    #[async_trait]
    impl Subscribe for Counter {
        async fn on_event(&self, _ev: &Event) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }
        fn name(&self) -> &'static str {
            "counter"
        }
        fn wants(&self, kind: EventKind) -> bool {
            self.only.is_none_or(|only| only == kind)
        }
    }

    struct Panicker;

    #[async_trait]
    impl Subscribe for Panicker {
        async fn on_event(&self, _ev: &Event) {
            panic!("subscriber exploded");
        }
        fn name(&self) -> &'static str {
            "panicker"
        }
    }

    #[tokio::test]
    async fn panicking_subscriber_is_isolated_and_reported() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let seen = Arc::new(AtomicU32::new(0));
        let set = SubscriberSet::new(
            vec![
                Arc::new(Panicker),
                Arc::new(Counter { seen: Arc::clone(&seen), only: None }),
            ],
            bus.clone(),
        );

        set.emit(&Event::new(EventKind::PhaseChanged));
        set.emit(&Event::new(EventKind::PhaseChanged));

        let ev = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ev.kind, EventKind::SubscriberPanicked);
        assert_eq!(ev.reason.as_deref(), Some("subscriber exploded"));

        set.close().await;
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unwanted_kinds_are_not_queued() {
        let seen = Arc::new(AtomicU32::new(0));
        let set = SubscriberSet::new(
            vec![Arc::new(Counter {
                seen: Arc::clone(&seen),
                only: Some(EventKind::ScheduledFailed),
            })],
            Bus::new(16),
        );
        assert_eq!(set.len(), 1);

        set.emit(&Event::new(EventKind::ScheduledFiring));
        set.emit(&Event::new(EventKind::ScheduledFailed));
        set.emit(&Event::new(EventKind::ScheduledCompleted));
        set.close().await;

        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
