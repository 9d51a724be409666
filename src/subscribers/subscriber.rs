//! # Subscriber trait.
//!
//! A [`Subscribe`] implementation observes a bootstrap from the outside: it is handed every
//! [`Event`] it [`wants`](Subscribe::wants), one at a time, on a worker task of its own. It can
//! never stall scanning, retries or timers; when it falls behind, its own queue overflows and
//! the event is dropped for it alone.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use async_trait::async_trait;
//! use bootvisor::{Event, EventKind, Subscribe};
//!
//! /// Counts scheduled firings that failed.
//! #[derive(Default)]
//! struct MissedBeats(AtomicU32);
//!
//! #[async_trait]
//! impl Subscribe for MissedBeats {
//!     async fn on_event(&self, _ev: &Event) {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!     }
//!
//!     fn name(&self) -> &'static str { "missed-beats" }
//!
//!     fn wants(&self, kind: EventKind) -> bool {
//!         kind == EventKind::ScheduledFailed
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

/// Observer of bootstrap events.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event. A panic here is caught and published as
    /// [`EventKind::SubscriberPanicked`].
    async fn on_event(&self, event: &Event);

    /// Name used in overflow and panic events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns `false` for kinds this subscriber ignores; those are never queued for it.
    fn wants(&self, kind: EventKind) -> bool {
        let _ = kind;
        true
    }

    /// Queue capacity for this subscriber (at least 1).
    fn queue_capacity(&self) -> usize {
        256
    }
}
