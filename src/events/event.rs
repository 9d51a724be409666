//! # Runtime events emitted by the bootstrap, the retry executor and the scheduler.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Bootstrap events**: phase transitions and component discovery/activation
//! - **Initializer events**: direct invocation attempts and retries
//! - **Schedule events**: timer registration and periodic firings
//! - **Shutdown / subscriber events**: grace handling and subscriber health
//!
//! The [`Event`] struct carries additional metadata such as timestamps, component and entry
//! point names, attempts, delays and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use bootvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::RetryScheduled)
//!     .with_component("app.database.DatabaseConnection")
//!     .with_entry_point("connect_to_h2")
//!     .with_attempt(2)
//!     .with_delay(Duration::from_secs(1))
//!     .with_reason("io: connection failed");
//!
//! assert_eq!(ev.kind, EventKind::RetryScheduled);
//! assert_eq!(ev.entry_point.as_deref(), Some("connect_to_h2"));
//! assert_eq!(ev.delay_ms, Some(1000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::core::Phase;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `component`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `component`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Bootstrap events ===
    /// The bootstrap entered a new phase.
    ///
    /// Sets:
    /// - `phase`: the phase entered
    PhaseChanged,

    /// A component entry was found and its definition loaded.
    ///
    /// Sets:
    /// - `component`: qualified name
    /// - `reason`: location of the entry
    ComponentDiscovered,

    /// A component entry was skipped because the same name was already discovered.
    ///
    /// Sets:
    /// - `component`: qualified name
    /// - `reason`: location of the skipped entry
    ComponentShadowed,

    /// A component was instantiated and its initializers collected.
    ///
    /// Sets:
    /// - `component`: qualified name
    /// - `initializers`: number of initializer markers
    ComponentActivated,

    /// All initializers were invoked or scheduled.
    ///
    /// Sets:
    /// - `phase`: [`Phase::Ready`]
    BootstrapReady,

    /// The bootstrap terminated with a fatal error.
    ///
    /// Sets:
    /// - `phase`: phase that failed
    /// - `component`/`entry_point`: culprit, when known
    /// - `reason`: error message
    BootstrapFailed,

    // === Initializer events ===
    /// An initializer attempt is starting.
    ///
    /// Sets:
    /// - `component`, `entry_point`
    /// - `attempt`: attempt number (1-based)
    InitializerStarting,

    /// An initializer attempt succeeded.
    ///
    /// Sets:
    /// - `component`, `entry_point`, `attempt`
    InitializerSucceeded,

    /// An initializer attempt failed.
    ///
    /// Sets:
    /// - `component`, `entry_point`, `attempt`
    /// - `reason`: failure message
    InitializerFailed,

    /// Next initializer attempt scheduled after a retryable failure.
    ///
    /// Sets:
    /// - `component`, `entry_point`
    /// - `attempt`: failed attempt number
    /// - `delay_ms`: wait before the next attempt
    /// - `reason`: failure message
    RetryScheduled,

    // === Schedule events ===
    /// A recurring timer was registered.
    ///
    /// Sets:
    /// - `component`, `entry_point`
    /// - `delay_ms`: initial delay
    /// - `period_ms`: period
    ScheduleRegistered,

    /// A scheduled firing is starting.
    ///
    /// Sets:
    /// - `component`, `entry_point`
    /// - `attempt`: firing number for this timer (1-based)
    ScheduledFiring,

    /// A scheduled firing completed successfully.
    ///
    /// Sets:
    /// - `component`, `entry_point`, `attempt`
    ScheduledCompleted,

    /// A scheduled firing failed (or panicked). The timer keeps running.
    ///
    /// Sets:
    /// - `component`, `entry_point`, `attempt`
    /// - `reason`: failure message
    ScheduledFailed,

    // === Shutdown events ===
    /// Shutdown requested (OS signal or explicit call).
    ShutdownRequested,

    /// All scheduled tasks stopped within the grace period.
    AllStoppedWithin,

    /// Grace period exceeded; some scheduled tasks did not stop in time.
    GraceExceeded,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Qualified component name, if applicable.
    pub component: Option<Arc<str>>,
    /// Entry point name, if applicable.
    pub entry_point: Option<Arc<str>>,
    /// Attempt or firing count (starting from 1).
    pub attempt: Option<u32>,
    /// Number of initializer markers on an activated component.
    pub initializers: Option<u32>,
    /// Delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Schedule period in milliseconds (compact).
    pub period_ms: Option<u32>,
    /// Human-readable reason (errors, locations, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Bootstrap phase, if applicable.
    pub phase: Option<Phase>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            component: None,
            entry_point: None,
            attempt: None,
            initializers: None,
            delay_ms: None,
            period_ms: None,
            reason: None,
            phase: None,
        }
    }

    /// Attaches a component name.
    #[inline]
    pub fn with_component(mut self, component: impl Into<Arc<str>>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Attaches an entry point name.
    #[inline]
    pub fn with_entry_point(mut self, entry_point: impl Into<Arc<str>>) -> Self {
        self.entry_point = Some(entry_point.into());
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches an initializer count.
    #[inline]
    pub fn with_initializers(mut self, n: usize) -> Self {
        self.initializers = Some(u32::try_from(n).unwrap_or(u32::MAX));
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a schedule period (stored as milliseconds).
    #[inline]
    pub fn with_period(mut self, d: Duration) -> Self {
        self.period_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a bootstrap phase.
    #[inline]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_component(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_component(subscriber)
            .with_reason(info)
    }
}

fn compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}
