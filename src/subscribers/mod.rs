//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out and the
//! built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Scanner / Retry executor / Scheduler ── publish(Event) ──► Bus
//!                                                             │
//!                                     bootstrap listener ◄────┘
//!                                             │   (drained by Bootstrap::drain_subscribers)
//!                                 SubscriberSet::emit(&Event)   filtered by Subscribe::wants
//!                                    ┌────────┼────────┐
//!                                    ▼        ▼        ▼
//!                               [queue S1] [queue S2] [queue SN]
//!                                    │        │        │
//!                                LogWriter  Metrics  Custom ...
//! ```

mod embedded;
mod set;
mod subscriber;

pub use embedded::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
