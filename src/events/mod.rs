//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the bootstrap sequencer,
//! the scanner, the retry executor, the scheduler and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Bootstrap`, `Scanner`, `retry::invoke_with_retry`, `Scheduler` timers,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the bootstrap's subscriber listener, which fans out to `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
