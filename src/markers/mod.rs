//! Declarative markers attached to components and their entry points.
//!
//! Markers are plain values supplied at registration time instead of source annotations.
//!
//! ## Contents
//! - [`InitializerSpec`] marks an entry point as an initializer
//! - [`RetryPolicy`] / [`RetryOn`] bounded fixed-delay retry with selective kind matching
//! - [`ScheduleSpec`] repeatable initial-delay/period pair
//!
//! The type-level marker ("this component participates in bootstrap") lives on
//! [`ComponentDefinition::initializable`](crate::ComponentDefinition::initializable).
//!
//! ## Quick wiring
//! ```text
//! ComponentDefinition { initializable, constructor, initializers: [InitializerSpec] }
//!      └─► core::activator        validates entry points and schedules
//!      └─► core::retry            uses InitializerSpec::retry()
//!      └─► core::scheduler        uses InitializerSpec::schedules()
//! ```

mod initializer;
mod retry;
mod schedule;

pub use initializer::InitializerSpec;
pub use retry::{DEFAULT_FAILURE_MESSAGE, RetryOn, RetryPolicy};
pub use schedule::ScheduleSpec;
