//! Runtime core: the bootstrap protocol.
//!
//! The public API from this module is [`Bootstrap`] (with its builder and report), the
//! [`Phase`] state, the [`RetryExecutor`] and the [`Scheduler`].
//!
//! Internal modules:
//! - [`activator`]: instantiates initializable components and validates their markers;
//! - [`retry`]: invokes one entry point under its retry policy;
//! - [`scheduler`]: runs one timer per schedule and stops them within a grace period;
//! - [`bootstrap`]: sequences the phases and owns the bus and subscribers;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod activator;
mod bootstrap;
mod builder;
mod retry;
mod scheduler;
mod shutdown;

pub use activator::{Activation, activate};
pub use bootstrap::{Bootstrap, BootstrapReport, Phase};
pub use builder::BootstrapBuilder;
pub use retry::RetryExecutor;
pub use scheduler::{ScheduledTaskHandle, Scheduler};
