//! # Initializer marker.
//!
//! [`InitializerSpec`] tags one entry point of a component as a bootstrap initializer and
//! carries the optional markers attached to it:
//! - at most one [`RetryPolicy`] (direct invocation only);
//! - zero or more [`ScheduleSpec`]s (the entry point is then scheduled instead of invoked).
//!
//! ```rust
//! use bootvisor::{InitializerSpec, RetryPolicy, ScheduleSpec};
//!
//! let direct = InitializerSpec::new("connect").with_retry(RetryPolicy::new(3));
//! assert!(!direct.is_scheduled());
//!
//! let periodic = InitializerSpec::new("heartbeat")
//!     .with_schedule(ScheduleSpec::from_secs(0, 5))
//!     .with_schedule(ScheduleSpec::from_secs(2, 10));
//! assert!(periodic.is_scheduled());
//! assert_eq!(periodic.schedules().len(), 2);
//! ```

use std::borrow::Cow;

use crate::markers::{RetryPolicy, ScheduleSpec};

/// Marks an entry point as an initializer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitializerSpec {
    entry_point: Cow<'static, str>,
    retry: Option<RetryPolicy>,
    schedules: Vec<ScheduleSpec>,
}

impl InitializerSpec {
    /// Tags `entry_point` as an initializer with no retry policy and no schedule.
    pub fn new(entry_point: impl Into<Cow<'static, str>>) -> Self {
        Self {
            entry_point: entry_point.into(),
            retry: None,
            schedules: Vec::new(),
        }
    }

    /// Returns a new spec with the given retry policy.
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Returns a new spec with one more schedule.
    pub fn with_schedule(mut self, schedule: ScheduleSpec) -> Self {
        self.schedules.push(schedule);
        self
    }

    /// Returns the entry point name.
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// Returns the retry policy, if declared.
    pub fn retry(&self) -> Option<&RetryPolicy> {
        self.retry.as_ref()
    }

    /// Returns the declared schedules.
    pub fn schedules(&self) -> &[ScheduleSpec] {
        &self.schedules
    }

    /// Convenience: `true` when at least one schedule is declared.
    pub fn is_scheduled(&self) -> bool {
        !self.schedules.is_empty()
    }
}
