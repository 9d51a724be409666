//! # Execution schedules.
//!
//! A [`ScheduleSpec`] is one `(initial delay, period)` pair. An entry point may carry several;
//! each one becomes an independent timer in the [`Scheduler`](crate::Scheduler).
//!
//! ```text
//! ScheduleSpec { initial_delay: 2s, period: 10s }
//!
//!   t=0        t=2s       t=12s      t=22s
//!   register ──► fire ───► fire ───► fire ───► ...
//! ```

use std::time::Duration;

/// Recurring schedule: first firing after `initial_delay`, then every `period`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleSpec {
    /// Delay before the first firing.
    pub initial_delay: Duration,
    /// Interval between firings. Must be non-zero.
    pub period: Duration,
}

impl ScheduleSpec {
    /// Fires immediately, then every `period`.
    pub fn every(period: Duration) -> Self {
        Self {
            initial_delay: Duration::ZERO,
            period,
        }
    }

    /// Returns a new spec with updated initial delay.
    pub fn after(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    /// Builds a spec from whole seconds.
    pub fn from_secs(initial_delay_secs: u64, period_secs: u64) -> Self {
        Self {
            initial_delay: Duration::from_secs(initial_delay_secs),
            period: Duration::from_secs(period_secs),
        }
    }

    /// Returns the reason this spec cannot drive a timer, if any.
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if self.period.is_zero() {
            return Err("period must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_agree() {
        let a = ScheduleSpec::every(Duration::from_secs(10)).after(Duration::from_secs(2));
        assert_eq!(a, ScheduleSpec::from_secs(2, 10));
    }

    #[test]
    fn zero_period_is_rejected() {
        assert!(ScheduleSpec::from_secs(1, 0).validate().is_err());
        assert!(ScheduleSpec::from_secs(0, 1).validate().is_ok());
    }
}
