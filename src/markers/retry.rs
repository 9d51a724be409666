//! # Retry policy for initializer entry points.
//!
//! [`RetryPolicy`] governs re-invocation of an initializer that fails during bootstrap:
//! - [`RetryPolicy::retries`] fixed retry budget (on top of the first attempt);
//! - [`RetryPolicy::delay`] fixed wait between attempts (no backoff growth);
//! - [`RetryPolicy::retry_on`] which failure kinds consume the budget;
//! - [`RetryPolicy::failure_message`] message wrapped around the final failure.
//!
//! An entry point without a policy is invoked exactly once and its failure surfaces unwrapped.
//! `RetryPolicy::new(0)` also fails on the first error, but the failure is wrapped.
//!
//! ```rust
//! use std::time::Duration;
//! use bootvisor::{FailureKind, RetryOn, RetryPolicy};
//!
//! let policy = RetryPolicy::new(10)
//!     .with_delay(Duration::from_secs(1))
//!     .retry_on([FailureKind::Io])
//!     .with_failure_message("Connecting to H2 database is failed after retry operation");
//!
//! assert_eq!(policy.max_attempts(), 11);
//! assert!(policy.retry_on.matches(FailureKind::Io));
//! assert!(!policy.retry_on.matches(FailureKind::Timeout));
//! ```

use std::time::Duration;

use crate::components::FailureKind;

/// Message used when a policy does not declare its own.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Operation failed after retrying";

/// Which failure kinds a [`RetryPolicy`] treats as retryable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RetryOn {
    /// Every failure is retryable (default).
    #[default]
    Any,
    /// Only failures tagged with one of these kinds are retryable.
    Kinds(Vec<FailureKind>),
}

impl RetryOn {
    /// Returns `true` if a failure of `kind` may be retried.
    pub fn matches(&self, kind: FailureKind) -> bool {
        match self {
            RetryOn::Any => true,
            RetryOn::Kinds(kinds) => kinds.contains(&kind),
        }
    }
}

/// Fixed-interval retry policy attached to an initializer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of retries after the first attempt.
    pub retries: u32,
    /// Wait between attempts.
    pub delay: Duration,
    /// Retryable failure kinds.
    pub retry_on: RetryOn,
    /// Message wrapped around the final failure.
    pub failure_message: String,
}

impl RetryPolicy {
    /// Creates a policy with the given retry budget, no delay, any failure retryable
    /// and the default failure message.
    pub fn new(retries: u32) -> Self {
        Self {
            retries,
            delay: Duration::ZERO,
            retry_on: RetryOn::Any,
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Returns a new policy with updated delay between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns a new policy that only retries the given failure kinds.
    pub fn retry_on(mut self, kinds: impl IntoIterator<Item = FailureKind>) -> Self {
        self.retry_on = RetryOn::Kinds(kinds.into_iter().collect());
        self
    }

    /// Returns a new policy with updated failure message.
    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    /// Upper bound of invocations: the first attempt plus every retry.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_retry_any_failure() {
        let p = RetryPolicy::new(3);
        assert_eq!(p.delay, Duration::ZERO);
        assert_eq!(p.retry_on, RetryOn::Any);
        assert_eq!(p.failure_message, DEFAULT_FAILURE_MESSAGE);
        for kind in [FailureKind::Io, FailureKind::Internal, FailureKind::Timeout] {
            assert!(p.retry_on.matches(kind));
        }
    }

    #[test]
    fn narrowed_kinds_match_by_tag() {
        let p = RetryPolicy::new(1).retry_on([FailureKind::Io, FailureKind::Unavailable]);
        assert!(p.retry_on.matches(FailureKind::Unavailable));
        assert!(!p.retry_on.matches(FailureKind::InvalidState));
    }

    #[test]
    fn empty_kind_set_retries_nothing() {
        let p = RetryPolicy::new(5).retry_on([]);
        assert!(!p.retry_on.matches(FailureKind::Io));
    }

    #[test]
    fn max_attempts_saturates() {
        assert_eq!(RetryPolicy::new(0).max_attempts(), 1);
        assert_eq!(RetryPolicy::new(u32::MAX).max_attempts(), u32::MAX);
    }
}
