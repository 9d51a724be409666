//! # Retry executor: one initializer entry point under an optional [`RetryPolicy`].
//!
//! ## Event flow
//! For each attempt, the executor publishes:
//! ```text
//! InitializerStarting → [invoke] → InitializerSucceeded (success)
//!                                → InitializerFailed    (failure)
//!
//! If retry scheduled:
//!   → RetryScheduled → [sleep(delay)] → (next attempt)
//! ```
//!
//! ## Architecture
//! ```text
//! loop {
//!   ├─► attempt += 1, publish InitializerStarting
//!   ├─► component.invoke(entry_point)       (panic caught → Failure::internal)
//!   │     ├─► Ok  → publish InitializerSucceeded, return Ok
//!   │     └─► Err → publish InitializerFailed
//!   ├─► no policy              → Raised(failure)          (unwrapped)
//!   ├─► kind not retryable     → NotRetryable{message}    (wrapped)
//!   ├─► budget exhausted       → Exhausted{message}       (wrapped)
//!   └─► budget -= 1, publish RetryScheduled
//!        └─► sleep(delay) or cancelled → Cancelled
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**; at most `1 + retries` invocations.
//! - The delay is **fixed** for every attempt.
//! - A non-retryable failure consumes no retry budget.
//! - `retries = 0` fails on the first error but still wraps it; no policy never wraps.
//! - A panicking attempt counts as an [`Internal`](crate::FailureKind::Internal) failure.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::components::{Component, Failure};
use crate::error::InvocationError;
use crate::events::{Bus, Event, EventKind};
use crate::markers::RetryPolicy;

/// Invokes initializer entry points with their retry policies, publishing lifecycle events.
#[derive(Clone)]
pub struct RetryExecutor {
    bus: Bus,
    token: CancellationToken,
}

impl RetryExecutor {
    /// Creates an executor publishing to `bus`; waits between attempts end when `token` is cancelled.
    pub fn new(bus: Bus, token: CancellationToken) -> Self {
        Self { bus, token }
    }

    /// Runs `entry_point` on `instance` until it succeeds or `policy` gives up.
    pub async fn invoke_with_retry(
        &self,
        instance: &dyn Component,
        component: &str,
        entry_point: &str,
        policy: Option<&RetryPolicy>,
    ) -> Result<(), InvocationError> {
        let mut attempt: u32 = 0;
        let mut remaining = policy.map_or(0, |p| p.retries);

        loop {
            attempt += 1;
            self.publish(EventKind::InitializerStarting, component, entry_point, attempt);

            let call = AssertUnwindSafe(instance.invoke(entry_point)).catch_unwind();
            let failure = match call.await {
                Ok(Ok(())) => {
                    self.publish(EventKind::InitializerSucceeded, component, entry_point, attempt);
                    return Ok(());
                }
                Ok(Err(failure)) => failure,
                Err(panic) => Failure::from_panic(panic.as_ref()),
            };
            self.bus.publish(
                event(EventKind::InitializerFailed, component, entry_point, attempt)
                    .with_reason(failure.to_string()),
            );

            let Some(policy) = policy else {
                return Err(InvocationError::Raised(failure));
            };
            if !policy.retry_on.matches(failure.kind()) {
                return Err(wrap(policy, attempt, failure, false));
            }
            if remaining == 0 {
                return Err(wrap(policy, attempt, failure, true));
            }
            remaining -= 1;

            self.bus.publish(
                event(EventKind::RetryScheduled, component, entry_point, attempt)
                    .with_delay(policy.delay)
                    .with_reason(failure.to_string()),
            );

            let sleep = time::sleep(policy.delay);
            tokio::pin!(sleep);
            select! {
                biased;
                _ = self.token.cancelled() => return Err(InvocationError::Cancelled),
                _ = &mut sleep => {}
            }
        }
    }

    fn publish(&self, kind: EventKind, component: &str, entry_point: &str, attempt: u32) {
        self.bus.publish(event(kind, component, entry_point, attempt));
    }
}

fn event(kind: EventKind, component: &str, entry_point: &str, attempt: u32) -> Event {
    Event::new(kind)
        .with_component(component)
        .with_entry_point(entry_point)
        .with_attempt(attempt)
}

fn wrap(policy: &RetryPolicy, attempts: u32, source: Failure, exhausted: bool) -> InvocationError {
    let message = policy.failure_message.clone();
    if exhausted {
        InvocationError::Exhausted {
            message,
            attempts,
            source,
        }
    } else {
        InvocationError::NotRetryable {
            message,
            attempts,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use crate::components::{ComponentFn, FailureKind};

    /// Fails with `kind` for the first `fail_times` calls, then succeeds.
    fn flaky(fail_times: u32, kind: FailureKind) -> (ComponentFn<AtomicU32>, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let comp = ComponentFn::from_arc(Arc::clone(&calls)).entry("connect", move |calls| async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= fail_times {
                Err(Failure::new(kind, format!("attempt {n} failed")))
            } else {
                Ok(())
            }
        });
        (comp, calls)
    }

    fn executor() -> RetryExecutor {
        RetryExecutor::new(Bus::new(64), CancellationToken::new())
    }

    #[tokio::test]
    async fn no_policy_invokes_once_and_surfaces_raw_failure() {
        let (comp, calls) = flaky(u32::MAX, FailureKind::Io);
        let err = executor()
            .invoke_with_retry(&comp, "app.Db", "connect", None)
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, InvocationError::Raised(ref f) if f.kind() == FailureKind::Io));
        assert!(!err.is_wrapped());
    }

    #[tokio::test]
    async fn retries_until_success() {
        let (comp, calls) = flaky(2, FailureKind::Io);
        let policy = RetryPolicy::new(3).retry_on([FailureKind::Io]);

        executor()
            .invoke_with_retry(&comp, "app.Db", "connect", Some(&policy))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_budget_wraps_last_failure() {
        let (comp, calls) = flaky(u32::MAX, FailureKind::Io);
        let policy = RetryPolicy::new(3)
            .retry_on([FailureKind::Io])
            .with_failure_message("database unreachable");

        let err = executor()
            .invoke_with_retry(&comp, "app.Db", "connect", Some(&policy))
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        match err {
            InvocationError::Exhausted {
                message,
                attempts,
                source,
            } => {
                assert_eq!(message, "database unreachable");
                assert_eq!(attempts, 4);
                assert_eq!(source.message(), "attempt 4 failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_retryable_kind_fails_immediately() {
        let (comp, calls) = flaky(u32::MAX, FailureKind::InvalidState);
        let policy = RetryPolicy::new(3).retry_on([FailureKind::Io]);

        let err = executor()
            .invoke_with_retry(&comp, "app.Db", "connect", Some(&policy))
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, InvocationError::NotRetryable { attempts: 1, .. }));
    }

    #[tokio::test]
    async fn zero_retries_still_wraps() {
        let (comp, calls) = flaky(u32::MAX, FailureKind::Io);
        let policy = RetryPolicy::new(0);

        let err = executor()
            .invoke_with_retry(&comp, "app.Db", "connect", Some(&policy))
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(err.is_wrapped());
        assert_eq!(
            err.to_string(),
            "Operation failed after retrying (after 1 attempts)"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn waits_fixed_delay_between_attempts() {
        let (comp, _calls) = flaky(2, FailureKind::Io);
        let policy = RetryPolicy::new(5).with_delay(Duration::from_secs(1));
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let exec = RetryExecutor::new(bus, CancellationToken::new());

        let started = time::Instant::now();
        exec.invoke_with_retry(&comp, "app.Db", "connect", Some(&policy))
            .await
            .unwrap();
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(2) && waited < Duration::from_secs(3));

        let mut delays = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::RetryScheduled {
                delays.push(ev.delay_ms);
            }
        }
        assert_eq!(delays, vec![Some(1000), Some(1000)]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_retry_wait() {
        let (comp, calls) = flaky(u32::MAX, FailureKind::Io);
        let policy = RetryPolicy::new(10).with_delay(Duration::from_secs(60));
        let token = CancellationToken::new();
        let exec = RetryExecutor::new(Bus::new(64), token.clone());

        let canceller = tokio::spawn(async move {
            time::sleep(Duration::from_secs(1)).await;
            token.cancel();
        });

        let err = exec
            .invoke_with_retry(&comp, "app.Db", "connect", Some(&policy))
            .await
            .unwrap_err();
        canceller.await.unwrap();

        assert!(matches!(err, InvocationError::Cancelled));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn panicking_attempt_is_an_internal_failure() {
        let calls = Arc::new(AtomicU32::new(0));
        let comp = ComponentFn::from_arc(Arc::clone(&calls)).entry("connect", |calls| async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("driver not loaded");
            }
            Ok(())
        });

        let err = executor()
            .invoke_with_retry(&comp, "app.Db", "connect", None)
            .await
            .unwrap_err();
        match err {
            InvocationError::Raised(f) => {
                assert_eq!(f.kind(), FailureKind::Internal);
                assert_eq!(f.message(), "panicked: driver not loaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        calls.store(0, Ordering::SeqCst);
        executor()
            .invoke_with_retry(&comp, "app.Db", "connect", Some(&RetryPolicy::new(1)))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
