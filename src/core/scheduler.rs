//! # Periodic scheduler: one independent timer task per `(entry point, ScheduleSpec)`.
//!
//! ## Architecture
//! ```text
//! Scheduler::schedule(instance, component, entry_point, spec)
//!   └─► child token = scheduler_token.child_token()
//!       tokio::spawn(timer):
//!         interval_at(now + initial_delay, period)
//!         loop {
//!           ├─► tick  or cancelled → exit
//!           ├─► publish ScheduledFiring
//!           ├─► invoke (panic caught) or cancelled → exit
//!           └─► publish ScheduledCompleted / ScheduledFailed
//!         }
//!
//! Scheduler::shutdown(grace)
//!   ├─► publish ShutdownRequested
//!   ├─► cancel scheduler token   → propagates to every timer
//!   └─► join all before deadline:
//!         ├─ all joined   → publish AllStoppedWithin
//!         └─ some stuck   → abort them, publish GraceExceeded, Err(GraceExceeded{stuck})
//! ```
//!
//! ## Rules
//! - Firings of **one** timer are sequential; different timers run concurrently, even when
//!   they share an entry point.
//! - A failing or panicking firing is logged at `warn` (target `bootvisor`), published as
//!   `ScheduledFailed`, and the timer keeps its cadence.
//! - Missed ticks are fired as soon as possible (fixed rate).
//! - Timers are cancelled as a group; there is no per-timer removal.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::components::{ComponentRef, panic_message};
use crate::error::{ActivationError, RuntimeError};
use crate::events::{Bus, Event, EventKind};
use crate::markers::ScheduleSpec;

/// Handle to a running periodic task.
pub struct ScheduledTaskHandle {
    name: String,
    spec: ScheduleSpec,
    join: JoinHandle<()>,
}

impl ScheduledTaskHandle {
    /// Returns the timer name: `component::entry_point#index`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the schedule driving this timer.
    pub fn spec(&self) -> ScheduleSpec {
        self.spec
    }

    /// Returns `true` if the timer task has exited.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Owns every periodic task registered during a bootstrap run.
pub struct Scheduler {
    bus: Bus,
    token: CancellationToken,
    handles: Vec<ScheduledTaskHandle>,
}

impl Scheduler {
    /// Creates an empty scheduler whose timers stop when `parent` is cancelled.
    pub fn new(bus: Bus, parent: &CancellationToken) -> Self {
        Self {
            bus,
            token: parent.child_token(),
            handles: Vec::new(),
        }
    }

    /// Starts a timer invoking `entry_point` on `instance` according to `spec`.
    ///
    /// Returns immediately; the first firing happens after `spec.initial_delay`.
    pub fn schedule(
        &mut self,
        instance: ComponentRef,
        component: &str,
        entry_point: &str,
        spec: ScheduleSpec,
    ) -> Result<&ScheduledTaskHandle, ActivationError> {
        spec.validate()
            .map_err(|reason| ActivationError::InvalidSchedule {
                entry_point: entry_point.to_string(),
                reason,
            })?;

        let prefix = format!("{component}::{entry_point}#");
        let index = self
            .handles
            .iter()
            .filter(|h| h.name.starts_with(&prefix))
            .count();
        let name = format!("{prefix}{index}");

        let timer = Timer {
            start: time::Instant::now() + spec.initial_delay,
            instance,
            component: Arc::from(component),
            entry_point: Arc::from(entry_point),
            spec,
            bus: self.bus.clone(),
        };
        let join = tokio::spawn(timer.run(self.token.child_token()));

        self.bus.publish(
            Event::new(EventKind::ScheduleRegistered)
                .with_component(component)
                .with_entry_point(entry_point)
                .with_delay(spec.initial_delay)
                .with_period(spec.period),
        );

        self.handles.push(ScheduledTaskHandle { name, spec, join });
        Ok(&self.handles[self.handles.len() - 1])
    }

    /// Returns the number of registered timers.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if no timer is registered.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Returns the registered timers.
    pub fn handles(&self) -> &[ScheduledTaskHandle] {
        &self.handles
    }

    /// Returns the timer names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.handles.iter().map(|h| h.name()).collect()
    }

    /// Cancels every timer without waiting for them.
    pub fn cancel_all(&self) {
        self.token.cancel();
    }

    /// Cancels every timer and waits up to `grace` for them to exit.
    ///
    /// Timers still running at the deadline are aborted and reported in
    /// [`RuntimeError::GraceExceeded`].
    pub async fn shutdown(self, grace: Duration) -> Result<(), RuntimeError> {
        self.bus.publish(Event::new(EventKind::ShutdownRequested));
        self.token.cancel();

        let deadline = time::Instant::now() + grace;
        let mut stuck = Vec::new();
        for mut handle in self.handles {
            if time::timeout_at(deadline, &mut handle.join).await.is_err() {
                handle.join.abort();
                stuck.push(handle.name);
            }
        }

        if stuck.is_empty() {
            self.bus.publish(Event::new(EventKind::AllStoppedWithin));
            Ok(())
        } else {
            self.bus.publish(
                Event::new(EventKind::GraceExceeded).with_reason(stuck.join(", ")),
            );
            Err(RuntimeError::GraceExceeded { grace, stuck })
        }
    }
}

struct Timer {
    start: time::Instant,
    instance: ComponentRef,
    component: Arc<str>,
    entry_point: Arc<str>,
    spec: ScheduleSpec,
    bus: Bus,
}

impl Timer {
    async fn run(self, token: CancellationToken) {
        let mut ticker = time::interval_at(self.start, self.spec.period);
        let mut firing: u32 = 0;

        loop {
            select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            firing = firing.saturating_add(1);
            self.bus.publish(self.event(EventKind::ScheduledFiring, firing));

            let call = AssertUnwindSafe(self.instance.invoke(&self.entry_point)).catch_unwind();
            let outcome = select! {
                biased;
                _ = token.cancelled() => break,
                res = call => res,
            };

            match outcome {
                Ok(Ok(())) => {
                    self.bus.publish(self.event(EventKind::ScheduledCompleted, firing));
                }
                Ok(Err(failure)) => self.failed(firing, failure.to_string()),
                Err(panic) => {
                    let info = panic_message(panic.as_ref());
                    self.failed(firing, format!("panicked: {info}"));
                }
            }
        }
    }

    fn failed(&self, firing: u32, reason: String) {
        warn!(
            target: "bootvisor",
            component = %self.component,
            entry_point = %self.entry_point,
            firing,
            reason = %reason,
            "scheduled firing failed"
        );
        self.bus
            .publish(self.event(EventKind::ScheduledFailed, firing).with_reason(reason));
    }

    fn event(&self, kind: EventKind, firing: u32) -> Event {
        Event::new(kind)
            .with_component(Arc::clone(&self.component))
            .with_entry_point(Arc::clone(&self.entry_point))
            .with_attempt(firing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::components::{ComponentFn, Failure};

    fn counter() -> (ComponentRef, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let comp = ComponentFn::from_arc(Arc::clone(&calls)).entry("beat", |calls| async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        (Arc::new(comp), calls)
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_initial_delay_then_every_period() {
        let (comp, calls) = counter();
        let mut scheduler = Scheduler::new(Bus::new(64), &CancellationToken::new());
        scheduler
            .schedule(comp, "app.Heartbeat", "beat", ScheduleSpec::from_secs(2, 10))
            .unwrap();

        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        scheduler.shutdown(Duration::from_secs(1)).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn failures_and_panics_do_not_stop_the_timer() {
        let calls = Arc::new(AtomicU32::new(0));
        let comp: ComponentRef = Arc::new(ComponentFn::from_arc(Arc::clone(&calls)).entry(
            "beat",
            |calls| async move {
                match calls.fetch_add(1, Ordering::SeqCst) {
                    0 => Err(Failure::io("disk full")),
                    1 => panic!("heartbeat exploded"),
                    _ => Ok(()),
                }
            },
        ));
        let bus = Bus::new(256);
        let mut rx = bus.subscribe();
        let mut scheduler = Scheduler::new(bus, &CancellationToken::new());
        scheduler
            .schedule(comp, "app.Heartbeat", "beat", ScheduleSpec::every(Duration::from_secs(1)))
            .unwrap();

        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(!scheduler.handles()[0].is_finished());

        scheduler.shutdown(Duration::from_secs(1)).await.unwrap();

        let mut failed = Vec::new();
        let mut completed = 0;
        while let Ok(ev) = rx.try_recv() {
            match ev.kind {
                EventKind::ScheduledFailed => failed.push(ev.reason.as_deref().unwrap_or("").to_string()),
                EventKind::ScheduledCompleted => completed += 1,
                _ => {}
            }
        }
        assert_eq!(failed, vec!["io: disk full", "panicked: heartbeat exploded"]);
        assert_eq!(completed, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_all_timers_within_grace() {
        let (comp, calls) = counter();
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let mut scheduler = Scheduler::new(bus, &CancellationToken::new());
        scheduler
            .schedule(Arc::clone(&comp), "app.Heartbeat", "beat", ScheduleSpec::from_secs(0, 5))
            .unwrap();
        scheduler
            .schedule(comp, "app.Heartbeat", "beat", ScheduleSpec::from_secs(2, 10))
            .unwrap();
        assert_eq!(
            scheduler.names(),
            vec!["app.Heartbeat::beat#0", "app.Heartbeat::beat#1"]
        );

        time::sleep(Duration::from_secs(3)).await;
        scheduler.shutdown(Duration::from_secs(5)).await.unwrap();

        let after = calls.load(Ordering::SeqCst);
        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), after);

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert!(kinds.contains(&EventKind::ShutdownRequested));
        assert_eq!(kinds.last(), Some(&EventKind::AllStoppedWithin));
    }

    #[tokio::test]
    async fn zero_period_is_rejected() {
        let (comp, _) = counter();
        let mut scheduler = Scheduler::new(Bus::new(8), &CancellationToken::new());
        let err = scheduler
            .schedule(comp, "app.Heartbeat", "beat", ScheduleSpec::every(Duration::ZERO))
            .err()
            .unwrap();
        assert!(matches!(err, ActivationError::InvalidSchedule { .. }));
        assert!(scheduler.is_empty());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
        type Writer = Captured;
        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_firings_are_logged_without_subscribers() {
        let out = Captured::default();
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_writer(out.clone())
                .with_ansi(false)
                .finish(),
        );

        let comp: ComponentRef = Arc::new(
            ComponentFn::new(()).entry("beat", |_| async { Err(Failure::timeout("no answer")) }),
        );
        let mut scheduler = Scheduler::new(Bus::new(8), &CancellationToken::new());
        scheduler
            .schedule(comp, "app.Heartbeat", "beat", ScheduleSpec::every(Duration::from_secs(1)))
            .unwrap();
        time::sleep(Duration::from_millis(500)).await;
        scheduler.shutdown(Duration::from_secs(1)).await.unwrap();

        let logged = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("WARN"), "{logged}");
        assert!(logged.contains("scheduled firing failed"), "{logged}");
        assert!(logged.contains("timeout: no answer"), "{logged}");
    }
}
