//! # LogWriter - events as `tracing` records
//!
//! A subscriber that turns incoming [`Event`]s into structured `tracing` records.
//! The host installs the formatter (e.g. `tracing_subscriber::fmt`); without one the
//! records are discarded.
//!
//! ## Levels
//! - `info`: phase changes, discovery, activation, successful attempts, schedule firings
//! - `warn`: retries, failed attempts, shadowed entries, subscriber trouble
//! - `debug`: attempt starts, firing outcomes (failed firings are logged at `warn` by the scheduler)
//! - `error`: bootstrap failure, grace exceeded
//!
//! ## Example output (fmt formatter)
//! ```text
//! INFO  bootvisor: component discovered component="app.AutoSaver" location="dir:classes!/app/AutoSaver.component"
//! WARN  bootvisor: retrying component="app.database.DatabaseConnection" entry_point="connect_to_h2" attempt=1 delay_ms=1000 reason="io: refused"
//! INFO  bootvisor: executing scheduled entry point component="app.Heartbeat" entry_point="beat" firing=3
//! ERROR bootvisor: bootstrap failed phase=Invoking component="app.database.DatabaseConnection" reason="..."
//! ```

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

const TARGET: &str = "bootvisor";

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let component = e.component.as_deref().unwrap_or("");
        let entry_point = e.entry_point.as_deref().unwrap_or("");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::PhaseChanged => {
                info!(target: TARGET, seq = e.seq, phase = ?e.phase, "phase changed");
            }
            EventKind::ComponentDiscovered => {
                info!(target: TARGET, component, location = reason, "component discovered");
            }
            EventKind::ComponentShadowed => {
                warn!(target: TARGET, component, location = reason, "component already discovered, skipping");
            }
            EventKind::ComponentActivated => {
                info!(target: TARGET, component, initializers = ?e.initializers, "component activated");
            }
            EventKind::BootstrapReady => {
                info!(target: TARGET, "bootstrap ready");
            }
            EventKind::BootstrapFailed => {
                error!(target: TARGET, phase = ?e.phase, component, entry_point, reason, "bootstrap failed");
            }
            EventKind::InitializerStarting => {
                debug!(target: TARGET, component, entry_point, attempt = ?e.attempt, "invoking initializer");
            }
            EventKind::InitializerSucceeded => {
                info!(target: TARGET, component, entry_point, attempt = ?e.attempt, "initializer succeeded");
            }
            EventKind::InitializerFailed => {
                warn!(target: TARGET, component, entry_point, attempt = ?e.attempt, reason, "initializer failed");
            }
            EventKind::RetryScheduled => {
                warn!(
                    target: TARGET,
                    component,
                    entry_point,
                    attempt = ?e.attempt,
                    delay_ms = ?e.delay_ms,
                    reason,
                    "retrying"
                );
            }
            EventKind::ScheduleRegistered => {
                info!(
                    target: TARGET,
                    component,
                    entry_point,
                    initial_delay_ms = ?e.delay_ms,
                    period_ms = ?e.period_ms,
                    "schedule registered"
                );
            }
            EventKind::ScheduledFiring => {
                info!(target: TARGET, component, entry_point, firing = ?e.attempt, "executing scheduled entry point");
            }
            EventKind::ScheduledCompleted => {
                debug!(target: TARGET, component, entry_point, firing = ?e.attempt, "scheduled firing completed");
            }
            EventKind::ScheduledFailed => {
                // the timer itself already logged the failure at warn
                debug!(target: TARGET, component, entry_point, firing = ?e.attempt, reason, "scheduled firing failed");
            }
            EventKind::ShutdownRequested => {
                info!(target: TARGET, "shutdown requested");
            }
            EventKind::AllStoppedWithin => {
                info!(target: TARGET, "all scheduled tasks stopped within grace");
            }
            EventKind::GraceExceeded => {
                error!(target: TARGET, stuck = reason, "grace exceeded");
            }
            EventKind::SubscriberOverflow => {
                warn!(target: TARGET, subscriber = component, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                warn!(target: TARGET, subscriber = component, info = reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
