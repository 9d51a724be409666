//! # Bootstrap sequencer: scanning, activation, invocation and scheduling in one run.
//!
//! The [`Bootstrap`] owns the event bus, the [`SubscriberSet`] and the runtime cancellation
//! token. A run walks the phases strictly in order on the caller's task:
//!
//! ```text
//! Idle ─► Scanning ─► Activating ─► Invoking ─► Ready
//!            │            │             │
//!            └────────────┴─────────────┴──► Failed
//!
//! Scanning:   open classpath sources, Scanner::scan(namespaces)
//! Activating: activate(discovered) for each component, in scan order
//! Invoking:   for each activation, for each InitializerSpec (declaration order):
//!               ├─ has schedules → Scheduler::schedule(..) per ScheduleSpec (non-blocking)
//!               └─ otherwise     → RetryExecutor::invoke_with_retry(..)   (blocking)
//! Ready:      BootstrapReport { activated, invoked, scheduler }
//! ```
//!
//! ## Rules
//! - The first fatal error ends the run; remaining invocations are skipped and timers already
//!   registered in that run are cancelled.
//! - Every phase change is published as [`EventKind::PhaseChanged`] and mirrored on
//!   [`Bootstrap::watch_phase`].
//! - Timers outlive the run; they belong to the returned [`BootstrapReport`].
//! - A hung entry point stalls `Invoking`; only retry waits observe [`Bootstrap::cancel`].
//! - Subscribers are fed by a listener task; [`Bootstrap::drain_subscribers`] flushes it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::components::ComponentCatalog;
use crate::config::BootstrapConfig;
use crate::core::activator::{Activation, activate};
use crate::core::retry::RetryExecutor;
use crate::core::scheduler::Scheduler;
use crate::core::shutdown;
use crate::core::builder::BootstrapBuilder;
use crate::error::{BootstrapError, RuntimeError};
use crate::events::{Bus, Event, EventKind};
use crate::scanner::{ComponentSource, Namespace, Scanner};
use crate::subscribers::SubscriberSet;

/// Bootstrap state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Built, not yet run.
    Idle,
    /// Discovering components.
    Scanning,
    /// Instantiating initializable components.
    Activating,
    /// Invoking or scheduling initializers.
    Invoking,
    /// All initializers invoked or scheduled.
    Ready,
    /// Terminated by a fatal error.
    Failed,
}

impl Phase {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Scanning => "scanning",
            Phase::Activating => "activating",
            Phase::Invoking => "invoking",
            Phase::Ready => "ready",
            Phase::Failed => "failed",
        }
    }
}

/// Outcome of a successful run.
pub struct BootstrapReport {
    activated: Vec<String>,
    invoked: usize,
    scheduler: Scheduler,
}

impl BootstrapReport {
    /// Qualified names of the activated components, in activation order.
    pub fn activated(&self) -> &[String] {
        &self.activated
    }

    /// Number of initializers invoked directly.
    pub fn invoked(&self) -> usize {
        self.invoked
    }

    /// Number of registered timers.
    pub fn scheduled(&self) -> usize {
        self.scheduler.len()
    }

    /// The scheduler running this run's timers.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Stops every timer within `grace`.
    pub async fn shutdown(self, grace: Duration) -> Result<(), RuntimeError> {
        self.scheduler.shutdown(grace).await
    }
}

/// Runs the bootstrap protocol over a component catalog and a classpath.
pub struct Bootstrap {
    /// Configuration (namespaces, classpath, grace, bus capacity).
    pub cfg: BootstrapConfig,
    catalog: Arc<ComponentCatalog>,
    sources: Vec<Arc<dyn ComponentSource>>,
    bus: Bus,
    listener: Mutex<Option<Listener>>,
    phase: watch::Sender<Phase>,
    runtime_token: CancellationToken,
}

/// Task forwarding bus events into the subscriber set.
struct Listener {
    stop: CancellationToken,
    join: JoinHandle<()>,
}

impl Bootstrap {
    /// Returns a builder for configuring the bootstrap.
    pub fn builder(cfg: BootstrapConfig) -> BootstrapBuilder {
        BootstrapBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: BootstrapConfig,
        catalog: Arc<ComponentCatalog>,
        sources: Vec<Arc<dyn ComponentSource>>,
        bus: Bus,
        subs: SubscriberSet,
    ) -> Self {
        let (phase, _) = watch::channel(Phase::Idle);
        let listener = subscriber_listener(&bus, subs);
        Self {
            cfg,
            catalog,
            sources,
            bus,
            listener: Mutex::new(Some(listener)),
            phase,
            runtime_token: CancellationToken::new(),
        }
    }

    /// Delivers every event published so far to the subscribers and waits until they have
    /// handled them, then stops their workers.
    ///
    /// Later events only reach raw [`subscribe`](Self::subscribe) receivers. Calling it again
    /// is a no-op.
    pub async fn drain_subscribers(&self) {
        let Some(listener) = self.listener.lock().await.take() else {
            return;
        };
        listener.stop.cancel();
        let _ = listener.join.await;
    }

    /// Returns a receiver observing phase transitions.
    pub fn watch_phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Subscribes to the raw event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Cancels the runtime: interrupts retry waits and stops every timer.
    pub fn cancel(&self) {
        self.runtime_token.cancel();
    }

    /// Runs the configured namespaces.
    pub async fn run_configured(&self) -> Result<BootstrapReport, BootstrapError> {
        self.run(self.cfg.namespaces()).await
    }

    /// Runs the configured namespaces, then waits for a termination signal (or
    /// [`cancel`](Self::cancel)) and stops the timers within the configured grace.
    ///
    /// Subscribers are drained before returning, on success and on failure.
    pub async fn run_until_shutdown(&self) -> Result<(), BootstrapError> {
        let outcome = match self.run_configured().await {
            Ok(report) => {
                let trigger = shutdown::wait_for_trigger(&self.runtime_token).await;
                info!(
                    target: "bootvisor",
                    trigger = trigger.as_label(),
                    timers = report.scheduled(),
                    "stopping scheduled tasks"
                );
                report.shutdown(self.cfg.grace()).await.map_err(BootstrapError::from)
            }
            Err(err) => Err(err),
        };
        self.drain_subscribers().await;
        outcome
    }

    /// Runs the bootstrap over `namespaces`.
    ///
    /// Returns the report on [`Phase::Ready`], or the single fatal error that moved the run
    /// to [`Phase::Failed`].
    pub async fn run<I, N>(&self, namespaces: I) -> Result<BootstrapReport, BootstrapError>
    where
        I: IntoIterator<Item = N>,
        N: Into<Namespace>,
    {
        let namespaces: Vec<Namespace> = namespaces.into_iter().map(Into::into).collect();

        match self.sequence(&namespaces).await {
            Ok(report) => {
                self.enter(Phase::Ready);
                self.bus
                    .publish(Event::new(EventKind::BootstrapReady).with_phase(Phase::Ready));
                Ok(report)
            }
            Err(err) => {
                self.enter(Phase::Failed);
                self.bus.publish(failed_event(&err));
                Err(err)
            }
        }
    }

    async fn sequence(&self, namespaces: &[Namespace]) -> Result<BootstrapReport, BootstrapError> {
        self.enter(Phase::Scanning);
        let mut sources = Vec::with_capacity(self.cfg.classpath.len() + self.sources.len());
        for source in &self.cfg.classpath {
            sources.push(source.open()?);
        }
        sources.extend(self.sources.iter().cloned());

        let discovered = Scanner::new(sources, Arc::clone(&self.catalog))
            .with_bus(self.bus.clone())
            .scan(namespaces)?;

        self.enter(Phase::Activating);
        let mut activations: Vec<Activation> = Vec::new();
        for component in &discovered {
            let activation = activate(component).map_err(|source| BootstrapError::Activation {
                component: component.handle.name().to_string(),
                source,
            })?;
            if let Some(activation) = activation {
                self.bus.publish(
                    Event::new(EventKind::ComponentActivated)
                        .with_component(activation.component.as_str())
                        .with_initializers(activation.initializers.len()),
                );
                activations.push(activation);
            }
        }

        self.enter(Phase::Invoking);
        let executor = RetryExecutor::new(self.bus.clone(), self.runtime_token.clone());
        let mut scheduler = Scheduler::new(self.bus.clone(), &self.runtime_token);
        let mut invoked = 0;

        for activation in &activations {
            for spec in &activation.initializers {
                let outcome = if spec.is_scheduled() {
                    spec.schedules().iter().try_for_each(|schedule| {
                        scheduler
                            .schedule(
                                Arc::clone(&activation.instance),
                                &activation.component,
                                spec.entry_point(),
                                *schedule,
                            )
                            .map(|_| ())
                            .map_err(|source| BootstrapError::Activation {
                                component: activation.component.clone(),
                                source,
                            })
                    })
                } else {
                    invoked += 1;
                    executor
                        .invoke_with_retry(
                            activation.instance.as_ref(),
                            &activation.component,
                            spec.entry_point(),
                            spec.retry(),
                        )
                        .await
                        .map_err(|source| BootstrapError::Invocation {
                            component: activation.component.clone(),
                            entry_point: spec.entry_point().to_string(),
                            source,
                        })
                };

                if let Err(err) = outcome {
                    scheduler.cancel_all();
                    return Err(err);
                }
            }
        }

        Ok(BootstrapReport {
            activated: activations.into_iter().map(|a| a.component).collect(),
            invoked,
            scheduler,
        })
    }

    fn enter(&self, phase: Phase) {
        self.phase.send_replace(phase);
        self.bus
            .publish(Event::new(EventKind::PhaseChanged).with_phase(phase));
    }
}

fn subscriber_listener(bus: &Bus, set: SubscriberSet) -> Listener {
    let mut rx = bus.subscribe();
    let stop = CancellationToken::new();
    let token = stop.clone();
    let join = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                res = rx.recv() => match res {
                    Ok(ev) => set.emit(&ev),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
        // whatever was published before the stop request is still delivered
        loop {
            match rx.try_recv() {
                Ok(ev) => set.emit(&ev),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        set.close().await;
    });
    Listener { stop, join }
}

fn failed_event(err: &BootstrapError) -> Event {
    let mut ev = Event::new(EventKind::BootstrapFailed)
        .with_phase(err.phase())
        .with_reason(err.to_string());
    if let Some(component) = err.component() {
        ev = ev.with_component(component);
    }
    if let Some(entry_point) = err.entry_point() {
        ev = ev.with_entry_point(entry_point);
    }
    ev
}
