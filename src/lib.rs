//! # bootvisor
//!
//! **Bootvisor** discovers components inside logical namespaces, instantiates the ones marked
//! initializable, runs their initializer entry points exactly once per startup (with bounded,
//! fixed-delay, kind-selective retries) and drives entry points that declare recurring
//! schedules on background timers.
//!
//! Components, markers and storage are explicit values: a [`ComponentCatalog`] maps qualified
//! names to [`ComponentDefinition`]s, markers are plain structs ([`InitializerSpec`],
//! [`RetryPolicy`], [`ScheduleSpec`]) and storage is any [`ComponentSource`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  BootstrapConfig ──► Bootstrap::builder(cfg)
//!                        .with_catalog(ComponentCatalog)      name → ComponentDefinition
//!                        .with_source(DirectorySource | ArchiveSource)
//!                        .with_subscribers([LogWriter, ...])
//!                        .build()
//!                             │
//!                             ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Bootstrap::run(namespaces)                                       │
//! │    Scanning   ─► Scanner        (namespaces × classpath)          │
//! │    Activating ─► activate()     (constructor + marker checks)     │
//! │    Invoking   ─► RetryExecutor  (direct initializers)             │
//! │               └► Scheduler      (scheduled initializers)          │
//! │    Ready      ─► BootstrapReport { activated, invoked, scheduler }│
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                │ publish(Event)
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                   Bus (broadcast channel)                         │
//! │              (capacity: BootstrapConfig::bus_capacity)            │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//!                      subscriber listener ──► SubscriberSet
//!                                          ┌─────────┼─────────┐
//!                                          ▼         ▼         ▼
//!                                      LogWriter  worker2   workerN
//! ```
//!
//! ### Failure model
//! ```text
//! DiscoveryError   (unresolvable entry, unreadable source)   ─► Failed
//! ActivationError  (no/failed constructor, bad marker)        ─► Failed
//! InvocationError  (no policy: raw; policy: wrapped message)  ─► Failed
//! scheduled firing failure / panic                            ─► ScheduledFailed event, timer continues
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                                  |
//! |-------------------|---------------------------------------------------------------|-----------------------------------------------------|
//! | **Components**    | Named zero-argument entry points, closure-backed helper.      | [`Component`], [`ComponentFn`], [`Failure`]         |
//! | **Markers**       | Initializers, retry policies, schedules.                      | [`InitializerSpec`], [`RetryPolicy`], [`ScheduleSpec`] |
//! | **Discovery**     | Directory and archive storage behind one abstraction.         | [`Scanner`], [`DirectorySource`], [`ArchiveSource`] |
//! | **Bootstrap**     | Phase sequencing, reports, graceful timer shutdown.           | [`Bootstrap`], [`Phase`], [`Scheduler`]             |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics, custom).       | [`Subscribe`], [`LogWriter`]                        |
//! | **Errors**        | Typed errors with stable labels.                              | [`BootstrapError`], [`InvocationError`]             |
//! | **Configuration** | TOML-loadable settings.                                       | [`BootstrapConfig`]                                 |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use bootvisor::{
//!     ArchiveSource, Bootstrap, BootstrapConfig, ComponentDefinition, ComponentFn, Failure,
//!     FailureKind, InitializerSpec, RetryPolicy,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let database = ComponentDefinition::new("app.database.Database")
//!         .initializable()
//!         .constructor(|| {
//!             Ok(ComponentFn::new(()).entry("connect", |_| async { Ok::<_, Failure>(()) }))
//!         })
//!         .initializer(
//!             InitializerSpec::new("connect").with_retry(
//!                 RetryPolicy::new(3)
//!                     .with_delay(Duration::from_millis(10))
//!                     .retry_on([FailureKind::Io]),
//!             ),
//!         );
//!
//!     let bootstrap = Bootstrap::builder(BootstrapConfig::default())
//!         .register(database)
//!         .with_source(ArchiveSource::from_entries(
//!             "archive:inline",
//!             ["app/database/Database.component"],
//!         ))
//!         .build();
//!
//!     let report = bootstrap.run(["app.database"]).await?;
//!     assert_eq!(report.invoked(), 1);
//!     report.shutdown(Duration::from_secs(1)).await?;
//!     Ok(())
//! }
//! ```

mod components;
mod config;
mod core;
mod error;
mod events;
mod markers;
mod scanner;
mod subscribers;

// ---- Public re-exports ----

pub use components::{
    Component, ComponentCatalog, ComponentDefinition, ComponentFn, ComponentRef, Failure,
    FailureKind,
};
pub use config::{BootstrapConfig, SourceConfig};
pub use crate::core::{
    Activation, Bootstrap, BootstrapBuilder, BootstrapReport, Phase, RetryExecutor,
    ScheduledTaskHandle, Scheduler, activate,
};
pub use error::{
    ActivationError, BootstrapError, ConfigError, DiscoveryError, InvocationError, RuntimeError,
};
pub use events::{Bus, Event, EventKind};
pub use markers::{DEFAULT_FAILURE_MESSAGE, InitializerSpec, RetryOn, RetryPolicy, ScheduleSpec};
pub use scanner::{
    ArchiveSource, COMPONENT_EXT, ComponentHandle, ComponentSource, DirectorySource,
    DiscoveredComponent, Namespace, Scanner,
};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
