//! # Example: bootstrap_app
//!
//! Boots a small application: five components spread over four namespaces, one of which
//! needs several attempts to connect to its database, and one heartbeat running on two
//! independent schedules.
//!
//! ## Flow
//! ```text
//! Bootstrap::run_until_shutdown()
//!   ├─► Scanning:   app, app.config, app.database, app.http
//!   ├─► Activating: AutoSaver, Heartbeat, ConfigLoader, DatabaseConnection, ServiceRegistry
//!   ├─► Invoking:
//!   │     ├─ AutoSaver::start_auto_saving_threads
//!   │     ├─ Heartbeat::beat            → scheduled {0s, 5s} and {2s, 10s}
//!   │     ├─ ConfigLoader::load_all_configs
//!   │     ├─ DatabaseConnection::connect_to_h2   (fails 5×, retried every 1s)
//!   │     ├─ DatabaseConnection::connect_to_mysql
//!   │     └─ ServiceRegistry::register_service
//!   ├─► Ready: heartbeat keeps firing
//!   └─► Ctrl-C: timers stopped within grace
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example bootstrap_app
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use bootvisor::{
    ArchiveSource, Bootstrap, BootstrapConfig, ComponentCatalog, ComponentDefinition, ComponentFn,
    Failure, FailureKind, InitializerSpec, LogWriter, RetryPolicy, ScheduleSpec, Subscribe,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn auto_saver() -> ComponentDefinition {
    ComponentDefinition::new("app.AutoSaver")
        .initializable()
        .constructor(|| {
            Ok(ComponentFn::new(()).entry("start_auto_saving_threads", |_| async {
                info!("start automatic data saving to disk");
                Ok(())
            }))
        })
        .initializer(InitializerSpec::new("start_auto_saving_threads"))
}

fn heartbeat() -> ComponentDefinition {
    ComponentDefinition::new("app.Heartbeat")
        .initializable()
        .constructor(|| {
            Ok(ComponentFn::new(AtomicU32::new(0)).entry("beat", |beats| async move {
                let n = beats.fetch_add(1, Ordering::Relaxed) + 1;
                if n % 4 == 0 {
                    return Err(Failure::timeout(format!("beat #{n} missed its deadline")));
                }
                info!(beat = n, "heartbeat");
                Ok(())
            }))
        })
        .initializer(
            InitializerSpec::new("beat")
                .with_schedule(ScheduleSpec::from_secs(0, 5))
                .with_schedule(ScheduleSpec::from_secs(2, 10)),
        )
}

fn config_loader() -> ComponentDefinition {
    ComponentDefinition::new("app.config.ConfigLoader")
        .initializable()
        .constructor(|| {
            Ok(ComponentFn::new(()).entry("load_all_configs", |_| async {
                info!("loading all configuration files");
                Ok(())
            }))
        })
        .initializer(InitializerSpec::new("load_all_configs"))
}

fn database_connection() -> ComponentDefinition {
    ComponentDefinition::new("app.database.DatabaseConnection")
        .initializable()
        .constructor(|| {
            Ok(ComponentFn::new(AtomicU32::new(5))
                .entry("connect_to_h2", |remaining| async move {
                    info!("connecting to H2 database");
                    let left = remaining.load(Ordering::Relaxed);
                    if left > 0 {
                        remaining.store(left - 1, Ordering::Relaxed);
                        return Err(Failure::io("connection failed"));
                    }
                    info!("connecting to H2 database succeeded");
                    Ok(())
                })
                .entry("connect_to_mysql", |_| async {
                    info!("connection to MySQL database");
                    Ok(())
                }))
        })
        .initializer(
            InitializerSpec::new("connect_to_h2").with_retry(
                RetryPolicy::new(10)
                    .with_delay(Duration::from_millis(1_000))
                    .retry_on([FailureKind::Io])
                    .with_failure_message(
                        "Connecting to H2 database is failed after retry operation",
                    ),
            ),
        )
        .initializer(InitializerSpec::new("connect_to_mysql"))
}

fn service_registry() -> ComponentDefinition {
    ComponentDefinition::new("app.http.ServiceRegistry")
        .initializable()
        .constructor(|| {
            Ok(ComponentFn::new(()).entry("register_service", |_| async {
                info!("service successfully registered");
                Ok(())
            }))
        })
        .initializer(InitializerSpec::new("register_service"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. Configure: namespaces to scan, 5s grace for the timers
    let cfg = BootstrapConfig {
        namespaces: vec![
            "app".into(),
            "app.config".into(),
            "app.database".into(),
            "app.http".into(),
        ],
        grace_secs: 5,
        ..BootstrapConfig::default()
    };

    // 2. Register the definitions the classpath entries resolve to
    let catalog = ComponentCatalog::new()
        .with(auto_saver())
        .with(heartbeat())
        .with(config_loader())
        .with(database_connection())
        .with(service_registry());

    // 3. One packed archive holding every entry
    let classpath = ArchiveSource::from_entries(
        "archive:app",
        [
            "app/AutoSaver.component",
            "app/Heartbeat.component",
            "app/config/ConfigLoader.component",
            "app/database/DatabaseConnection.component",
            "app/http/ServiceRegistry.component",
        ],
    );

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let bootstrap = Bootstrap::builder(cfg)
        .with_catalog(catalog)
        .with_source(classpath)
        .with_subscribers(subs)
        .build();

    // 4. Run, keep the heartbeat alive until Ctrl-C
    bootstrap.run_until_shutdown().await?;
    info!("done");
    Ok(())
}
