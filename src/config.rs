//! # Bootstrap configuration.
//!
//! Provides [`BootstrapConfig`]: namespaces to scan, the ordered classpath, the shutdown grace
//! period and the event bus capacity. It can be built in code or loaded from TOML:
//!
//! ```toml
//! namespaces = ["app", "app.config", "app.database", "app.http"]
//! grace_secs = 10
//!
//! [[classpath]]
//! kind = "directory"
//! path = "target/classes"
//!
//! [[classpath]]
//! kind = "archive"
//! path = "lib/app.toml"
//! ```
//!
//! ## Sentinel values
//! - `grace_secs = 0` → no wait on shutdown, timers are aborted immediately
//! - `bus_capacity = 0` → clamped to 1

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, DiscoveryError};
use crate::scanner::{ArchiveSource, ComponentSource, DirectorySource, Namespace};

/// One classpath element.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// A directory tree; namespace `a.b` maps to `<path>/a/b`.
    Directory { path: PathBuf },
    /// A packed archive listing its entries.
    Archive { path: PathBuf },
}

impl SourceConfig {
    /// Opens the source. Directories are opened lazily; archives are read now.
    pub fn open(&self) -> Result<Arc<dyn ComponentSource>, DiscoveryError> {
        match self {
            SourceConfig::Directory { path } => Ok(Arc::new(DirectorySource::new(path.clone()))),
            SourceConfig::Archive { path } => Ok(Arc::new(ArchiveSource::open(path)?)),
        }
    }
}

/// Configuration for a bootstrap run.
///
/// ## Field semantics
/// - `namespaces`: scanned by [`Bootstrap::run_configured`](crate::Bootstrap::run_configured)
/// - `classpath`: storage sources searched in order for every namespace
/// - `grace_secs`: maximum wait for scheduled tasks to stop on shutdown
/// - `bus_capacity`: event bus ring buffer size (min 1)
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Namespaces to scan, in order.
    pub namespaces: Vec<String>,
    /// Classpath sources, in order.
    pub classpath: Vec<SourceConfig>,
    /// Shutdown grace period in seconds.
    pub grace_secs: u64,
    /// Capacity of the event bus broadcast channel.
    ///
    /// Slow listeners that lag behind more than `bus_capacity` messages skip older items.
    pub bus_capacity: usize,
}

impl BootstrapConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Returns the shutdown grace period.
    #[inline]
    pub fn grace(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns the configured namespaces.
    pub fn namespaces(&self) -> Vec<Namespace> {
        self.namespaces.iter().map(Namespace::new).collect()
    }
}

impl Default for BootstrapConfig {
    /// Default configuration:
    ///
    /// - no namespaces, empty classpath
    /// - `grace_secs = 30`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            namespaces: Vec::new(),
            classpath: Vec::new(),
            grace_secs: 30,
            bus_capacity: 1024,
        }
    }
}
