//! Error types used by the bootvisor runtime.
//!
//! This module defines the error enums for each bootstrap phase:
//!
//! - [`DiscoveryError`] - raised while scanning namespaces (fatal).
//! - [`ActivationError`] - raised while instantiating a component (fatal).
//! - [`InvocationError`] - raised by the retry executor for one initializer.
//! - [`BootstrapError`] - the single fatal error returned by a bootstrap run.
//! - [`RuntimeError`] - raised while stopping scheduled tasks.
//! - [`ConfigError`] - raised while loading [`BootstrapConfig`](crate::BootstrapConfig).
//!
//! All types provide `as_label` for logging/metrics.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::components::Failure;
use crate::core::Phase;

/// # Errors produced while discovering components.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Listing a namespace container failed for a reason other than "not found".
    #[error("failed to list namespace `{namespace}` in {location}: {source}")]
    Io {
        namespace: String,
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// A component entry was found but no definition is registered for it.
    #[error("failed to load component `{name}` found in {location}: no definition registered")]
    Unresolved { name: String, location: String },

    /// A classpath archive could not be read.
    #[error("failed to open archive {path:?}: {source}")]
    ArchiveIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A classpath archive is not a valid entry listing.
    #[error("malformed archive {path:?}: {source}")]
    ArchiveFormat {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl DiscoveryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            DiscoveryError::Io { .. } => "discovery_io",
            DiscoveryError::Unresolved { .. } => "discovery_unresolved",
            DiscoveryError::ArchiveIo { .. } => "discovery_archive_io",
            DiscoveryError::ArchiveFormat { .. } => "discovery_archive_format",
        }
    }
}

/// # Errors produced while activating a component.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ActivationError {
    /// Definition is initializable but declares no zero-argument constructor.
    #[error("no zero-argument constructor")]
    NoConstructor,

    /// The constructor returned a failure.
    #[error("constructor failed: {0}")]
    Constructor(#[source] Failure),

    /// An initializer marker names an entry point the instance does not expose.
    #[error("entry point `{0}` is not exposed by the component")]
    UnknownEntryPoint(String),

    /// A schedule marker cannot be turned into a timer.
    #[error("invalid schedule on `{entry_point}`: {reason}")]
    InvalidSchedule {
        entry_point: String,
        reason: &'static str,
    },
}

impl ActivationError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ActivationError::NoConstructor => "activation_no_constructor",
            ActivationError::Constructor(_) => "activation_constructor_failed",
            ActivationError::UnknownEntryPoint(_) => "activation_unknown_entry_point",
            ActivationError::InvalidSchedule { .. } => "activation_invalid_schedule",
        }
    }
}

/// # Errors produced by the retry executor for a single entry point.
///
/// Without a retry policy the original failure surfaces unwrapped as [`InvocationError::Raised`].
/// With a policy, a final failure is wrapped with the policy's failure message.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum InvocationError {
    /// Entry point without a retry policy failed on its only attempt.
    #[error(transparent)]
    Raised(Failure),

    /// Retry budget was exhausted; wraps the last failure.
    #[error("{message} (after {attempts} attempts)")]
    Exhausted {
        message: String,
        attempts: u32,
        #[source]
        source: Failure,
    },

    /// Failure kind is not in the policy's retryable set; wraps the failure.
    #[error("{message} (non-retryable after {attempts} attempts)")]
    NotRetryable {
        message: String,
        attempts: u32,
        #[source]
        source: Failure,
    },

    /// Bootstrap was cancelled while waiting between attempts.
    #[error("cancelled while waiting to retry")]
    Cancelled,
}

impl InvocationError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            InvocationError::Raised(_) => "invocation_raised",
            InvocationError::Exhausted { .. } => "invocation_retries_exhausted",
            InvocationError::NotRetryable { .. } => "invocation_not_retryable",
            InvocationError::Cancelled => "invocation_cancelled",
        }
    }

    /// Returns the original failure, if any.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            InvocationError::Raised(f) => Some(f),
            InvocationError::Exhausted { source, .. } => Some(source),
            InvocationError::NotRetryable { source, .. } => Some(source),
            InvocationError::Cancelled => None,
        }
    }

    /// Returns `true` when the failure is wrapped with a policy failure message.
    pub fn is_wrapped(&self) -> bool {
        matches!(
            self,
            InvocationError::Exhausted { .. } | InvocationError::NotRetryable { .. }
        )
    }
}

/// # The single fatal error of a bootstrap run.
///
/// Identifies the phase and the component (and entry point) that caused termination,
/// preserving the original cause as its [`source`](std::error::Error::source).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Scanning failed.
    #[error("discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Instantiating a component failed.
    #[error("activation of `{component}` failed: {source}")]
    Activation {
        component: String,
        #[source]
        source: ActivationError,
    },

    /// An initializer failed under its retry policy (or without one).
    #[error("initializer `{component}::{entry_point}` failed: {source}")]
    Invocation {
        component: String,
        entry_point: String,
        #[source]
        source: InvocationError,
    },

    /// Scheduled tasks did not stop in time during shutdown.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl BootstrapError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use bootvisor::{BootstrapError, DiscoveryError};
    ///
    /// let err = BootstrapError::from(DiscoveryError::Unresolved {
    ///     name: "app.Missing".into(),
    ///     location: "dir:/tmp".into(),
    /// });
    /// assert_eq!(err.as_label(), "discovery_unresolved");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BootstrapError::Discovery(e) => e.as_label(),
            BootstrapError::Activation { source, .. } => source.as_label(),
            BootstrapError::Invocation { source, .. } => source.as_label(),
            BootstrapError::Runtime(e) => e.as_label(),
        }
    }

    /// Returns the phase in which the bootstrap failed.
    ///
    /// Shutdown errors happen after [`Phase::Ready`] and report it.
    pub fn phase(&self) -> Phase {
        match self {
            BootstrapError::Discovery(_) => Phase::Scanning,
            BootstrapError::Activation { .. } => Phase::Activating,
            BootstrapError::Invocation { .. } => Phase::Invoking,
            BootstrapError::Runtime(_) => Phase::Ready,
        }
    }

    /// Returns the component that caused termination, if known.
    pub fn component(&self) -> Option<&str> {
        match self {
            BootstrapError::Discovery(DiscoveryError::Unresolved { name, .. }) => Some(name),
            BootstrapError::Activation { component, .. } => Some(component),
            BootstrapError::Invocation { component, .. } => Some(component),
            _ => None,
        }
    }

    /// Returns the initializer entry point that caused termination, if any.
    pub fn entry_point(&self) -> Option<&str> {
        match self {
            BootstrapError::Invocation { entry_point, .. } => Some(entry_point),
            _ => None,
        }
    }
}

/// # Errors produced by the scheduling runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown grace period was exceeded; some timers remained stuck and were aborted.
    #[error("shutdown timeout {grace:?} exceeded; stuck: {stuck:?}; forcing termination")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Names of the scheduled tasks that did not stop in time.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }
}

/// # Errors produced while loading configuration.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn invocation_wrapping_is_reported() {
        let raw = InvocationError::Raised(Failure::io("down"));
        assert!(!raw.is_wrapped());
        assert_eq!(raw.to_string(), "io: down");

        let wrapped = InvocationError::Exhausted {
            message: "db unreachable".into(),
            attempts: 4,
            source: Failure::io("down"),
        };
        assert!(wrapped.is_wrapped());
        assert_eq!(wrapped.to_string(), "db unreachable (after 4 attempts)");
        assert_eq!(wrapped.failure().map(|f| f.message()), Some("down"));
    }

    #[test]
    fn bootstrap_error_keeps_cause_chain() {
        let err = BootstrapError::Invocation {
            component: "app.Db".into(),
            entry_point: "connect".into(),
            source: InvocationError::NotRetryable {
                message: "boom".into(),
                attempts: 1,
                source: Failure::invalid_state("closed"),
            },
        };
        assert_eq!(err.phase(), Phase::Invoking);
        assert_eq!(err.component(), Some("app.Db"));
        assert_eq!(err.entry_point(), Some("connect"));

        let inner = err.source().and_then(|s| s.source()).map(|s| s.to_string());
        assert_eq!(inner.as_deref(), Some("invalid_state: closed"));
    }
}
