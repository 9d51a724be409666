//! # Failures raised by component entry points.
//!
//! A [`Failure`] is the typed error an entry point returns. Every failure carries a
//! [`FailureKind`] tag from a closed set; retry policies match on the tag, never on the
//! concrete error type behind it.
//!
//! ```rust
//! use bootvisor::{Failure, FailureKind};
//!
//! let f = Failure::io("connection refused");
//! assert_eq!(f.kind(), FailureKind::Io);
//! assert_eq!(f.to_string(), "io: connection refused");
//! ```

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Closed set of failure tags used for selective retry matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// I/O or transport error (connection refused, broken pipe, ...).
    Io,
    /// The operation did not finish in time.
    Timeout,
    /// The component was not in a state that allows the operation.
    InvalidState,
    /// A value supplied to the component was rejected.
    InvalidArgument,
    /// A dependency is temporarily unavailable.
    Unavailable,
    /// Anything else.
    Internal,
}

impl FailureKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            FailureKind::Io => "io",
            FailureKind::Timeout => "timeout",
            FailureKind::InvalidState => "invalid_state",
            FailureKind::InvalidArgument => "invalid_argument",
            FailureKind::Unavailable => "unavailable",
            FailureKind::Internal => "internal",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Error returned by a component entry point or constructor.
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct Failure {
    kind: FailureKind,
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Failure {
    /// Creates a failure with the given tag and message.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for [`FailureKind::Io`].
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Io, message)
    }

    /// Shorthand for [`FailureKind::Timeout`].
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, message)
    }

    /// Shorthand for [`FailureKind::InvalidState`].
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidState, message)
    }

    /// Shorthand for [`FailureKind::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Internal, message)
    }

    /// Turns a caught panic payload into an [`FailureKind::Internal`] failure.
    pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
        Self::internal(format!("panicked: {}", panic_message(payload)))
    }

    /// Attaches an underlying cause.
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the failure tag.
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Returns the failure message (without the kind prefix).
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for Failure {
    fn from(err: std::io::Error) -> Self {
        Failure::io(err.to_string()).with_source(err)
    }
}

/// Extracts a readable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_maps_to_io_kind_and_keeps_source() {
        let err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let f = Failure::from(err);
        assert_eq!(f.kind(), FailureKind::Io);
        assert!(f.source().is_some());
    }

    #[test]
    fn display_prefixes_kind_label() {
        let f = Failure::new(FailureKind::InvalidState, "not ready");
        assert_eq!(f.to_string(), "invalid_state: not ready");
        assert_eq!(f.message(), "not ready");
    }

    #[test]
    fn panic_payloads_become_internal_failures() {
        let payload = std::panic::catch_unwind(|| panic!("pool {} gone", 3)).unwrap_err();
        let f = Failure::from_panic(payload.as_ref());
        assert_eq!(f.kind(), FailureKind::Internal);
        assert_eq!(f.message(), "panicked: pool 3 gone");

        let payload = std::panic::catch_unwind(|| std::panic::panic_any(7_u8)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
