//! # Component abstraction.
//!
//! A [`Component`] is a live instance produced by a zero-argument constructor. It exposes a
//! fixed set of named entry points (zero arguments, no return value) and dispatches them
//! through [`Component::invoke`]. This is the dynamic-invocation seam the bootstrap uses
//! instead of runtime reflection.
//!
//! Entry points may be invoked concurrently (several schedules on one entry point), so any
//! mutable state must live behind atomics or locks owned by the component.

use std::sync::Arc;

use async_trait::async_trait;

use crate::components::Failure;

/// Shared handle to a live component.
pub type ComponentRef = Arc<dyn Component>;

/// # Instance with named, zero-argument entry points.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use bootvisor::{Component, Failure};
///
/// struct ServiceRegistry;
///
/// #[async_trait]
/// impl Component for ServiceRegistry {
///     fn entry_points(&self) -> &[&'static str] {
///         &["register_service"]
///     }
///
///     async fn invoke(&self, entry_point: &str) -> Result<(), Failure> {
///         match entry_point {
///             "register_service" => Ok(()),
///             other => Err(Failure::unknown_entry_point(other)),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Component: Send + Sync + 'static {
    /// Names of the entry points this instance can dispatch.
    fn entry_points(&self) -> &[&'static str];

    /// Invokes the named entry point once.
    async fn invoke(&self, entry_point: &str) -> Result<(), Failure>;
}

impl Failure {
    /// Failure returned when dispatching a name the component does not expose.
    pub fn unknown_entry_point(entry_point: &str) -> Self {
        Failure::new(
            crate::components::FailureKind::InvalidArgument,
            format!("no entry point named `{entry_point}`"),
        )
    }
}
