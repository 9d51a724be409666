//! # Closure-backed component (`ComponentFn`)
//!
//! [`ComponentFn`] wraps a shared state value `T` and a table of named closures
//! `Fn(Arc<T>) -> Fut`, producing a fresh future per invocation.
//!
//! ## Concurrency semantics
//! - Each [`Component::invoke`] call creates a **new** future that owns a clone of the `Arc<T>`.
//! - No hidden mutation between invocations; shared counters or connections belong in `T`
//!   behind atomics or locks.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use bootvisor::{Component, ComponentFn, Failure};
//!
//! let saver = ComponentFn::new(AtomicU32::new(0))
//!     .entry("start_auto_saving", |state| async move {
//!         state.fetch_add(1, Ordering::Relaxed);
//!         Ok::<_, Failure>(())
//!     });
//!
//! assert_eq!(saver.entry_points(), &["start_auto_saving"]);
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::components::{Component, Failure};

type EntryFn<T> = Box<dyn Fn(Arc<T>) -> BoxFuture<'static, Result<(), Failure>> + Send + Sync>;

/// Function-backed component implementation.
pub struct ComponentFn<T> {
    state: Arc<T>,
    names: Vec<&'static str>,
    entries: Vec<EntryFn<T>>,
}

impl<T> ComponentFn<T>
where
    T: Send + Sync + 'static,
{
    /// Creates a component with no entry points around `state`.
    pub fn new(state: T) -> Self {
        Self::from_arc(Arc::new(state))
    }

    /// Creates a component around an already shared state.
    ///
    /// Useful when the caller keeps a handle to observe the state (tests, metrics).
    pub fn from_arc(state: Arc<T>) -> Self {
        Self {
            state,
            names: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Adds (or replaces) the entry point `name`.
    pub fn entry<F, Fut>(mut self, name: &'static str, f: F) -> Self
    where
        F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), Failure>> + Send + 'static,
    {
        let entry: EntryFn<T> = Box::new(move |state| Box::pin(f(state)));
        match self.names.iter().position(|n| *n == name) {
            Some(idx) => self.entries[idx] = entry,
            None => {
                self.names.push(name);
                self.entries.push(entry);
            }
        }
        self
    }

    /// Returns the shared state.
    pub fn state(&self) -> &Arc<T> {
        &self.state
    }
}

#[async_trait]
impl<T> Component for ComponentFn<T>
where
    T: Send + Sync + 'static,
{
    fn entry_points(&self) -> &[&'static str] {
        &self.names
    }

    async fn invoke(&self, entry_point: &str) -> Result<(), Failure> {
        let idx = self
            .names
            .iter()
            .position(|n| *n == entry_point)
            .ok_or_else(|| Failure::unknown_entry_point(entry_point))?;
        (self.entries[idx])(Arc::clone(&self.state)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::FailureKind;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn dispatches_by_name() {
        let c = ComponentFn::new(AtomicU32::new(0))
            .entry("inc", |s| async move {
                s.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .entry("fail", |_| async { Err(Failure::io("nope")) });

        c.invoke("inc").await.unwrap();
        c.invoke("inc").await.unwrap();
        assert_eq!(c.state().load(Ordering::SeqCst), 2);

        let err = c.invoke("fail").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Io);
    }

    #[tokio::test]
    async fn unknown_entry_point_is_invalid_argument() {
        let c = ComponentFn::new(());
        let err = c.invoke("missing").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidArgument);
    }

    #[test]
    fn redefining_an_entry_keeps_one_name() {
        let c = ComponentFn::new(())
            .entry("run", |_| async { Ok(()) })
            .entry("run", |_| async { Err(Failure::internal("second")) });
        assert_eq!(c.entry_points(), &["run"]);
    }
}
