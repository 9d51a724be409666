//! # Component definition.
//!
//! [`ComponentDefinition`] is what a scanned entry resolves to: the component's qualified
//! name, its type-level marker, its zero-argument constructor and its initializer markers.
//!
//! ## Example
//! ```rust
//! use bootvisor::{ComponentDefinition, ComponentFn, InitializerSpec};
//!
//! let def = ComponentDefinition::new("app.config.ConfigLoader")
//!     .initializable()
//!     .constructor(|| {
//!         Ok(ComponentFn::new(()).entry("load_all_configs", |_| async { Ok(()) }))
//!     })
//!     .initializer(InitializerSpec::new("load_all_configs"));
//!
//! assert!(def.is_initializable());
//! assert_eq!(def.initializers().len(), 1);
//! ```

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::components::{Component, ComponentRef, Failure};
use crate::error::ActivationError;
use crate::markers::InitializerSpec;

type Constructor = Arc<dyn Fn() -> Result<ComponentRef, Failure> + Send + Sync>;

/// Loadable component definition.
#[derive(Clone)]
pub struct ComponentDefinition {
    name: String,
    initializable: bool,
    constructor: Option<Constructor>,
    initializers: Vec<InitializerSpec>,
}

impl ComponentDefinition {
    /// Creates a definition without markers or constructor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initializable: false,
            constructor: None,
            initializers: Vec::new(),
        }
    }

    /// Adds the type-level marker: the component participates in bootstrap.
    pub fn initializable(mut self) -> Self {
        self.initializable = true;
        self
    }

    /// Sets the zero-argument constructor.
    pub fn constructor<C, F>(mut self, f: F) -> Self
    where
        C: Component,
        F: Fn() -> Result<C, Failure> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(move || f().map(|c| Arc::new(c) as ComponentRef)));
        self
    }

    /// Adds an initializer marker.
    pub fn initializer(mut self, spec: InitializerSpec) -> Self {
        self.initializers.push(spec);
        self
    }

    /// Returns the fully-qualified component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the type-level marker is present.
    pub fn is_initializable(&self) -> bool {
        self.initializable
    }

    /// Returns the initializer markers in declaration order.
    pub fn initializers(&self) -> &[InitializerSpec] {
        &self.initializers
    }

    /// Calls the zero-argument constructor. A panicking constructor is reported as a failed one.
    pub(crate) fn instantiate(&self) -> Result<ComponentRef, ActivationError> {
        let ctor = self
            .constructor
            .as_ref()
            .ok_or(ActivationError::NoConstructor)?;
        panic::catch_unwind(AssertUnwindSafe(|| ctor()))
            .unwrap_or_else(|payload| Err(Failure::from_panic(payload.as_ref())))
            .map_err(ActivationError::Constructor)
    }
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("name", &self.name)
            .field("initializable", &self.initializable)
            .field("constructor", &self.constructor.is_some())
            .field("initializers", &self.initializers)
            .finish()
    }
}
