//! # Components and their definitions.
//!
//! This module provides the component-related types:
//! - [`Component`] - trait for instances with named zero-argument entry points
//! - [`ComponentFn`] - closure-backed component implementation
//! - [`ComponentRef`] - shared reference to a component (`Arc<dyn Component>`)
//! - [`ComponentDefinition`] - markers plus zero-argument constructor
//! - [`ComponentCatalog`] - name → definition registry used to load scanned entries
//! - [`Failure`] / [`FailureKind`] - typed entry point failures

mod catalog;
mod component;
mod component_fn;
mod definition;
mod failure;

pub use catalog::ComponentCatalog;
pub use component::{Component, ComponentRef};
pub use component_fn::ComponentFn;
pub use definition::ComponentDefinition;
pub use failure::{Failure, FailureKind};

pub(crate) use failure::panic_message;
