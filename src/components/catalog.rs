//! # Component catalog.
//!
//! [`ComponentCatalog`] maps qualified component names to their [`ComponentDefinition`].
//! It is the explicit replacement for a class loader: the scanner finds *names* in storage,
//! the catalog turns each name into a loadable definition.
//!
//! ## Rules
//! - Registering a name twice replaces the previous definition (the old one is returned).
//! - Loading a name that is not registered is a [`DiscoveryError::Unresolved`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::components::ComponentDefinition;
use crate::error::DiscoveryError;
use crate::scanner::ComponentHandle;

/// Registry of loadable component definitions.
#[derive(Clone, Debug, Default)]
pub struct ComponentCatalog {
    defs: HashMap<String, Arc<ComponentDefinition>>,
}

impl ComponentCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition, returning the one it replaced.
    pub fn register(&mut self, def: ComponentDefinition) -> Option<Arc<ComponentDefinition>> {
        self.defs.insert(def.name().to_string(), Arc::new(def))
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, def: ComponentDefinition) -> Self {
        self.register(def);
        self
    }

    /// Resolves a scanned handle into its definition.
    pub fn load(&self, handle: &ComponentHandle) -> Result<Arc<ComponentDefinition>, DiscoveryError> {
        self.defs
            .get(handle.name())
            .cloned()
            .ok_or_else(|| DiscoveryError::Unresolved {
                name: handle.name().to_string(),
                location: handle.location().to_string(),
            })
    }

    /// Returns sorted list of registered names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.defs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered definitions.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_resolves_registered_names() {
        let catalog = ComponentCatalog::new()
            .with(ComponentDefinition::new("app.AutoSaver"))
            .with(ComponentDefinition::new("app.http.ServiceRegistry"));

        let handle = ComponentHandle::new("app.AutoSaver", "dir:/classes/app/AutoSaver.component");
        assert_eq!(catalog.load(&handle).unwrap().name(), "app.AutoSaver");
        assert_eq!(catalog.names(), vec!["app.AutoSaver", "app.http.ServiceRegistry"]);
    }

    #[test]
    fn load_of_unknown_name_is_unresolved() {
        let catalog = ComponentCatalog::new();
        let handle = ComponentHandle::new("app.Ghost", "archive:app.toml");
        let err = catalog.load(&handle).unwrap_err();
        assert_eq!(err.as_label(), "discovery_unresolved");
        assert!(err.to_string().contains("app.Ghost"));
    }

    #[test]
    fn register_replaces_and_returns_previous() {
        let mut catalog = ComponentCatalog::new();
        assert!(catalog.register(ComponentDefinition::new("a.B")).is_none());
        let prev = catalog.register(ComponentDefinition::new("a.B").initializable());
        assert!(prev.is_some_and(|d| !d.is_initializable()));
        assert_eq!(catalog.len(), 1);
    }
}
