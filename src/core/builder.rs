use std::sync::Arc;

use crate::{
    components::{ComponentCatalog, ComponentDefinition},
    config::BootstrapConfig,
    events::Bus,
    scanner::ComponentSource,
    subscribers::{Subscribe, SubscriberSet},
};
use super::bootstrap::Bootstrap;

/// Builder for constructing a [`Bootstrap`].
pub struct BootstrapBuilder {
    cfg: BootstrapConfig,
    catalog: ComponentCatalog,
    sources: Vec<Arc<dyn ComponentSource>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl BootstrapBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: BootstrapConfig) -> Self {
        Self {
            cfg,
            catalog: ComponentCatalog::new(),
            sources: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// Replaces the component catalog.
    pub fn with_catalog(mut self, catalog: ComponentCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Registers one definition in the catalog (replacing any with the same name).
    pub fn register(mut self, def: ComponentDefinition) -> Self {
        self.catalog.register(def);
        self
    }

    /// Appends a classpath source after those listed in the configuration.
    pub fn with_source(mut self, source: impl ComponentSource) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Sets the event subscribers.
    ///
    /// Each one gets its own worker and bounded queue; see [`Subscribe::wants`] for filtering.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the bootstrap.
    ///
    /// Must be called inside a tokio runtime: subscriber workers and the bus listener are
    /// spawned here.
    pub fn build(self) -> Bootstrap {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = SubscriberSet::new(self.subscribers, bus.clone());

        Bootstrap::new_internal(
            self.cfg,
            Arc::new(self.catalog),
            self.sources,
            bus,
            subs,
        )
    }
}
