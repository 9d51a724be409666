//! # Namespace scanner.
//!
//! Walks every namespace over every classpath source (in order), resolves each entry through
//! the [`ComponentCatalog`] and returns the discovered components.
//!
//! ## Flow
//! ```text
//! for namespace in namespaces:
//!   for source in classpath:
//!     for stem in source.list(namespace)?       (missing namespace → [])
//!       ├─ name = namespace.qualify(stem)
//!       ├─ seen before?  → publish ComponentShadowed, skip
//!       ├─ catalog.load(handle)?                (unresolved → abort whole scan)
//!       └─ publish ComponentDiscovered
//! ```
//!
//! ## Rules
//! - A qualified name is discovered **once** per scan; the first occurrence (namespace order,
//!   then classpath order) wins.
//! - One unresolvable entry aborts the scan (fail-fast).

use std::collections::HashSet;
use std::sync::Arc;

use crate::components::{ComponentCatalog, ComponentDefinition};
use crate::error::DiscoveryError;
use crate::events::{Bus, Event, EventKind};
use crate::scanner::{COMPONENT_EXT, ComponentHandle, ComponentSource, Namespace};

/// A scanned handle together with its loaded definition.
#[derive(Clone, Debug)]
pub struct DiscoveredComponent {
    /// Where the component was found.
    pub handle: ComponentHandle,
    /// The loaded definition.
    pub definition: Arc<ComponentDefinition>,
}

/// Scans namespaces over an ordered classpath.
pub struct Scanner {
    sources: Vec<Arc<dyn ComponentSource>>,
    catalog: Arc<ComponentCatalog>,
    bus: Option<Bus>,
}

impl Scanner {
    /// Creates a scanner over `sources` resolving names through `catalog`.
    pub fn new(sources: Vec<Arc<dyn ComponentSource>>, catalog: Arc<ComponentCatalog>) -> Self {
        Self {
            sources,
            catalog,
            bus: None,
        }
    }

    /// Publishes discovery events to `bus`.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Scans all `namespaces`.
    pub fn scan(&self, namespaces: &[Namespace]) -> Result<Vec<DiscoveredComponent>, DiscoveryError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut found = Vec::new();

        for namespace in namespaces {
            for source in &self.sources {
                for stem in source.list(namespace)? {
                    let name = namespace.qualify(&stem);
                    let location = entry_location(source.as_ref(), namespace, &stem);

                    if !seen.insert(name.clone()) {
                        self.publish(
                            Event::new(EventKind::ComponentShadowed)
                                .with_component(name.as_str())
                                .with_reason(location),
                        );
                        continue;
                    }

                    let handle = ComponentHandle::new(name, location);
                    let definition = self.catalog.load(&handle)?;
                    self.publish(
                        Event::new(EventKind::ComponentDiscovered)
                            .with_component(handle.name())
                            .with_reason(handle.location()),
                    );
                    found.push(DiscoveredComponent { handle, definition });
                }
            }
        }
        Ok(found)
    }

    fn publish(&self, ev: Event) {
        if let Some(bus) = &self.bus {
            bus.publish(ev);
        }
    }
}

fn entry_location(source: &dyn ComponentSource, namespace: &Namespace, stem: &str) -> String {
    match namespace.container_path() {
        Some(dir) if !dir.is_empty() => {
            format!("{}!/{dir}/{stem}.{COMPONENT_EXT}", source.location())
        }
        _ => format!("{}!/{stem}.{COMPONENT_EXT}", source.location()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ArchiveSource;

    fn catalog(names: &[&str]) -> Arc<ComponentCatalog> {
        let mut c = ComponentCatalog::new();
        for n in names {
            c.register(ComponentDefinition::new(*n));
        }
        Arc::new(c)
    }

    fn archive(entries: &[&str]) -> Arc<dyn ComponentSource> {
        Arc::new(ArchiveSource::from_entries("archive:mem", entries.iter().copied()))
    }

    #[test]
    fn scans_each_namespace_over_each_source() {
        let scanner = Scanner::new(
            vec![
                archive(&["app/AutoSaver.component"]),
                archive(&["app/config/ConfigLoader.component"]),
            ],
            catalog(&["app.AutoSaver", "app.config.ConfigLoader"]),
        );

        let found = scanner
            .scan(&["app".into(), "app.config".into()])
            .unwrap();
        let mut names: Vec<&str> = found.iter().map(|d| d.handle.name()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["app.AutoSaver", "app.config.ConfigLoader"]);
        assert_eq!(
            found[0].handle.location(),
            "archive:mem!/app/AutoSaver.component"
        );
    }

    #[test]
    fn empty_or_missing_namespaces_yield_nothing() {
        let scanner = Scanner::new(vec![archive(&["app/AutoSaver.component"])], catalog(&[]));
        assert!(scanner.scan(&["other".into()]).unwrap().is_empty());
        assert!(scanner.scan(&[]).unwrap().is_empty());
    }

    #[test]
    fn overlapping_inputs_are_discovered_once() {
        let scanner = Scanner::new(
            vec![
                archive(&["app/AutoSaver.component"]),
                archive(&["app/AutoSaver.component"]),
            ],
            catalog(&["app.AutoSaver"]),
        );
        let found = scanner.scan(&["app".into(), "app".into()]).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn unresolved_entry_aborts_scan() {
        let scanner = Scanner::new(
            vec![archive(&["app/AutoSaver.component", "app/Ghost.component"])],
            catalog(&["app.AutoSaver"]),
        );
        let err = scanner.scan(&["app".into()]).unwrap_err();
        assert!(matches!(err, DiscoveryError::Unresolved { ref name, .. } if name == "app.Ghost"));
    }
}
