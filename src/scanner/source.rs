//! # Storage abstraction for component discovery.
//!
//! A [`ComponentSource`] is one read-only hierarchical store (a directory tree or an archive).
//! It only answers "which component entries live directly under this namespace?". Resolving a
//! name into a definition is the [`ComponentCatalog`](crate::ComponentCatalog)'s job.
//!
//! Component entries are files named `<Name>.component`.

use std::fmt;

use crate::error::DiscoveryError;
use crate::scanner::Namespace;

/// File extension that marks a component entry.
pub const COMPONENT_EXT: &str = "component";

/// Read-only hierarchical store of component entries.
pub trait ComponentSource: Send + Sync + 'static {
    /// Human-readable location (`dir:/path`, `archive:/path/app.toml`).
    fn location(&self) -> &str;

    /// Lists the entry names (file stems) directly under `namespace`.
    ///
    /// A namespace that does not exist, or is not a container, yields an empty list.
    fn list(&self, namespace: &Namespace) -> Result<Vec<String>, DiscoveryError>;
}

/// Returns the component name of an entry file, if it is one.
pub(crate) fn component_stem(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(COMPONENT_EXT)
        .and_then(|s| s.strip_suffix('.'))
        .filter(|s| !s.is_empty())
}

/// Reference to a loadable component: qualified name plus where it was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentHandle {
    name: String,
    location: String,
}

impl ComponentHandle {
    /// Creates a handle.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    /// Returns the fully-qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the location the entry was found at.
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl fmt::Display for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_only_for_component_files() {
        assert_eq!(component_stem("AutoSaver.component"), Some("AutoSaver"));
        assert_eq!(component_stem(".component"), None);
        assert_eq!(component_stem("AutoSaver.toml"), None);
        assert_eq!(component_stem("Xcomponent"), None);
    }
}
