//! # Namespaces.
//!
//! A [`Namespace`] is a dot-separated logical grouping (`app.database`). Storage backends map
//! it onto a container path (`app/database`); the empty namespace is the storage root.

use std::fmt;

/// Logical grouping identifier under which components are discovered.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    /// Creates a namespace from its dotted form.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the dotted form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty (root) namespace.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the container path segments, or `None` if the namespace cannot name a container
    /// (empty segments, path separators).
    pub(crate) fn segments(&self) -> Option<Vec<&str>> {
        if self.is_root() {
            return Some(Vec::new());
        }
        let segs: Vec<&str> = self.0.split('.').collect();
        let valid = segs
            .iter()
            .all(|s| !s.is_empty() && !s.contains(['/', '\\', ':']));
        valid.then_some(segs)
    }

    /// Returns the `/`-joined container path (`""` for root), or `None` if malformed.
    pub(crate) fn container_path(&self) -> Option<String> {
        self.segments().map(|s| s.join("/"))
    }

    /// Returns the qualified name of entry `stem` inside this namespace.
    pub fn qualify(&self, stem: &str) -> String {
        if self.is_root() {
            stem.to_string()
        } else {
            format!("{}.{stem}", self.0)
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Namespace {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Namespace {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_names_map_to_paths() {
        assert_eq!(Namespace::from("app.database").container_path().as_deref(), Some("app/database"));
        assert_eq!(Namespace::from("").container_path().as_deref(), Some(""));
    }

    #[test]
    fn malformed_names_have_no_container() {
        for bad in ["a..b", ".a", "a.", "a/b", "..", "c:\\x"] {
            assert!(Namespace::from(bad).segments().is_none(), "{bad}");
        }
    }

    #[test]
    fn qualify_joins_with_dot() {
        assert_eq!(Namespace::from("app.http").qualify("ServiceRegistry"), "app.http.ServiceRegistry");
        assert_eq!(Namespace::from("").qualify("Main"), "Main");
    }
}
