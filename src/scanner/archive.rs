//! # Archive-backed component source.
//!
//! An archive is a single packed file listing every entry path it contains:
//!
//! ```toml
//! entries = [
//!     "app/AutoSaver.component",
//!     "app/config/ConfigLoader.component",
//!     "app/database/DatabaseConnection.component",
//! ]
//! ```
//!
//! Containers are implied by entry paths, so `app.config` exists as soon as one entry lives
//! under `app/config/`. Listing is non-recursive, in archive order.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::DiscoveryError;
use crate::scanner::source::component_stem;
use crate::scanner::{ComponentSource, Namespace};

#[derive(Debug, Deserialize)]
struct ArchiveManifest {
    #[serde(default)]
    entries: Vec<String>,
}

/// Component source backed by a single archive file.
#[derive(Clone, Debug)]
pub struct ArchiveSource {
    location: String,
    entries: Vec<String>,
}

impl ArchiveSource {
    /// Reads and parses an archive file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DiscoveryError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| DiscoveryError::ArchiveIo {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: ArchiveManifest =
            toml::from_str(&raw).map_err(|source| DiscoveryError::ArchiveFormat {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_entries(
            format!("archive:{}", path.display()),
            manifest.entries,
        ))
    }

    /// Builds an in-memory archive from entry paths.
    pub fn from_entries<I, S>(location: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|e| normalize(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            location: location.into(),
            entries,
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(entry: &str) -> String {
    let mut e = entry.trim().replace('\\', "/");
    while let Some(rest) = e.strip_prefix("./").or_else(|| e.strip_prefix('/')) {
        e = rest.to_string();
    }
    e
}

impl ComponentSource for ArchiveSource {
    fn location(&self) -> &str {
        &self.location
    }

    fn list(&self, namespace: &Namespace) -> Result<Vec<String>, DiscoveryError> {
        let Some(container) = namespace.container_path() else {
            return Ok(Vec::new());
        };

        let names = self
            .entries
            .iter()
            .filter_map(|entry| {
                let (dir, file) = entry.rsplit_once('/').unwrap_or(("", entry.as_str()));
                (dir == container).then_some(file)
            })
            .filter_map(component_stem)
            .map(str::to_string)
            .collect();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_entries_in_container_only() {
        let archive = ArchiveSource::from_entries(
            "archive:test",
            [
                "app/AutoSaver.component",
                "./app/config/ConfigLoader.component",
                "/app/http/ServiceRegistry.component",
                "app/notes.txt",
                "Main.component",
            ],
        );

        assert_eq!(archive.list(&"app".into()).unwrap(), vec!["AutoSaver"]);
        assert_eq!(archive.list(&"app.config".into()).unwrap(), vec!["ConfigLoader"]);
        assert_eq!(archive.list(&"app.http".into()).unwrap(), vec!["ServiceRegistry"]);
        assert_eq!(archive.list(&"".into()).unwrap(), vec!["Main"]);
        assert!(archive.list(&"app.database".into()).unwrap().is_empty());
    }

    #[test]
    fn open_parses_toml_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("app.toml");
        fs::write(&path, "entries = [\"app/AutoSaver.component\"]\n").unwrap();

        let archive = ArchiveSource::open(&path).unwrap();
        assert_eq!(archive.len(), 1);
        assert!(archive.location().starts_with("archive:"));
    }

    #[test]
    fn open_reports_missing_and_malformed_archives() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = ArchiveSource::open(tmp.path().join("nope.toml")).unwrap_err();
        assert_eq!(missing.as_label(), "discovery_archive_io");

        let path = tmp.path().join("bad.toml");
        fs::write(&path, "entries = 5").unwrap();
        let bad = ArchiveSource::open(&path).unwrap_err();
        assert_eq!(bad.as_label(), "discovery_archive_format");
    }
}
