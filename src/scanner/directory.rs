//! # Directory-backed component source.
//!
//! Maps namespace `a.b` to `<root>/a/b` and lists the `*.component` regular files in it
//! (non-recursive). Entries are returned sorted by name so scans are reproducible.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::DiscoveryError;
use crate::scanner::source::component_stem;
use crate::scanner::{ComponentSource, Namespace};

/// Component source rooted at a directory.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
    location: String,
}

impl DirectorySource {
    /// Creates a source rooted at `root`. The directory is not touched until listed.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let location = format!("dir:{}", root.display());
        Self { root, location }
    }

    fn io_error(&self, namespace: &Namespace, source: io::Error) -> DiscoveryError {
        DiscoveryError::Io {
            namespace: namespace.to_string(),
            location: self.location.clone(),
            source,
        }
    }
}

impl ComponentSource for DirectorySource {
    fn location(&self) -> &str {
        &self.location
    }

    fn list(&self, namespace: &Namespace) -> Result<Vec<String>, DiscoveryError> {
        let Some(segments) = namespace.segments() else {
            return Ok(Vec::new());
        };
        let dir = segments.iter().fold(self.root.clone(), |p, s| p.join(s));

        match fs::metadata(&dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Ok(Vec::new()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(namespace, e)),
        }

        let mut names = Vec::new();
        let entries = fs::read_dir(&dir).map_err(|e| self.io_error(namespace, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| self.io_error(namespace, e))?;
            let file_type = entry.file_type().map_err(|e| self.io_error(namespace, e))?;
            if !file_type.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            if let Some(stem) = file_name.to_str().and_then(component_stem) {
                names.push(stem.to_string());
            }
        }
        names.sort_unstable();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn lists_component_files_directly_under_namespace() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "app/AutoSaver.component");
        touch(tmp.path(), "app/README.md");
        touch(tmp.path(), "app/config/ConfigLoader.component");
        fs::create_dir_all(tmp.path().join("app/Nested.component")).unwrap();

        let src = DirectorySource::new(tmp.path());
        assert_eq!(src.list(&"app".into()).unwrap(), vec!["AutoSaver"]);
        assert_eq!(src.list(&"app.config".into()).unwrap(), vec!["ConfigLoader"]);
    }

    #[test]
    fn missing_or_non_container_namespace_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "app/AutoSaver.component");

        let src = DirectorySource::new(tmp.path());
        assert!(src.list(&"nope".into()).unwrap().is_empty());
        assert!(src.list(&"app.AutoSaver.component".into()).unwrap().is_empty());
        assert!(src.list(&"app..x".into()).unwrap().is_empty());
    }

    #[test]
    fn root_namespace_lists_root_directory() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "Main.component");
        let src = DirectorySource::new(tmp.path());
        assert_eq!(src.list(&Namespace::from("")).unwrap(), vec!["Main"]);
    }
}
