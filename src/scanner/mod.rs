//! Component discovery over directory and archive storage.
//!
//! ## Contents
//! - [`Namespace`] dotted grouping mapped onto container paths
//! - [`ComponentSource`] storage abstraction ("list entries under a namespace")
//! - [`DirectorySource`], [`ArchiveSource`] the two storage backends
//! - [`ComponentHandle`] name + location of a discovered entry
//! - [`Scanner`] walks namespaces over an ordered classpath and loads definitions
//!
//! The caller never needs to know which backend an entry came from; both produce the same
//! handles and the catalog resolves them identically.

mod archive;
mod directory;
mod namespace;
mod scan;
mod source;

pub use archive::ArchiveSource;
pub use directory::DirectorySource;
pub use namespace::Namespace;
pub use scan::{DiscoveredComponent, Scanner};
pub use source::{COMPONENT_EXT, ComponentHandle, ComponentSource};
