//! Dataset names and filesystem versions.
//!
//! A [`DatasetPath`] names a filesystem or volume component by component.
//! A [`FilesystemVersion`] is one snapshot or bookmark of such a filesystem,
//! as reported by the enumeration layer.

mod path;
mod version;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use path::{DatasetPath, SEPARATOR};
pub use version::{FilesystemVersion, Guid, VersionType};
