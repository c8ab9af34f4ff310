//! Point-in-time versions of a filesystem: snapshots and bookmarks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Whether a version is a snapshot or a bookmark.
///
/// Snapshots order before bookmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionType {
    /// A snapshot carries the full data of the filesystem at its creation.
    Snapshot,
    /// A bookmark only marks a point in history; it can serve as the origin
    /// of an incremental send but carries no data itself.
    Bookmark,
}

impl VersionType {
    /// The character ZFS places between dataset and version name.
    #[must_use]
    pub const fn delimiter(self) -> char {
        match self {
            Self::Snapshot => '@',
            Self::Bookmark => '#',
        }
    }
}

impl fmt::Display for VersionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Snapshot => write!(f, "snapshot"),
            Self::Bookmark => write!(f, "bookmark"),
        }
    }
}

/// Opaque identity of a version.
///
/// Two versions are considered the same point in history iff their
/// identifiers are equal. The enumeration layer decides what goes in here;
/// it must be unique within a filesystem's creation order. A bookmark and
/// the snapshot it was created from share their identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guid(String);

impl Guid {
    /// Wrap an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for Guid {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Guid {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for Guid {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single snapshot or bookmark of a filesystem.
///
/// # Examples
///
/// ```
/// use zrepl::{FilesystemVersion, VersionType};
///
/// let snap = FilesystemVersion::new("zrepl_1", 1001u64, 12, VersionType::Snapshot);
/// assert_eq!(snap.relative_name(), "@zrepl_1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilesystemVersion {
    /// Name of the version without the dataset part and delimiter.
    pub name: String,
    /// Identity used to match versions across sender and receiver.
    pub guid: Guid,
    /// Transaction group in which the version was created.
    pub create_txg: u64,
    /// Snapshot or bookmark.
    #[serde(rename = "type")]
    pub version_type: VersionType,
}

impl FilesystemVersion {
    /// Create a version.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        guid: impl Into<Guid>,
        create_txg: u64,
        version_type: VersionType,
    ) -> Self {
        Self {
            name: name.into(),
            guid: guid.into(),
            create_txg,
            version_type,
        }
    }

    /// Parse a full ZFS version name such as `pool/fs@snap` or `pool/fs#book`.
    ///
    /// Returns the dataset part and the version with the given identity
    /// and creation counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the name contains neither `@` nor `#`, or if
    /// either side of the delimiter is empty.
    pub fn parse_full_name(
        full_name: &str,
        guid: impl Into<Guid>,
        create_txg: u64,
    ) -> Result<(String, Self)> {
        let (idx, version_type) = full_name
            .char_indices()
            .find_map(|(i, c)| match c {
                '@' => Some((i, VersionType::Snapshot)),
                '#' => Some((i, VersionType::Bookmark)),
                _ => None,
            })
            .ok_or_else(|| Error::UnparsableZfsOutput {
                line: full_name.to_string(),
                reason: "version name has no '@' or '#' delimiter".to_string(),
            })?;

        let (dataset, name) = (&full_name[..idx], &full_name[idx + 1..]);
        if dataset.is_empty() || name.is_empty() {
            return Err(Error::UnparsableZfsOutput {
                line: full_name.to_string(),
                reason: "empty dataset or version name".to_string(),
            });
        }

        Ok((
            dataset.to_string(),
            Self::new(name, guid, create_txg, version_type),
        ))
    }

    /// The name including its type delimiter, e.g. `@snap` or `#book`.
    #[must_use]
    pub fn relative_name(&self) -> String {
        format!("{}{}", self.version_type.delimiter(), self.name)
    }

    /// Whether this version is a snapshot.
    #[must_use]
    pub fn is_snapshot(&self) -> bool {
        self.version_type == VersionType::Snapshot
    }
}

impl fmt::Display for FilesystemVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (txg {})", self.relative_name(), self.create_txg)
    }
}
