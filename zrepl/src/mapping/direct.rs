//! Mapping of one fixed source (or any source) to one fixed target.

use crate::dataset::DatasetPath;
use crate::error::Result;

use super::DatasetMapping;

/// Which sources a [`DirectMapping`] accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectSource {
    /// Every source path matches.
    Any,
    /// Only this exact path matches.
    Path(DatasetPath),
}

/// Maps a single source path to a fixed target.
///
/// # Examples
///
/// ```
/// use zrepl::mapping::{DatasetMapping, DirectMapping};
/// use zrepl::DatasetPath;
///
/// let target: DatasetPath = "backup/a".parse().unwrap();
/// let mapping = DirectMapping::new("pool/a".parse().unwrap(), target.clone());
///
/// assert_eq!(mapping.map(&"pool/a".parse().unwrap()).unwrap(), Some(target));
/// assert_eq!(mapping.map(&"pool/b".parse().unwrap()).unwrap(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMapping {
    source: DirectSource,
    target: DatasetPath,
}

impl DirectMapping {
    /// Map exactly `source` to `target`.
    #[must_use]
    pub fn new(source: DatasetPath, target: DatasetPath) -> Self {
        Self {
            source: DirectSource::Path(source),
            target,
        }
    }

    /// Map every source to `target`.
    #[must_use]
    pub fn any(target: DatasetPath) -> Self {
        Self {
            source: DirectSource::Any,
            target,
        }
    }

    /// The accepted source.
    #[must_use]
    pub fn source(&self) -> &DirectSource {
        &self.source
    }

    /// The fixed target.
    #[must_use]
    pub fn target(&self) -> &DatasetPath {
        &self.target
    }
}

impl DatasetMapping for DirectMapping {
    fn map(&self, source: &DatasetPath) -> Result<Option<DatasetPath>> {
        let matches = match &self.source {
            DirectSource::Any => true,
            DirectSource::Path(expected) => expected == source,
        };
        Ok(matches.then(|| self.target.clone()))
    }
}
