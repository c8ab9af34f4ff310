//! Ordered composition of mappings.

use crate::dataset::DatasetPath;
use crate::error::Result;

use super::{DatasetMapping, Mapping};

/// Tries its mappings in order and returns the first match.
///
/// An operational error from a sub-mapping aborts the lookup; it is not
/// treated as a miss.
///
/// # Examples
///
/// ```
/// use zrepl::mapping::{ComboMapping, DatasetMapping, DirectMapping, GlobMapping, Mapping};
///
/// let combo = ComboMapping::new(vec![
///     Mapping::Direct(DirectMapping::new("pool/a".parse().unwrap(), "special".parse().unwrap())),
///     Mapping::Glob(GlobMapping::new("pool".parse().unwrap(), "backup".parse().unwrap())),
/// ]);
///
/// let a = combo.map(&"pool/a".parse().unwrap()).unwrap().unwrap();
/// assert_eq!(a.to_string(), "special");
/// let b = combo.map(&"pool/b".parse().unwrap()).unwrap().unwrap();
/// assert_eq!(b.to_string(), "backup/pool/b");
/// ```
#[derive(Debug, Default)]
pub struct ComboMapping {
    mappings: Vec<Mapping>,
}

impl ComboMapping {
    /// Compose `mappings`; earlier entries take precedence.
    #[must_use]
    pub fn new(mappings: Vec<Mapping>) -> Self {
        Self { mappings }
    }

    /// The composed mappings in lookup order.
    #[must_use]
    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }
}

impl DatasetMapping for ComboMapping {
    fn map(&self, source: &DatasetPath) -> Result<Option<DatasetPath>> {
        for mapping in &self.mappings {
            if let Some(target) = mapping.map(source)? {
                return Ok(Some(target));
            }
        }
        Ok(None)
    }
}
