//! Prefix mapping that re-roots matching datasets.

use crate::dataset::DatasetPath;
use crate::error::Result;

use super::DatasetMapping;

/// Re-roots every dataset below a prefix under a new root.
///
/// A source matches if it is at least as long as the prefix and each prefix
/// component equals the source component at the same depth. A trailing
/// empty prefix component is a wildcard for any component at that depth, so
/// the prefix `pool/` (components `["pool", ""]`) matches strict descendants
/// of `pool` only.
///
/// The whole source, prefix included, is appended to the target root.
///
/// # Examples
///
/// ```
/// use zrepl::mapping::{DatasetMapping, GlobMapping};
///
/// let mapping = GlobMapping::new("p/a".parse().unwrap(), "q".parse().unwrap());
///
/// let target = mapping.map(&"p/a/b".parse().unwrap()).unwrap().unwrap();
/// assert_eq!(target.to_string(), "q/p/a/b");
/// assert!(mapping.map(&"p/x".parse().unwrap()).unwrap().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobMapping {
    prefix: DatasetPath,
    target_root: DatasetPath,
}

impl GlobMapping {
    /// Create a mapping from a prefix and a target root.
    #[must_use]
    pub fn new(prefix: DatasetPath, target_root: DatasetPath) -> Self {
        Self {
            prefix,
            target_root,
        }
    }

    /// Parse a textual prefix; a trailing `/` becomes the wildcard component.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is not a valid dataset name.
    ///
    /// # Examples
    ///
    /// ```
    /// use zrepl::mapping::GlobMapping;
    ///
    /// let prefix = GlobMapping::parse_prefix("pool/").unwrap();
    /// assert_eq!(prefix.components(), ["pool", ""]);
    /// ```
    pub fn parse_prefix(prefix: &str) -> Result<DatasetPath> {
        let path = DatasetPath::parse(prefix)?;
        if prefix.ends_with(crate::dataset::SEPARATOR) {
            let components = path.components().iter().map(String::as_str).chain([""]);
            return Ok(DatasetPath::from_components(components));
        }
        Ok(path)
    }

    /// The prefix a source must have.
    #[must_use]
    pub fn prefix(&self) -> &DatasetPath {
        &self.prefix
    }

    /// The root the source is appended to.
    #[must_use]
    pub fn target_root(&self) -> &DatasetPath {
        &self.target_root
    }

    fn matches(&self, source: &DatasetPath) -> bool {
        let prefix = self.prefix.components();
        if source.len() < prefix.len() {
            return false;
        }

        let last = prefix.len().saturating_sub(1);
        prefix
            .iter()
            .zip(source.components())
            .enumerate()
            .all(|(i, (expected, actual))| {
                expected == actual || (i == last && expected.is_empty())
            })
    }
}

impl DatasetMapping for GlobMapping {
    fn map(&self, source: &DatasetPath) -> Result<Option<DatasetPath>> {
        Ok(self
            .matches(source)
            .then(|| self.target_root.join(source)))
    }
}
