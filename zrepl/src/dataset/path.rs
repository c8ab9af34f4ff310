//! Component-wise dataset names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Separator used by ZFS between the components of a dataset name.
pub const SEPARATOR: char = '/';

/// The name of a ZFS filesystem or volume, as a sequence of components.
///
/// Paths are compared and sliced component by component, never by string
/// prefix: `pool/a` is not a prefix of `pool/ab`.
///
/// A `DatasetPath` is immutable once constructed. The empty path (no
/// components) is valid and is what an unset target root looks like.
///
/// # Examples
///
/// ```
/// use zrepl::DatasetPath;
///
/// let path: DatasetPath = "pool/data/home".parse().unwrap();
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.to_string(), "pool/data/home");
///
/// let prefix: DatasetPath = "pool/data".parse().unwrap();
/// assert!(path.has_prefix(&prefix));
/// assert!(!"pool/database".parse::<DatasetPath>().unwrap().has_prefix(&prefix));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetPath {
    components: Vec<String>,
}

impl DatasetPath {
    /// Parse a separator-delimited dataset name.
    ///
    /// Leading and trailing separators are ignored. An empty string yields
    /// the empty path.
    ///
    /// # Errors
    ///
    /// Returns an error if the name contains an empty component (`a//b`),
    /// or a snapshot (`@`) or bookmark (`#`) delimiter.
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim_matches(SEPARATOR);
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        if let Some(delim) = trimmed.chars().find(|c| matches!(c, '@' | '#')) {
            return Err(Error::InvalidDatasetPath {
                input: name.to_string(),
                reason: format!("'{delim}' denotes a filesystem version, not a dataset"),
            });
        }

        let components: Vec<String> = trimmed.split(SEPARATOR).map(str::to_string).collect();
        if components.iter().any(String::is_empty) {
            return Err(Error::InvalidDatasetPath {
                input: name.to_string(),
                reason: "empty path component".to_string(),
            });
        }

        Ok(Self { components })
    }

    /// Parse a dataset name that must name an actual dataset.
    ///
    /// Like [`parse`](Self::parse), but the empty path is rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is invalid or has no components, e.g.
    /// `""` or `"/"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use zrepl::DatasetPath;
    ///
    /// assert!(DatasetPath::parse_non_empty("pool/a").is_ok());
    /// assert!(DatasetPath::parse_non_empty("/").is_err());
    /// ```
    pub fn parse_non_empty(name: &str) -> Result<Self> {
        let path = Self::parse(name)?;
        if path.is_empty() {
            return Err(Error::InvalidDatasetPath {
                input: name.to_string(),
                reason: "dataset name has no components".to_string(),
            });
        }
        Ok(path)
    }

    /// Build a path from an explicit component list.
    ///
    /// Components are taken verbatim; an empty component is allowed here
    /// because glob prefixes use a trailing empty component as a wildcard.
    ///
    /// # Examples
    ///
    /// ```
    /// use zrepl::DatasetPath;
    ///
    /// let path = DatasetPath::from_components(["pool", "a"]);
    /// assert_eq!(path.to_string(), "pool/a");
    /// ```
    #[must_use]
    pub fn from_components<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            components: components.into_iter().map(Into::into).collect(),
        }
    }

    /// The components of this path, root first.
    #[must_use]
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the path has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Whether every component of `prefix` equals the corresponding
    /// component of this path.
    ///
    /// Every path has the empty path as prefix, and every path is a prefix
    /// of itself.
    #[must_use]
    pub fn has_prefix(&self, prefix: &DatasetPath) -> bool {
        self.components.len() >= prefix.components.len()
            && self
                .components
                .iter()
                .zip(&prefix.components)
                .all(|(own, other)| own == other)
    }

    /// A new path made of `self` followed by all components of `suffix`.
    ///
    /// # Examples
    ///
    /// ```
    /// use zrepl::DatasetPath;
    ///
    /// let root: DatasetPath = "backup".parse().unwrap();
    /// let source: DatasetPath = "pool/a".parse().unwrap();
    /// assert_eq!(root.join(&source).to_string(), "backup/pool/a");
    /// ```
    #[must_use]
    pub fn join(&self, suffix: &DatasetPath) -> Self {
        let mut components = Vec::with_capacity(self.len() + suffix.len());
        components.extend_from_slice(&self.components);
        components.extend_from_slice(&suffix.components);
        Self { components }
    }
}

impl fmt::Display for DatasetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(component)?;
        }
        Ok(())
    }
}

impl FromStr for DatasetPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for DatasetPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DatasetPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::parse(&name).map_err(serde::de::Error::custom)
    }
}
