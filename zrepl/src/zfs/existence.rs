//! One-shot cache of which datasets exist.

use std::collections::HashSet;

use crate::dataset::DatasetPath;
use crate::error::Result;

use super::DatasetLister;

/// The set of datasets that existed when it was built.
///
/// Built from a single enumeration; it never observes later changes.
/// Rebuild it to refresh.
///
/// # Examples
///
/// ```
/// use zrepl::zfs::FilesystemExistence;
///
/// let existing = FilesystemExistence::from_names(["pool/a", "pool/b"]);
/// assert!(existing.exists(&"pool/a".parse().unwrap()));
/// assert!(!existing.exists(&"pool/c".parse().unwrap()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilesystemExistence {
    names: HashSet<String>,
}

impl FilesystemExistence {
    /// Enumerate the datasets of `lister` once.
    ///
    /// # Errors
    ///
    /// Returns an error if enumeration fails.
    pub fn build<L: DatasetLister + ?Sized>(lister: &L) -> Result<Self> {
        let names: HashSet<String> = lister
            .list_datasets()?
            .iter()
            .map(ToString::to_string)
            .collect();
        log::debug!("cached existence of {} dataset(s)", names.len());
        Ok(Self { names })
    }

    /// Build from already enumerated names.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `path` existed at build time.
    #[must_use]
    pub fn exists(&self, path: &DatasetPath) -> bool {
        self.names.contains(&path.to_string())
    }

    /// Number of known datasets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no dataset was known at build time.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Turn the cache into a plain predicate.
    pub fn into_predicate(self) -> impl Fn(&DatasetPath) -> bool + Send + Sync {
        move |path: &DatasetPath| self.exists(path)
    }
}

/// Enumerate once and return an existence predicate.
///
/// # Errors
///
/// Returns an error if enumeration fails.
pub fn build_existence_check<L: DatasetLister + ?Sized>(
    lister: &L,
) -> Result<impl Fn(&DatasetPath) -> bool + Send + Sync> {
    FilesystemExistence::build(lister).map(FilesystemExistence::into_predicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zfs::MockDatasetLister;

    fn path(s: &str) -> DatasetPath {
        s.parse().unwrap()
    }

    #[test]
    fn test_predicate_from_names() {
        let exists = FilesystemExistence::from_names(["pool/a", "pool/b"]).into_predicate();
        assert!(exists(&path("pool/a")));
        assert!(exists(&path("pool/b")));
        assert!(!exists(&path("pool/c")));
        assert!(!exists(&path("pool")));
    }

    #[test]
    fn test_enumerates_exactly_once() {
        let mut lister = MockDatasetLister::new();
        lister
            .expect_list_datasets()
            .times(1)
            .returning(|| Ok(vec!["pool/a".parse().unwrap(), "pool/b".parse().unwrap()]));

        let exists = build_existence_check(&lister).unwrap();
        for _ in 0..10 {
            assert!(exists(&path("pool/a")));
            assert!(!exists(&path("pool/c")));
        }
    }

    #[test]
    fn test_len() {
        let existing = FilesystemExistence::from_names(["a", "b", "a"]);
        assert_eq!(existing.len(), 2);
        assert!(!existing.is_empty());
        assert!(FilesystemExistence::default().is_empty());
    }
}
