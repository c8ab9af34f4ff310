//! The enumeration seam and its in-memory implementation.

use std::collections::HashMap;

use crate::dataset::{DatasetPath, FilesystemVersion};
use crate::error::Result;
use crate::mapping::DatasetMapping;

/// Source of dataset and version listings.
///
/// This trait abstracts enumeration so that planning can be exercised
/// without a ZFS pool.
#[cfg_attr(test, mockall::automock)]
pub trait DatasetLister: Send + Sync {
    /// All filesystems and volumes on the host.
    ///
    /// # Errors
    ///
    /// Returns an error if enumeration fails.
    fn list_datasets(&self) -> Result<Vec<DatasetPath>>;

    /// Snapshots and bookmarks of `filesystem`, ascending by `create_txg`.
    ///
    /// # Errors
    ///
    /// Returns an error if enumeration fails.
    fn list_versions(&self, filesystem: &DatasetPath) -> Result<Vec<FilesystemVersion>>;
}

/// Lists every dataset and keeps those `mapping` accepts.
///
/// The returned paths are the sources, in enumeration order. Any mapping
/// error aborts the whole listing.
///
/// # Errors
///
/// Returns an error if enumeration fails or if the mapping fails for any
/// dataset.
///
/// # Examples
///
/// ```
/// use zrepl::mapping::GlobMapping;
/// use zrepl::zfs::{list_mapped, StaticLister};
///
/// let lister = StaticLister::new()
///     .with_dataset("pool".parse().unwrap())
///     .with_dataset("pool/home".parse().unwrap())
///     .with_dataset("tank/tmp".parse().unwrap());
/// let mapping = GlobMapping::new("pool".parse().unwrap(), "backup".parse().unwrap());
///
/// let mapped = list_mapped(&lister, &mapping).unwrap();
/// assert_eq!(mapped.len(), 2);
/// ```
pub fn list_mapped<L, M>(lister: &L, mapping: &M) -> Result<Vec<DatasetPath>>
where
    L: DatasetLister + ?Sized,
    M: DatasetMapping + ?Sized,
{
    let datasets = lister.list_datasets()?;
    let mut mapped = Vec::with_capacity(datasets.len());
    for dataset in datasets {
        if mapping.map(&dataset)?.is_some() {
            mapped.push(dataset);
        }
    }
    log::debug!("{} dataset(s) accepted by mapping", mapped.len());
    Ok(mapped)
}

/// A lister serving fixed data.
///
/// Filesystems without registered versions have an empty history.
///
/// # Examples
///
/// ```
/// use zrepl::zfs::{DatasetLister, StaticLister};
/// use zrepl::{FilesystemVersion, VersionType};
///
/// let fs = "pool/a".parse().unwrap();
/// let lister = StaticLister::new().with_versions(
///     &fs,
///     vec![FilesystemVersion::new("s1", 1u64, 10, VersionType::Snapshot)],
/// );
///
/// assert_eq!(lister.list_datasets().unwrap(), vec![fs.clone()]);
/// assert_eq!(lister.list_versions(&fs).unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticLister {
    datasets: Vec<DatasetPath>,
    versions: HashMap<DatasetPath, Vec<FilesystemVersion>>,
}

impl StaticLister {
    /// An empty lister.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dataset.
    #[must_use]
    pub fn with_dataset(mut self, dataset: DatasetPath) -> Self {
        if !self.datasets.contains(&dataset) {
            self.datasets.push(dataset);
        }
        self
    }

    /// Register a filesystem with its versions.
    ///
    /// Versions are stored sorted by `create_txg`.
    #[must_use]
    pub fn with_versions(
        mut self,
        filesystem: &DatasetPath,
        mut versions: Vec<FilesystemVersion>,
    ) -> Self {
        versions.sort_by_key(|v| v.create_txg);
        self.versions.insert(filesystem.clone(), versions);
        self.with_dataset(filesystem.clone())
    }
}

impl DatasetLister for StaticLister {
    fn list_datasets(&self) -> Result<Vec<DatasetPath>> {
        Ok(self.datasets.clone())
    }

    fn list_versions(&self, filesystem: &DatasetPath) -> Result<Vec<FilesystemVersion>> {
        Ok(self.versions.get(filesystem).cloned().unwrap_or_default())
    }
}
