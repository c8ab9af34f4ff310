//! Enumeration of datasets and versions on the local host.
//!
//! The planning core never talks to ZFS itself. It consumes what a
//! [`DatasetLister`] reports: the datasets that exist, and per filesystem
//! its snapshots and bookmarks in creation order. [`ZfsCli`] implements the
//! lister on top of the `zfs` command line tool; [`StaticLister`] serves
//! fixed data for tests and dry runs.

mod cli;
mod existence;
mod lister;

pub use cli::ZfsCli;
pub use existence::{build_existence_check, FilesystemExistence};
pub use lister::{list_mapped, DatasetLister, StaticLister};

#[cfg(test)]
pub(crate) use lister::MockDatasetLister;
