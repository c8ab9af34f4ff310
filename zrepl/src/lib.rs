#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # zrepl
//!
//! Replication planning for snapshot-based ZFS filesystem replication.
//!
//! Two independent algorithms sit at the core of this library:
//!
//! - **History diffing**: given the receiver's and the sender's versions of
//!   a filesystem, decide whether the receiver can be updated incrementally
//!   and which versions to replay ([`FilesystemDiff`]).
//! - **Dataset mapping**: translate a source dataset name into the
//!   namespace a replication writes into ([`mapping`]).
//!
//! Around them, the [`zfs`] module enumerates datasets and versions, and
//! caches which datasets exist.
//!
//! ## Core Types
//!
//! - [`DatasetPath`]: component-wise dataset names
//! - [`FilesystemVersion`]: snapshots and bookmarks
//! - [`FilesystemDiff`] and [`Conflict`]: the replication plan
//! - [`Mapping`] and [`DatasetMapping`]: name translation
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use zrepl::{Conflict, FilesystemDiff, FilesystemVersion, VersionType};
//!
//! let snap = |name: &str, txg: u64| FilesystemVersion::new(name, name, txg, VersionType::Snapshot);
//!
//! let receiver = vec![snap("a", 1), snap("b", 2)];
//! let sender = vec![snap("a", 1), snap("b", 2), snap("c", 3)];
//!
//! let diff = FilesystemDiff::compute(&receiver, &sender);
//! assert_eq!(diff.conflict(), Conflict::Incremental);
//! assert_eq!(diff.steps().count(), 1);
//! ```

pub mod config;
pub mod dataset;
pub mod diff;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod zfs;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use dataset::{DatasetPath, FilesystemVersion, Guid, VersionType};
pub use diff::{Conflict, FilesystemDiff};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use mapping::{DatasetMapping, Mapping};
