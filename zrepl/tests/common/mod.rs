//! Common test utilities for integration tests.
//!
//! This module provides fixture builders for version histories and helpers
//! for fake external programs.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use zrepl::{DatasetPath, FilesystemVersion, VersionType};

/// Parses a dataset path, panicking on invalid input.
#[allow(dead_code)]
pub fn path(s: &str) -> DatasetPath {
    s.parse().expect("valid dataset path")
}

/// A snapshot whose identifier is its name.
#[allow(dead_code)]
pub fn snap(name: &str, txg: u64) -> FilesystemVersion {
    FilesystemVersion::new(name, name, txg, VersionType::Snapshot)
}

/// A bookmark whose identifier is its name.
#[allow(dead_code)]
pub fn book(name: &str, txg: u64) -> FilesystemVersion {
    FilesystemVersion::new(name, name, txg, VersionType::Bookmark)
}

/// Builder for version histories with ascending txgs.
///
/// # Examples
///
/// ```no_run
/// # use common::HistoryBuilder;
/// let history = HistoryBuilder::new().snapshots(["a", "b"]).bookmark("b").build();
/// ```
#[allow(dead_code)]
#[derive(Default)]
pub struct HistoryBuilder {
    versions: Vec<FilesystemVersion>,
    next_txg: u64,
}

#[allow(dead_code)]
impl HistoryBuilder {
    /// Creates an empty history starting at txg 1.
    pub fn new() -> Self {
        Self {
            versions: Vec::new(),
            next_txg: 1,
        }
    }

    /// Appends snapshots, one txg apart.
    pub fn snapshots<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        for name in names {
            self.versions.push(snap(name, self.next_txg));
            self.next_txg += 1;
        }
        self
    }

    /// Appends a bookmark of an earlier snapshot, sharing its identifier and txg.
    pub fn bookmark(mut self, of: &str) -> Self {
        let txg = self
            .versions
            .iter()
            .find(|v| v.name == of)
            .map_or(self.next_txg, |v| v.create_txg);
        let position = self
            .versions
            .iter()
            .rposition(|v| v.create_txg <= txg)
            .map_or(0, |i| i + 1);
        self.versions.insert(position, book(of, txg));
        self
    }

    /// Returns the built history.
    pub fn build(self) -> Vec<FilesystemVersion> {
        self.versions
    }
}

/// Relative names (`@snap`, `#book`) of `versions`.
#[allow(dead_code)]
pub fn names(versions: &[FilesystemVersion]) -> Vec<String> {
    versions.iter().map(FilesystemVersion::relative_name).collect()
}

/// Writes an executable shell script into a fresh temporary directory.
///
/// The directory is removed when the returned `TempDir` is dropped.
#[allow(dead_code)]
#[cfg(unix)]
pub fn script(name: &str, body: &str) -> (TempDir, PathBuf) {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
    (dir, path)
}
