//! Diffing of filesystem version histories.
//!
//! The receiver (left) wants to know whether the sender (right) has more
//! recent versions, and whether it can catch up by incremental sends:
//!
//! ```text
//! Left :         | C |
//! Right: | A | B | C | D | E |
//! =>   :         | C | D | E |          incremental
//!
//! Left :         | C |
//! Right:             | D | E |
//! =>   :  no common ancestor
//!
//! Left : | A | B | C |       | F |
//! Right:         | C | D | E |
//! =>   :  diverged at C
//! ```
//!
//! Versions are matched by [`Guid`](crate::Guid) only. Both histories must
//! be sorted ascending by creation transaction group.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::{FilesystemVersion, VersionType};

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

/// Relationship between the receiver's and the sender's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conflict {
    /// No conflict; the receiver can be updated incrementally.
    Incremental,
    /// No conflict; the receiver has no versions and needs a full send.
    AllRight,
    /// The histories share no version.
    NoCommonAncestor,
    /// The receiver has versions newer than the most recent common ancestor.
    Diverged,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incremental => write!(f, "incremental"),
            Self::AllRight => write!(f, "all-right"),
            Self::NoCommonAncestor => write!(f, "no-common-ancestor"),
            Self::Diverged => write!(f, "diverged"),
        }
    }
}

/// The outcome of comparing two version histories.
///
/// Each variant carries exactly the output that is meaningful for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "conflict", rename_all = "snake_case")]
pub enum FilesystemDiff {
    /// The sender's versions can be replayed on top of the receiver's newest.
    Incremental {
        /// Versions to replay, oldest first. The first element is the common
        /// ancestor; every later element is a snapshot. A path of length one
        /// means both sides are at the same most recent version.
        incremental_path: Vec<FilesystemVersion>,
    },
    /// The receiver has no versions.
    AllRight {
        /// The receiver's history as passed in (empty).
        mrca_path_left: Vec<FilesystemVersion>,
        /// The sender's history as passed in.
        mrca_path_right: Vec<FilesystemVersion>,
    },
    /// The histories share no version.
    NoCommonAncestor {
        /// The receiver's history as passed in.
        mrca_path_left: Vec<FilesystemVersion>,
        /// The sender's history as passed in.
        mrca_path_right: Vec<FilesystemVersion>,
    },
    /// The receiver moved on after the most recent common ancestor.
    Diverged {
        /// The receiver's history from the common ancestor to its tip.
        mrca_path_left: Vec<FilesystemVersion>,
        /// The sender's history from the common ancestor to its tip.
        mrca_path_right: Vec<FilesystemVersion>,
    },
}

impl FilesystemDiff {
    /// Compare the receiver's history `left` with the sender's history `right`.
    ///
    /// The most recent common ancestor is the newest version of `left` whose
    /// identifier appears anywhere in `right`, paired with the newest such
    /// version in `right`. If that version in `right` is a bookmark directly
    /// preceded by a snapshot with the same identifier, the snapshot is used
    /// instead.
    ///
    /// # Panics
    ///
    /// Panics if `right` is empty or if either history is not sorted
    /// ascending by `create_txg`. Both indicate a bug in the enumeration
    /// layer; the histories are never re-sorted here.
    ///
    /// # Examples
    ///
    /// ```
    /// use zrepl::{Conflict, FilesystemDiff, FilesystemVersion, VersionType};
    ///
    /// let v = |name: &str, txg: u64| {
    ///     FilesystemVersion::new(name, name, txg, VersionType::Snapshot)
    /// };
    ///
    /// let left = vec![v("c", 3)];
    /// let right = vec![v("a", 1), v("b", 2), v("c", 3), v("d", 4)];
    ///
    /// let diff = FilesystemDiff::compute(&left, &right);
    /// assert_eq!(diff.conflict(), Conflict::Incremental);
    /// let names: Vec<_> = diff.incremental_path().unwrap().iter().map(|v| v.name.as_str()).collect();
    /// assert_eq!(names, ["c", "d"]);
    /// ```
    #[must_use]
    pub fn compute(left: &[FilesystemVersion], right: &[FilesystemVersion]) -> Self {
        assert!(!right.is_empty(), "cannot make filesystem diff: right must not be empty");
        assert!(
            is_sorted_by_txg(left),
            "cannot make filesystem diff: unsorted left"
        );
        assert!(
            is_sorted_by_txg(right),
            "cannot make filesystem diff: unsorted right"
        );

        if left.is_empty() {
            return Self::AllRight {
                mrca_path_left: Vec::new(),
                mrca_path_right: right.to_vec(),
            };
        }

        let Some((mrca_left, mrca_right)) = most_recent_common_ancestor(left, right) else {
            log::debug!(
                "no common ancestor between {} receiver and {} sender versions",
                left.len(),
                right.len()
            );
            return Self::NoCommonAncestor {
                mrca_path_left: left.to_vec(),
                mrca_path_right: right.to_vec(),
            };
        };

        if mrca_left != left.len() - 1 {
            log::debug!(
                "receiver diverged after {}: {} newer version(s)",
                left[mrca_left],
                left.len() - 1 - mrca_left
            );
            return Self::Diverged {
                mrca_path_left: left[mrca_left..].to_vec(),
                mrca_path_right: right[mrca_right..].to_vec(),
            };
        }

        // The anchor may be a bookmark if its snapshot is gone; nothing after
        // it may be, since only snapshots can be sent.
        let mut incremental_path = Vec::with_capacity(right.len() - mrca_right);
        incremental_path.push(right[mrca_right].clone());
        incremental_path.extend(
            right[mrca_right + 1..]
                .iter()
                .filter(|v| v.version_type != VersionType::Bookmark)
                .cloned(),
        );

        Self::Incremental { incremental_path }
    }

    /// The classification of this diff.
    #[must_use]
    pub fn conflict(&self) -> Conflict {
        match self {
            Self::Incremental { .. } => Conflict::Incremental,
            Self::AllRight { .. } => Conflict::AllRight,
            Self::NoCommonAncestor { .. } => Conflict::NoCommonAncestor,
            Self::Diverged { .. } => Conflict::Diverged,
        }
    }

    /// The versions to replay, if the receiver can be updated incrementally.
    #[must_use]
    pub fn incremental_path(&self) -> Option<&[FilesystemVersion]> {
        match self {
            Self::Incremental { incremental_path } => Some(incremental_path),
            _ => None,
        }
    }

    /// The receiver's and sender's diagnostic paths, if no incremental
    /// update is possible.
    #[must_use]
    pub fn mrca_paths(&self) -> Option<(&[FilesystemVersion], &[FilesystemVersion])> {
        match self {
            Self::Incremental { .. } => None,
            Self::AllRight {
                mrca_path_left,
                mrca_path_right,
            }
            | Self::NoCommonAncestor {
                mrca_path_left,
                mrca_path_right,
            }
            | Self::Diverged {
                mrca_path_left,
                mrca_path_right,
            } => Some((mrca_path_left, mrca_path_right)),
        }
    }

    /// The individual incremental sends, as `(from, to)` pairs in order.
    ///
    /// Empty unless the diff is incremental and the sender has newer
    /// versions.
    pub fn steps(&self) -> impl Iterator<Item = (&FilesystemVersion, &FilesystemVersion)> {
        self.incremental_path()
            .unwrap_or_default()
            .windows(2)
            .map(|pair| (&pair[0], &pair[1]))
    }

    /// Whether both sides are already at the same most recent version.
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        self.incremental_path().is_some_and(|path| path.len() <= 1)
    }
}

fn is_sorted_by_txg(versions: &[FilesystemVersion]) -> bool {
    versions
        .windows(2)
        .all(|pair| pair[0].create_txg <= pair[1].create_txg)
}

/// Indices of the most recent common ancestor in `left` and `right`.
fn most_recent_common_ancestor(
    left: &[FilesystemVersion],
    right: &[FilesystemVersion],
) -> Option<(usize, usize)> {
    for (li, lv) in left.iter().enumerate().rev() {
        let Some(ri) = right.iter().rposition(|rv| rv.guid == lv.guid) else {
            continue;
        };

        // Prefer the snapshot over a bookmark of the same version.
        let preceding_snapshot = ri > 0
            && right[ri - 1].guid == right[ri].guid
            && right[ri - 1].version_type == VersionType::Snapshot;
        let ri = if preceding_snapshot { ri - 1 } else { ri };

        return Some((li, ri));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(name: &str, txg: u64) -> FilesystemVersion {
        FilesystemVersion::new(name, name, txg, VersionType::Snapshot)
    }

    fn book(name: &str, txg: u64) -> FilesystemVersion {
        FilesystemVersion::new(name, name, txg, VersionType::Bookmark)
    }

    fn names(versions: &[FilesystemVersion]) -> Vec<String> {
        versions.iter().map(FilesystemVersion::relative_name).collect()
    }

    #[test]
    fn test_empty_left_is_all_right() {
        let right = vec![snap("a", 1), snap("b", 2)];
        let diff = FilesystemDiff::compute(&[], &right);
        assert_eq!(diff.conflict(), Conflict::AllRight);
        assert!(diff.incremental_path().is_none());
        let (l, r) = diff.mrca_paths().unwrap();
        assert!(l.is_empty());
        assert_eq!(r, right.as_slice());
    }

    #[test]
    fn test_incremental() {
        let left = vec![snap("c", 3)];
        let right = vec![snap("a", 1), snap("b", 2), snap("c", 3), snap("d", 4), snap("e", 5)];
        let diff = FilesystemDiff::compute(&left, &right);
        assert_eq!(diff.conflict(), Conflict::Incremental);
        assert_eq!(names(diff.incremental_path().unwrap()), ["@c", "@d", "@e"]);
        assert!(diff.mrca_paths().is_none());
        assert!(!diff.is_up_to_date());
    }

    #[test]
    fn test_no_common_ancestor() {
        let left = vec![snap("c", 3)];
        let right = vec![snap("d", 4), snap("e", 5)];
        let diff = FilesystemDiff::compute(&left, &right);
        assert_eq!(diff.conflict(), Conflict::NoCommonAncestor);
        let (l, r) = diff.mrca_paths().unwrap();
        assert_eq!(l, left.as_slice());
        assert_eq!(r, right.as_slice());
    }

    #[test]
    fn test_left_newer_is_diverged() {
        let left = vec![snap("c", 3), snap("d", 4), snap("e", 5)];
        let right = vec![snap("a", 1), snap("b", 2), snap("c", 3)];
        let diff = FilesystemDiff::compute(&left, &right);
        assert_eq!(diff.conflict(), Conflict::Diverged);
        let (l, r) = diff.mrca_paths().unwrap();
        assert_eq!(names(l), ["@c", "@d", "@e"]);
        assert_eq!(names(r), ["@c"]);
    }

    #[test]
    fn test_diverged() {
        let left = vec![snap("a", 1), snap("b", 2), snap("c", 3), snap("f", 6)];
        let right = vec![snap("c", 3), snap("d", 4), snap("e", 5)];
        let diff = FilesystemDiff::compute(&left, &right);
        assert_eq!(diff.conflict(), Conflict::Diverged);
        let (l, r) = diff.mrca_paths().unwrap();
        assert_eq!(names(l), ["@c", "@f"]);
        assert_eq!(names(r), ["@c", "@d", "@e"]);
    }

    #[test]
    fn test_same_tip_is_up_to_date() {
        let left = vec![snap("a", 1), snap("b", 2)];
        let right = vec![snap("a", 1), snap("b", 2)];
        let diff = FilesystemDiff::compute(&left, &right);
        assert_eq!(diff.conflict(), Conflict::Incremental);
        assert_eq!(names(diff.incremental_path().unwrap()), ["@b"]);
        assert!(diff.is_up_to_date());
        assert_eq!(diff.steps().count(), 0);
    }

    #[test]
    fn test_prefers_snapshot_over_bookmark() {
        let left = vec![snap("b", 2)];
        let right = vec![snap("a", 1), snap("b", 2), book("b", 2), snap("c", 3)];
        let diff = FilesystemDiff::compute(&left, &right);
        let path = diff.incremental_path().unwrap();
        assert_eq!(path[0].version_type, VersionType::Snapshot);
        assert_eq!(names(path), ["@b", "@c"]);
    }

    #[test]
    fn test_prefers_snapshot_listed_after_its_bookmark() {
        let left = vec![snap("b", 2)];
        let right = vec![snap("a", 1), book("b", 2), snap("b", 2), snap("c", 3)];
        let diff = FilesystemDiff::compute(&left, &right);
        let path = diff.incremental_path().unwrap();
        assert_eq!(path[0].version_type, VersionType::Snapshot);
        assert_eq!(names(path), ["@b", "@c"]);
    }

    #[test]
    fn test_bookmark_anchor_without_snapshot() {
        let left = vec![snap("b", 2)];
        let right = vec![book("b", 2), snap("c", 3), snap("d", 4)];
        let diff = FilesystemDiff::compute(&left, &right);
        assert_eq!(names(diff.incremental_path().unwrap()), ["#b", "@c", "@d"]);
    }

    #[test]
    fn test_bookmarks_after_anchor_are_skipped() {
        let left = vec![snap("a", 1)];
        let right = vec![snap("a", 1), book("x", 2), snap("b", 3), book("b", 3)];
        let diff = FilesystemDiff::compute(&left, &right);
        assert_eq!(names(diff.incremental_path().unwrap()), ["@a", "@b"]);
    }

    #[test]
    fn test_mrca_is_newest_left_match() {
        // left's tip has no match, so the second-newest is the ancestor
        let left = vec![snap("a", 1), snap("b", 2), snap("z", 9)];
        let right = vec![snap("a", 1), snap("b", 2), snap("c", 3)];
        let diff = FilesystemDiff::compute(&left, &right);
        let (l, r) = diff.mrca_paths().unwrap();
        assert_eq!(names(l), ["@b", "@z"]);
        assert_eq!(names(r), ["@b", "@c"]);
    }

    #[test]
    fn test_steps() {
        let left = vec![snap("a", 1)];
        let right = vec![snap("a", 1), snap("b", 2), snap("c", 3)];
        let diff = FilesystemDiff::compute(&left, &right);
        let steps: Vec<_> = diff
            .steps()
            .map(|(from, to)| (from.name.as_str(), to.name.as_str()))
            .collect();
        assert_eq!(steps, [("a", "b"), ("b", "c")]);
    }

    #[test]
    fn test_steps_empty_when_not_incremental() {
        let diff = FilesystemDiff::compute(&[], &[snap("a", 1), snap("b", 2)]);
        assert_eq!(diff.steps().count(), 0);
        assert!(!diff.is_up_to_date());
    }

    #[test]
    #[should_panic(expected = "right must not be empty")]
    fn test_empty_right_panics() {
        let _ = FilesystemDiff::compute(&[snap("a", 1)], &[]);
    }

    #[test]
    #[should_panic(expected = "unsorted left")]
    fn test_unsorted_left_panics() {
        let _ = FilesystemDiff::compute(&[snap("b", 2), snap("a", 1)], &[snap("a", 1)]);
    }

    #[test]
    #[should_panic(expected = "unsorted right")]
    fn test_unsorted_right_panics() {
        let _ = FilesystemDiff::compute(&[], &[snap("b", 2), snap("a", 1)]);
    }

    #[test]
    fn test_serialized_tag() {
        let diff = FilesystemDiff::compute(&[snap("a", 1)], &[snap("a", 1), snap("b", 2)]);
        let json = serde_json::to_value(&diff).unwrap();
        assert_eq!(json["conflict"], "incremental");
        assert_eq!(json["incremental_path"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_conflict_display() {
        assert_eq!(Conflict::NoCommonAncestor.to_string(), "no-common-ancestor");
        assert_eq!(Conflict::Diverged.to_string(), "diverged");
    }
}
