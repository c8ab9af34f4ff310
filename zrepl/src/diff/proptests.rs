//! Property-based tests for history diffing.

use super::{Conflict, FilesystemDiff};
use crate::dataset::{FilesystemVersion, VersionType};
use proptest::prelude::*;

// The versions created at one txg: a lone snapshot or bookmark, or a
// snapshot together with its bookmark, listed in either order.
fn versions_at_txg_strategy() -> impl Strategy<Value = Vec<VersionType>> {
    use VersionType::{Bookmark, Snapshot};

    prop_oneof![
        6 => Just(vec![Snapshot]),
        2 => Just(vec![Bookmark]),
        1 => Just(vec![Snapshot, Bookmark]),
        1 => Just(vec![Bookmark, Snapshot]),
    ]
}

// A history of versions with non-decreasing txgs; identifiers derive
// from the txg so that equal txgs across histories mean the same version.
fn history_strategy(max_len: usize) -> impl Strategy<Value = Vec<FilesystemVersion>> {
    prop::collection::btree_set(1u64..200, 1..max_len).prop_flat_map(|txgs| {
        let txgs: Vec<u64> = txgs.into_iter().collect();
        let len = txgs.len();
        prop::collection::vec(versions_at_txg_strategy(), len).prop_map(move |slots| {
            txgs.iter()
                .zip(slots)
                .flat_map(|(txg, types)| {
                    types
                        .into_iter()
                        .map(move |t| FilesystemVersion::new(format!("v{txg}"), *txg, *txg, t))
                })
                .collect()
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // An empty receiver always needs a full send
    #[test]
    fn empty_left_is_all_right(right in history_strategy(20)) {
        let diff = FilesystemDiff::compute(&[], &right);
        prop_assert_eq!(diff.conflict(), Conflict::AllRight);
    }

    // Disjoint histories have no common ancestor and are reported unchanged
    #[test]
    fn disjoint_histories_have_no_common_ancestor(
        left in history_strategy(10),
        right in history_strategy(10),
    ) {
        let left: Vec<_> = left
            .into_iter()
            .map(|mut v| { v.guid = format!("left-{}", v.guid).into(); v })
            .collect();
        let diff = FilesystemDiff::compute(&left, &right);
        prop_assert_eq!(diff.conflict(), Conflict::NoCommonAncestor);
        let (l, r) = diff.mrca_paths().unwrap();
        prop_assert_eq!(l, left.as_slice());
        prop_assert_eq!(r, right.as_slice());
    }

    // Incremental paths start at the ancestor and contain only snapshots after it,
    // in ascending creation order
    #[test]
    fn incremental_path_shape(left in history_strategy(10), right in history_strategy(20)) {
        let diff = FilesystemDiff::compute(&left, &right);
        if let Some(path) = diff.incremental_path() {
            let tip = left.last().unwrap();
            prop_assert_eq!(&path[0].guid, &tip.guid);
            prop_assert!(path[1..].iter().all(|v| v.version_type == VersionType::Snapshot));
            prop_assert!(path.windows(2).all(|w| w[0].create_txg <= w[1].create_txg));
        }
    }

    // Diverged diagnostics are suffixes of the inputs starting at a shared version
    #[test]
    fn diverged_paths_are_suffixes(left in history_strategy(10), right in history_strategy(20)) {
        let diff = FilesystemDiff::compute(&left, &right);
        if diff.conflict() == Conflict::Diverged {
            let (l, r) = diff.mrca_paths().unwrap();
            prop_assert!(l.len() >= 2);
            prop_assert!(left.ends_with(l));
            prop_assert!(right.ends_with(r));
            prop_assert_eq!(&l[0].guid, &r[0].guid);
        }
    }

    // Classification is incremental exactly when left's tip appears in right
    #[test]
    fn incremental_iff_left_tip_shared(left in history_strategy(10), right in history_strategy(20)) {
        let diff = FilesystemDiff::compute(&left, &right);
        let tip = left.last().unwrap();
        let shared = right.iter().any(|v| v.guid == tip.guid);
        prop_assert_eq!(diff.conflict() == Conflict::Incremental, shared);
    }

    // The anchor is a snapshot whenever the sender still has one for it,
    // whichever order the snapshot and its bookmark are listed in
    #[test]
    fn anchor_prefers_snapshot(left in history_strategy(10), right in history_strategy(20)) {
        let diff = FilesystemDiff::compute(&left, &right);
        if let Some(path) = diff.incremental_path() {
            let anchor = &path[0];
            let has_snapshot = right
                .iter()
                .any(|v| v.guid == anchor.guid && v.version_type == VersionType::Snapshot);
            prop_assert_eq!(anchor.version_type == VersionType::Snapshot, has_snapshot);
        }
    }
}
