//! Property-based tests for dataset paths.

use super::DatasetPath;
use proptest::prelude::*;

fn component_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_.:-]{1,16}"
}

fn dataset_path_strategy() -> impl Strategy<Value = DatasetPath> {
    prop::collection::vec(component_strategy(), 0..8).prop_map(DatasetPath::from_components)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 5000,
        .. ProptestConfig::default()
    })]

    // Formatting and parsing agree
    #[test]
    fn display_parse_agree(path in dataset_path_strategy()) {
        let parsed: DatasetPath = path.to_string().parse().unwrap();
        prop_assert_eq!(parsed, path);
    }

    // A joined path always has both of its parts as prefix/suffix
    #[test]
    fn join_has_prefix(a in dataset_path_strategy(), b in dataset_path_strategy()) {
        let joined = a.join(&b);
        prop_assert!(joined.has_prefix(&a));
        prop_assert_eq!(joined.len(), a.len() + b.len());
        prop_assert!(joined.components().ends_with(b.components()));
    }

    // Prefix is reflexive and antisymmetric
    #[test]
    fn prefix_reflexive_antisymmetric(a in dataset_path_strategy(), b in dataset_path_strategy()) {
        prop_assert!(a.has_prefix(&a));
        if a.has_prefix(&b) && b.has_prefix(&a) {
            prop_assert_eq!(a, b);
        }
    }
}
