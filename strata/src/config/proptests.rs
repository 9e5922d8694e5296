//! Property-based tests for fragment merging and serialization.

use super::loader::FragmentLoader;
use super::merger::ConfigMerger;
use super::schema::{CollapsedConfig, Collection, Fragment, MergePolicy};
use super::serializer::ConfigSerializer;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::path::Path;

// Strategy for layer-like item names
fn item_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.]{0,11}"
}

// Strategy for a batch of set-typed fragments all sharing one key
fn set_fragments_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(item_strategy(), 0..8), 1..6)
}

// Strategy for arbitrary collapsed configurations, including awkward strings
fn collapsed_strategy() -> impl Strategy<Value = CollapsedConfig> {
    prop::collection::btree_map(
        "[a-zA-Z_][a-zA-Z0-9_ :#-]{0,15}",
        prop::collection::vec("[ -~]{0,16}", 0..6),
        0..6,
    )
}

// Strategy for configurations mixing short keys with keys too long for the
// implicit `key:` form
fn long_key_strategy() -> impl Strategy<Value = CollapsedConfig> {
    prop::collection::btree_map(
        prop_oneof!["[a-z]{1,8}", "[a-z]{1000,1100}", "[a-z]{500}[ :#][a-z]{600}"],
        prop::collection::vec("[a-z0-9]{0,8}", 0..4),
        1..4,
    )
}

fn set_fragments(batches: &[Vec<String>]) -> Vec<Fragment> {
    batches
        .iter()
        .enumerate()
        .map(|(i, items)| {
            Fragment::new(format!("{i}.yaml")).with("beauty", Collection::set(items.clone()))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        .. ProptestConfig::default()
    })]

    // Set merges hold the same elements whatever the fragment order
    #[test]
    fn set_merge_is_order_independent(batches in set_fragments_strategy()) {
        let forward = ConfigMerger::merge(set_fragments(&batches), MergePolicy::PreserveOrder)
            .unwrap();
        let mut reversed_batches = batches.clone();
        reversed_batches.reverse();
        let reversed = ConfigMerger::merge(
            set_fragments(&reversed_batches),
            MergePolicy::PreserveOrder,
        )
        .unwrap();

        let forward: BTreeSet<_> = forward["beauty"].iter().collect();
        let reversed: BTreeSet<_> = reversed["beauty"].iter().collect();
        prop_assert_eq!(forward, reversed);
    }

    // Set merges never produce duplicates
    #[test]
    fn set_merge_has_no_duplicates(batches in set_fragments_strategy()) {
        let merged = ConfigMerger::merge(set_fragments(&batches), MergePolicy::PreserveOrder)
            .unwrap();
        let unique: BTreeSet<_> = merged["beauty"].iter().collect();
        prop_assert_eq!(unique.len(), merged["beauty"].len());
    }

    // Sorted merges are identical whatever the fragment order
    #[test]
    fn sorted_set_merge_is_deterministic(batches in set_fragments_strategy()) {
        let forward = ConfigMerger::merge(set_fragments(&batches), MergePolicy::Sorted).unwrap();
        let mut reversed_batches = batches.clone();
        reversed_batches.reverse();
        let reversed =
            ConfigMerger::merge(set_fragments(&reversed_batches), MergePolicy::Sorted).unwrap();
        prop_assert_eq!(forward, reversed);
    }

    // List merges are the concatenation of their inputs in fragment order
    #[test]
    fn list_merge_preserves_order(
        a in prop::collection::vec(item_strategy(), 1..8),
        b in prop::collection::vec(item_strategy(), 1..8)
    ) {
        let fragment = |name: &str, items: &Vec<String>| {
            Fragment::new(name).with("rgba", Collection::list(items.clone()))
        };

        let ab = ConfigMerger::merge(
            vec![fragment("a.yaml", &a), fragment("b.yaml", &b)],
            MergePolicy::PreserveOrder,
        )
        .unwrap();
        let ba = ConfigMerger::merge(
            vec![fragment("b.yaml", &b), fragment("a.yaml", &a)],
            MergePolicy::PreserveOrder,
        )
        .unwrap();

        let expected_ab: Vec<String> = a.iter().chain(b.iter()).cloned().collect();
        let expected_ba: Vec<String> = b.iter().chain(a.iter()).cloned().collect();
        prop_assert_eq!(&ab["rgba"], &expected_ab);
        prop_assert_eq!(&ba["rgba"], &expected_ba);
        if expected_ab != expected_ba {
            prop_assert_ne!(&ab["rgba"], &ba["rgba"]);
        }
    }

    // Serialized configurations reload to the same value
    #[test]
    fn serialize_round_trip(config in collapsed_strategy()) {
        let text = ConfigSerializer::to_string(&config).unwrap();
        let reloaded = FragmentLoader::load_str(Path::new("out.yaml"), &text)
            .unwrap()
            .map(Fragment::into_collapsed)
            .unwrap_or_default();
        prop_assert_eq!(reloaded, config);
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    // Keys past the implicit key limit still reload to the same value
    #[test]
    fn serialize_round_trip_long_keys(config in long_key_strategy()) {
        let text = ConfigSerializer::to_string(&config).unwrap();
        let reloaded = FragmentLoader::load_str(Path::new("out.yaml"), &text)
            .unwrap()
            .map(Fragment::into_collapsed)
            .unwrap_or_default();
        prop_assert_eq!(reloaded, config);
    }
}
