use std::{collections::BTreeSet, sync::Arc};

use keyline::{Key, MergeStrategy, Registry, RegistryOptions, RowTable};
use proptest::prelude::*;

// ============================================================================
// Property Test Strategy
// ============================================================================
// 1. Merge/Dedup: merged keys are the sorted, duplicate-free union
// 2. Strategy Agreement: pairwise and heap merges produce the same keys
// 3. Round Trip: get_index(get_key(i)) == i for every stored index
// 4. Monotonic Mapping: get_index is increasing in the key
// 5. Iterator Termination: exactly last - first + 1 steps, then false
// 6. Selection Shape: padding indices sit directly outside the selection

// ============================================================================
// Helper Functions
// ============================================================================

/// Integral keys keep interpolation results exact after rounding.
fn arbitrary_source() -> impl Strategy<Value = Vec<Key>> {
    prop::collection::btree_set(-1000i32..1000, 0..=40)
        .prop_map(|set| set.into_iter().map(f64::from).collect())
}

fn arbitrary_sources() -> impl Strategy<Value = Vec<Vec<Key>>> {
    prop::collection::vec(arbitrary_source(), 0..=6)
}

fn build(sources: &[Vec<Key>], strategy: MergeStrategy) -> Registry {
    let options = RegistryOptions {
        merge_strategy: strategy,
        verify_sources: true,
        ..Default::default()
    };
    let mut registry = Registry::with_options(options);
    for keys in sources {
        registry.add_source(Arc::new(RowTable::from_keys(keys.clone()).unwrap()));
    }
    registry.set_dirty();
    registry.update().unwrap();
    registry
}

fn expected_union(sources: &[Vec<Key>]) -> Vec<Key> {
    let set: BTreeSet<i64> = sources
        .iter()
        .flatten()
        .map(|&k| k as i64)
        .collect();
    set.into_iter().map(|k| k as f64).collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_merge_is_sorted_union(sources in arbitrary_sources()) {
        let registry = build(&sources, MergeStrategy::Pairwise);
        let expected = expected_union(&sources);
        prop_assert_eq!(registry.keys(), expected.as_slice());

        let aligned = sources.iter().all(|s| s.len() == expected.len());
        prop_assert_eq!(registry.is_in_sync_mode(), aligned);
    }

    #[test]
    fn prop_strategies_agree(sources in arbitrary_sources()) {
        let pairwise = build(&sources, MergeStrategy::Pairwise);
        let heap = build(&sources, MergeStrategy::Heap);
        prop_assert_eq!(pairwise.keys(), heap.keys());
        prop_assert_eq!(pairwise.is_in_sync_mode(), heap.is_in_sync_mode());
    }

    #[test]
    fn prop_round_trip(sources in arbitrary_sources()) {
        let registry = build(&sources, MergeStrategy::Heap);
        for i in 0..registry.len() {
            let key = registry.get_key(i as f64);
            prop_assert!(key.is_some());
            prop_assert_eq!(registry.get_index(key.unwrap()), Some(i as f64));
        }
    }

    #[test]
    fn prop_index_is_monotonic(
        sources in arbitrary_sources(),
        a in -1500.0f64..1500.0,
        b in -1500.0f64..1500.0,
    ) {
        let registry = build(&sources, MergeStrategy::Pairwise);
        prop_assume!(registry.len() >= 2);

        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo_index = registry.get_index(lo).unwrap();
        let hi_index = registry.get_index(hi).unwrap();
        prop_assert!(lo_index <= hi_index + 1e-9);
    }

    #[test]
    fn prop_iterator_terminates(
        sources in arbitrary_sources(),
        first in 0usize..50,
        span in 0usize..50,
    ) {
        let registry = build(&sources, MergeStrategy::Pairwise);
        prop_assume!(first < registry.len());
        let last = (first + span).min(registry.len() - 1);

        let mut iter = registry.get_iterator_fast(first, last);
        let mut steps = 0;
        while iter.advance() {
            prop_assert_eq!(iter.current_index(), Some(first + steps));
            steps += 1;
        }
        prop_assert_eq!(steps, last - first + 1);
        prop_assert!(!iter.advance());
    }

    #[test]
    fn prop_selection_shape(
        sources in arbitrary_sources(),
        a in -1500.0f64..1500.0,
        b in -1500.0f64..1500.0,
    ) {
        let registry = build(&sources, MergeStrategy::Pairwise);
        let len = registry.len();
        let sel = registry.get_selection(a.min(b), a.max(b));

        if len == 0 {
            prop_assert!(sel.first_index.is_none() && sel.pre_first_index.is_none());
            prop_assert!(sel.last_index.is_none() && sel.post_last_index.is_none());
        }
        if let Some(first) = sel.first_index {
            prop_assert!(first < len);
            prop_assert_eq!(sel.pre_first_index, first.checked_sub(1));
        }
        if let Some(last) = sel.last_index {
            prop_assert!(last < len);
            prop_assert_eq!(sel.post_last_index, (last + 1 < len).then_some(last + 1));
        }
        for padding in [sel.pre_first_index, sel.post_last_index].into_iter().flatten() {
            prop_assert!(padding < len);
        }
    }
}
