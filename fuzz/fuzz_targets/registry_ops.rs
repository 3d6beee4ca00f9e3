#![no_main]

use std::sync::Arc;

use keyline::{MergeStrategy, Registry, RegistryOptions, RowTable};
use libfuzzer_sys::fuzz_target;

// Fuzz target for the registry merge and mapping paths.
// Each input byte becomes a key for the current source, a source boundary,
// or a selection query. Invariants are checked after the rebuild.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 || data.len() > 4096 {
        return;
    }

    let strategy = if data[0] & 1 == 0 {
        MergeStrategy::Pairwise
    } else {
        MergeStrategy::Heap
    };
    let options = RegistryOptions {
        merge_strategy: strategy,
        verify_sources: true,
        ..Default::default()
    };
    let mut registry = Registry::with_options(options);

    let mut current = RowTable::new();
    let mut queries = Vec::new();
    for &byte in &data[1..] {
        match byte {
            0xF0..=0xFF => {
                registry.add_source(Arc::new(std::mem::take(&mut current)));
            },
            0xE0..=0xEF => queries.push(f64::from(byte & 0x0F) * 20.0 - 40.0),
            _ => {
                // duplicates are reported as Ok(false)
                current.insert(f64::from(byte)).unwrap();
            },
        }
    }
    registry.add_source(Arc::new(current));
    registry.set_dirty();
    registry.update().unwrap();

    let keys = registry.keys();
    assert!(
        keys.windows(2).all(|w| w[0] < w[1]),
        "merged keys not strictly ascending"
    );

    for i in 0..registry.len() {
        let key = registry.get_key(i as f64).unwrap();
        assert_eq!(registry.get_index(key), Some(i as f64));
    }

    for &q in &queries {
        let sel = registry.get_selection(q, q + 30.0);
        if let Some(first) = sel.first_index {
            assert!(first < registry.len());
            assert_eq!(sel.pre_first_index, first.checked_sub(1));
        }
        if let (Some(first), Some(last)) = (sel.first_index, sel.last_index) {
            let steps = registry.get_iterator_fast(first, last).count();
            assert_eq!(steps, (last + 1).saturating_sub(first));
        }
    }
});
