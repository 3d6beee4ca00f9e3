use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    sync::Arc,
};

use tracing::trace;

use crate::{
    statistics::Statistics,
    util::{Key, compare_keys},
};

/// Merge two ascending key runs, emitting equal keys once.
///
/// On equality both sides advance; otherwise only the smaller side does.
pub fn merge_two(acc: &[Key], src: &[Key]) -> Vec<Key> {
    let mut out = Vec::with_capacity(acc.len().max(src.len()));
    let (mut i, mut j) = (0, 0);

    while i < acc.len() && j < src.len() {
        match compare_keys(acc[i], src[j]) {
            Ordering::Less => {
                out.push(acc[i]);
                i += 1;
            },
            Ordering::Equal => {
                out.push(acc[i]);
                i += 1;
                j += 1;
            },
            Ordering::Greater => {
                out.push(src[j]);
                j += 1;
            },
        }
    }

    out.extend_from_slice(&acc[i..]);
    out.extend_from_slice(&src[j..]);
    out
}

/// Pairwise reduction over two or more sources.
///
/// Sources 0 and 1 seed the accumulator, then every source, including those
/// two, is folded in once more. The second visit of a source already in the
/// accumulator changes nothing but costs a linear pass.
pub fn merge_pairwise(sources: &[Arc<Vec<Key>>], statistics: &Statistics) -> Vec<Key> {
    debug_assert!(sources.len() >= 2);

    let mut acc = merge_two(&sources[0], &sources[1]);
    statistics.record_merge_pass((sources[0].len() + sources[1].len()) as u64, acc.len() as u64);
    trace!(pass = "seed", keys = acc.len(), "merged first two sources");

    for (pos, src) in sources.iter().enumerate() {
        let input = acc.len() + src.len();
        acc = merge_two(&acc, src);
        statistics.record_merge_pass(input as u64, acc.len() as u64);
        trace!(source = pos, keys = acc.len(), "folded source into accumulator");
    }

    acc
}

/// Entry in the min-heap, ordered by key (reversed) then by source (reversed)
struct HeapEntry {
    key: Key,
    source: usize,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse both keys for min-heap behavior
        compare_keys(other.key, self.key).then_with(|| other.source.cmp(&self.source))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for HeapEntry {}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// Single-pass k-way merge using a min-heap of each source's next key.
///
/// O(n log k) for n total rows over k sources.
pub fn merge_heap(sources: &[Arc<Vec<Key>>], statistics: &Statistics) -> Vec<Key> {
    let total: usize = sources.iter().map(|s| s.len()).sum();
    let mut out: Vec<Key> = Vec::with_capacity(total);
    let mut positions = vec![0usize; sources.len()];
    let mut heap = BinaryHeap::with_capacity(sources.len());

    for (source, keys) in sources.iter().enumerate() {
        if let Some(&key) = keys.first() {
            heap.push(HeapEntry { key, source });
        }
    }

    while let Some(entry) = heap.pop() {
        // Equal keys from lower-priority sources surface right after the first
        let duplicate = out
            .last()
            .is_some_and(|&last| compare_keys(last, entry.key) == Ordering::Equal);
        if !duplicate {
            out.push(entry.key);
        }

        let pos = &mut positions[entry.source];
        *pos += 1;
        if let Some(&key) = sources[entry.source].get(*pos) {
            heap.push(HeapEntry {
                key,
                source: entry.source,
            });
        }
    }

    statistics.record_merge_pass(total as u64, out.len() as u64);
    trace!(sources = sources.len(), keys = out.len(), "heap merge finished");
    out
}
