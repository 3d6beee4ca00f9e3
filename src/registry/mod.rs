/// Registry module for keyline
///
/// Merges any number of ascending key sources into one deduplicated,
/// globally ordered key sequence and maps between keys and their ordinal
/// indices in it.
///
/// # Architecture
///
/// ```text
/// Registry
///     ├─→ Vec<Arc<dyn KeySource>>   (owner-managed, read only)
///     ├─→ Arc<Vec<Key>>             (merged keys, shared with iterators)
///     ├─→ dirty / sync_mode flags
///     └─→ Arc<Statistics>
/// ```
///
/// ## Lifecycle
///
/// 1. The owner adds or removes sources and calls `set_dirty()` whenever a
///    source or its content changed.
/// 2. Before querying, the owner calls `update()`. It rebuilds the merged
///    keys only when dirty and is a no-op otherwise.
/// 3. Queries read the rebuilt state. Querying a dirty registry is a usage
///    error: it panics in debug builds and returns the last rebuilt state in
///    release builds.
///
/// ## Rebuild
///
/// - No sources: no keys.
/// - One source: the merged keys are the source's own snapshot, shared
///   without copying.
/// - Two or more: merged with the configured [`MergeStrategy`], dropping
///   duplicate keys.
///
/// Mapping queries return `None` when no valid key or index exists for the
/// input (empty registry, single-key mismatch, non-finite input).
use std::{sync::Arc, time::Instant};

use tracing::{debug, warn};

use crate::{
    iterator::RangeIterator,
    source::KeySource,
    statistics::Statistics,
    util::{Key, Result, check_ascending, compare_keys, round_half_up},
};

pub mod merge;
mod options;
mod selection;

pub use options::{MergeStrategy, RegistryOptions};
pub use selection::Selection;

pub struct Registry {
    sources: Vec<Arc<dyn KeySource>>,
    /// Strictly ascending, deduplicated union of all source keys
    keys: Arc<Vec<Key>>,
    dirty: bool,
    /// Every source has exactly one row per merged key
    sync_mode: bool,
    options: RegistryOptions,
    statistics: Arc<Statistics>,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_options(RegistryOptions::default())
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        Registry {
            sources: Vec::new(),
            keys: Arc::new(Vec::new()),
            dirty: false,
            sync_mode: true,
            options,
            statistics: Arc::new(Statistics::new()),
        }
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    pub fn statistics(&self) -> Arc<Statistics> {
        Arc::clone(&self.statistics)
    }

    // ---------------------------------------------------------------------
    // Source management
    // ---------------------------------------------------------------------

    /// Drop all sources. Does not mark the registry dirty.
    pub fn reset_sources(&mut self) {
        self.sources.clear();
    }

    /// Append a source. Does not mark the registry dirty.
    pub fn add_source(&mut self, source: Arc<dyn KeySource>) {
        self.sources.push(source);
    }

    /// Remove the source at `position`. Does not mark the registry dirty.
    pub fn remove_source(&mut self, position: usize) -> Option<Arc<dyn KeySource>> {
        (position < self.sources.len()).then(|| self.sources.remove(position))
    }

    pub fn sources_count(&self) -> usize {
        self.sources.len()
    }

    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuild the merged keys if dirty.
    ///
    /// Fails only when `verify_sources` is enabled and a source snapshot is
    /// unsorted or holds a non-finite key. The registry then stays dirty and
    /// keeps its previous keys.
    pub fn update(&mut self) -> Result<()> {
        if !self.dirty {
            self.statistics.record_skipped_update();
            return Ok(());
        }

        let start = Instant::now();
        let snapshots: Vec<Arc<Vec<Key>>> = self.sources.iter().map(|s| s.keys()).collect();

        if self.options.verify_sources {
            for (position, snapshot) in snapshots.iter().enumerate() {
                if let Err(status) = check_ascending(snapshot) {
                    self.statistics.record_verification_error();
                    warn!(source = position, %status, "rejecting key source");
                    return Err(status);
                }
            }
        }

        self.keys = match snapshots.len() {
            0 => Arc::new(Vec::new()),
            1 => {
                self.statistics.record_single_source_rebuild();
                Arc::clone(&snapshots[0])
            },
            _ => Arc::new(match self.options.merge_strategy {
                MergeStrategy::Pairwise => merge::merge_pairwise(&snapshots, &self.statistics),
                MergeStrategy::Heap => merge::merge_heap(&snapshots, &self.statistics),
            }),
        };

        let len = self.keys.len();
        self.sync_mode = self.sources.iter().all(|s| s.rows_count() == len);
        self.dirty = false;

        let elapsed = start.elapsed();
        self.statistics.record_rebuild(elapsed.as_micros() as u64);
        debug!(
            sources = self.sources.len(),
            keys = len,
            sync_mode = self.sync_mode,
            strategy = ?self.options.merge_strategy,
            elapsed_us = elapsed.as_micros() as u64,
            "rebuilt key registry"
        );
        Ok(())
    }

    /// Source rows line up index-for-index with the merged keys, so callers
    /// may index sources directly.
    pub fn is_in_sync_mode(&self) -> bool {
        self.sync_mode
    }

    // ---------------------------------------------------------------------
    // Key <-> index mapping
    // ---------------------------------------------------------------------

    #[inline]
    fn debug_assert_clean(&self) {
        debug_assert!(!self.dirty, "registry queried while dirty; call update() first");
    }

    /// Merged keys as of the last `update()`.
    pub fn keys(&self) -> &[Key] {
        self.debug_assert_clean();
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.debug_assert_clean();
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Key at `index`, interpolating between (or extrapolating beyond) the
    /// two nearest stored keys when `index` is fractional or out of range.
    pub fn get_key(&self, index: f64) -> Option<Key> {
        self.debug_assert_clean();
        self.statistics.record_key_lookup();
        let keys = &self.keys;
        let len = keys.len();

        if !index.is_finite() {
            return None;
        }

        match len {
            0 => None,
            1 => (index == 0.0).then_some(keys[0]),
            _ => {
                let high = index.ceil();
                let mut low = index.floor();
                if high <= 0.0 {
                    low = 0.0;
                } else if low >= (len - 1) as f64 {
                    low = (len - 2) as f64;
                }

                let pos = low as usize;
                if low == high {
                    return Some(keys[pos]);
                }

                let (low_key, high_key) = (keys[pos], keys[pos + 1]);
                let key = (high_key - low_key) * (index - low) + low_key;
                self.statistics.record_interpolation();
                if self.options.round_interpolated_keys {
                    Some(round_half_up(key))
                } else {
                    Some(key)
                }
            },
        }
    }

    /// Index of `key`, fractional when `key` falls between (or beyond) the
    /// stored keys.
    pub fn get_index(&self, key: Key) -> Option<f64> {
        self.debug_assert_clean();
        let keys = &self.keys;
        let len = keys.len();

        let mut exact = false;
        let index = if !key.is_finite() {
            None
        } else {
            match len {
                0 => None,
                1 => {
                    exact = compare_keys(keys[0], key).is_eq();
                    exact.then_some(0.0)
                },
                _ => match keys.binary_search_by(|&probe| compare_keys(probe, key)) {
                    Ok(pos) => {
                        exact = true;
                        Some(pos as f64)
                    },
                    Err(insertion_point) => {
                        let mut low = insertion_point.saturating_sub(1);
                        if low == len - 1 {
                            low -= 1;
                        }
                        let (low_key, high_key) = (keys[low], keys[low + 1]);
                        self.statistics.record_interpolation();
                        Some((key - low_key) / (high_key - low_key) + low as f64)
                    },
                },
            }
        };

        self.statistics.record_index_lookup(exact);
        index
    }

    pub fn get_first_key(&self) -> Option<Key> {
        self.debug_assert_clean();
        self.keys.first().copied()
    }

    pub fn get_last_key(&self) -> Option<Key> {
        self.debug_assert_clean();
        self.keys.last().copied()
    }

    pub fn get_first_index(&self) -> Option<usize> {
        self.debug_assert_clean();
        (!self.keys.is_empty()).then_some(0)
    }

    pub fn get_last_index(&self) -> Option<usize> {
        self.debug_assert_clean();
        self.keys.len().checked_sub(1)
    }

    // ---------------------------------------------------------------------
    // Selection and iteration
    // ---------------------------------------------------------------------

    /// Describe which merged indices fall inside `[start_key, end_key]`,
    /// plus one padding index on each side.
    pub fn get_selection(&self, start_key: Key, end_key: Key) -> Selection {
        self.debug_assert_clean();
        self.statistics.record_selection();

        let len = self.keys.len();
        if len == 0 {
            return Selection::compute(0, start_key, end_key, None, None);
        }
        Selection::compute(
            len,
            start_key,
            end_key,
            self.get_index(start_key),
            self.get_index(end_key),
        )
    }

    /// Iterate the merged keys from the first key at or after `first_key` to
    /// the last key at or before `last_key`.
    ///
    /// If `last_key` cannot be resolved the iterator runs to the end of the
    /// keys; if `first_key` cannot be resolved it is empty.
    pub fn get_iterator(&self, first_key: Key, last_key: Key) -> RangeIterator {
        self.debug_assert_clean();

        let last_index = self
            .get_index(last_key)
            .map(|index| index.floor().max(0.0) as usize);
        let first_index = self
            .get_index(first_key)
            .map(|index| index.ceil().max(0.0) as usize);

        self.statistics.record_iterator();
        match first_index {
            Some(first_index) => {
                RangeIterator::new(Arc::clone(&self.keys), first_index, last_index)
            },
            None => RangeIterator::empty(),
        }
    }

    /// Iterate merged keys in the inclusive index range
    /// `[first_index, last_index]`, clipped to the stored keys.
    pub fn get_iterator_fast(&self, first_index: usize, last_index: usize) -> RangeIterator {
        self.debug_assert_clean();
        self.statistics.record_iterator();
        RangeIterator::new(Arc::clone(&self.keys), first_index, Some(last_index))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
