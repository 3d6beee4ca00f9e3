use std::sync::atomic::{AtomicU64, Ordering};

/// Registry-wide statistics
///
/// Counters are atomics so a registry can hand out `Arc<Statistics>` to
/// whoever renders diagnostics without borrowing the registry itself.
#[derive(Debug, Default)]
pub struct Statistics {
    // Rebuild lifecycle
    pub num_rebuilds: AtomicU64,
    pub num_skipped_updates: AtomicU64,
    pub num_single_source_rebuilds: AtomicU64,
    pub rebuild_time_micros: AtomicU64,

    // Merge work
    pub num_merge_passes: AtomicU64,
    pub keys_merged: AtomicU64,
    pub duplicates_dropped: AtomicU64,

    // Queries
    pub num_key_lookups: AtomicU64,
    pub num_index_lookups: AtomicU64,
    pub num_exact_hits: AtomicU64,
    pub num_interpolations: AtomicU64,
    pub num_selections: AtomicU64,
    pub num_iterators: AtomicU64,

    // Error counts
    pub num_verification_errors: AtomicU64,
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    // Rebuild tracking
    #[inline]
    pub fn record_rebuild(&self, time_micros: u64) {
        self.num_rebuilds.fetch_add(1, Ordering::Relaxed);
        self.rebuild_time_micros
            .fetch_add(time_micros, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_skipped_update(&self) {
        self.num_skipped_updates.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_single_source_rebuild(&self) {
        self.num_single_source_rebuilds
            .fetch_add(1, Ordering::Relaxed);
    }

    /// One two-pointer or heap pass producing `output` keys from `input`.
    #[inline]
    pub fn record_merge_pass(&self, input: u64, output: u64) {
        self.num_merge_passes.fetch_add(1, Ordering::Relaxed);
        self.keys_merged.fetch_add(output, Ordering::Relaxed);
        self.duplicates_dropped
            .fetch_add(input.saturating_sub(output), Ordering::Relaxed);
    }

    // Query tracking
    #[inline]
    pub fn record_key_lookup(&self) {
        self.num_key_lookups.fetch_add(1, Ordering::Relaxed);
    }

    /// Counted for every index lookup, resolved or not.
    #[inline]
    pub fn record_index_lookup(&self, exact: bool) {
        self.num_index_lookups.fetch_add(1, Ordering::Relaxed);
        if exact {
            self.num_exact_hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// A key or index lookup fell between (or beyond) the stored keys.
    #[inline]
    pub fn record_interpolation(&self) {
        self.num_interpolations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_selection(&self) {
        self.num_selections.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_iterator(&self) {
        self.num_iterators.fetch_add(1, Ordering::Relaxed);
    }

    // Error tracking
    #[inline]
    pub fn record_verification_error(&self) {
        self.num_verification_errors
            .fetch_add(1, Ordering::Relaxed);
    }

    // Getters (snapshot values)
    pub fn num_rebuilds(&self) -> u64 {
        self.num_rebuilds.load(Ordering::Relaxed)
    }

    pub fn num_skipped_updates(&self) -> u64 {
        self.num_skipped_updates.load(Ordering::Relaxed)
    }

    pub fn num_merge_passes(&self) -> u64 {
        self.num_merge_passes.load(Ordering::Relaxed)
    }

    pub fn duplicates_dropped(&self) -> u64 {
        self.duplicates_dropped.load(Ordering::Relaxed)
    }

    pub fn num_key_lookups(&self) -> u64 {
        self.num_key_lookups.load(Ordering::Relaxed)
    }

    pub fn num_index_lookups(&self) -> u64 {
        self.num_index_lookups.load(Ordering::Relaxed)
    }

    pub fn num_interpolations(&self) -> u64 {
        self.num_interpolations.load(Ordering::Relaxed)
    }

    pub fn num_selections(&self) -> u64 {
        self.num_selections.load(Ordering::Relaxed)
    }

    pub fn num_iterators(&self) -> u64 {
        self.num_iterators.load(Ordering::Relaxed)
    }

    pub fn num_verification_errors(&self) -> u64 {
        self.num_verification_errors.load(Ordering::Relaxed)
    }

    /// Fraction of index lookups that landed exactly on a stored key.
    pub fn exact_hit_rate(&self) -> f64 {
        let hits = self.num_exact_hits.load(Ordering::Relaxed) as f64;
        let total = self.num_index_lookups.load(Ordering::Relaxed) as f64;
        if total > 0.0 { hits / total } else { 0.0 }
    }

    /// Fraction of `update()` calls that found the registry clean.
    pub fn skipped_update_ratio(&self) -> f64 {
        let skipped = self.num_skipped_updates.load(Ordering::Relaxed) as f64;
        let total = skipped + self.num_rebuilds.load(Ordering::Relaxed) as f64;
        if total > 0.0 { skipped / total } else { 0.0 }
    }

    pub fn avg_rebuild_time_ms(&self) -> f64 {
        let total_time = self.rebuild_time_micros.load(Ordering::Relaxed) as f64;
        let num_rebuilds = self.num_rebuilds.load(Ordering::Relaxed) as f64;
        if num_rebuilds > 0.0 {
            total_time / num_rebuilds / 1000.0
        } else {
            0.0
        }
    }

    /// Reset all statistics to zero
    pub fn reset(&self) {
        self.num_rebuilds.store(0, Ordering::Relaxed);
        self.num_skipped_updates.store(0, Ordering::Relaxed);
        self.num_single_source_rebuilds.store(0, Ordering::Relaxed);
        self.rebuild_time_micros.store(0, Ordering::Relaxed);
        self.num_merge_passes.store(0, Ordering::Relaxed);
        self.keys_merged.store(0, Ordering::Relaxed);
        self.duplicates_dropped.store(0, Ordering::Relaxed);
        self.num_key_lookups.store(0, Ordering::Relaxed);
        self.num_index_lookups.store(0, Ordering::Relaxed);
        self.num_exact_hits.store(0, Ordering::Relaxed);
        self.num_interpolations.store(0, Ordering::Relaxed);
        self.num_selections.store(0, Ordering::Relaxed);
        self.num_iterators.store(0, Ordering::Relaxed);
        self.num_verification_errors.store(0, Ordering::Relaxed);
    }

    /// Get a formatted statistics report
    pub fn report(&self) -> String {
        format!(
            "Registry Statistics:\n\
            \n\
            Rebuilds:\n\
            - Runs:          {}\n\
            - Single source: {}\n\
            - Skipped:       {} ({:.1}%)\n\
            - Avg time:      {:.3} ms\n\
            \n\
            Merge:\n\
            - Passes:        {}\n\
            - Keys emitted:  {}\n\
            - Duplicates:    {}\n\
            \n\
            Queries:\n\
            - Key lookups:   {}\n\
            - Index lookups: {}\n\
            - Exact rate:    {:.2}%\n\
            - Interpolated:  {}\n\
            - Selections:    {}\n\
            - Iterators:     {}\n\
            \n\
            Errors:          {}",
            self.num_rebuilds(),
            self.num_single_source_rebuilds.load(Ordering::Relaxed),
            self.num_skipped_updates(),
            self.skipped_update_ratio() * 100.0,
            self.avg_rebuild_time_ms(),
            self.num_merge_passes(),
            self.keys_merged.load(Ordering::Relaxed),
            self.duplicates_dropped(),
            self.num_key_lookups(),
            self.num_index_lookups(),
            self.exact_hit_rate() * 100.0,
            self.num_interpolations(),
            self.num_selections(),
            self.num_iterators(),
            self.num_verification_errors(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_basic() {
        let stats = Statistics::new();

        stats.record_rebuild(100);
        stats.record_rebuild(300);
        stats.record_skipped_update();

        assert_eq!(stats.num_rebuilds(), 2);
        assert_eq!(stats.num_skipped_updates(), 1);
        assert_eq!(stats.avg_rebuild_time_ms(), 0.2);
    }

    #[test]
    fn test_merge_pass_counts_duplicates() {
        let stats = Statistics::new();

        stats.record_merge_pass(6, 5);
        stats.record_merge_pass(8, 5);

        assert_eq!(stats.num_merge_passes(), 2);
        assert_eq!(stats.keys_merged.load(Ordering::Relaxed), 10);
        assert_eq!(stats.duplicates_dropped(), 4);
    }

    #[test]
    fn test_exact_hit_rate() {
        let stats = Statistics::new();

        stats.record_index_lookup(true);
        stats.record_index_lookup(true);
        stats.record_index_lookup(true);
        stats.record_index_lookup(false);
        stats.record_interpolation();
        stats.record_key_lookup();
        stats.record_interpolation();

        assert_eq!(stats.exact_hit_rate(), 0.75);
        assert_eq!(stats.num_key_lookups(), 1);
        assert_eq!(stats.num_interpolations(), 2);
    }

    #[test]
    fn test_statistics_reset() {
        let stats = Statistics::new();

        stats.record_rebuild(10);
        stats.record_selection();
        stats.record_iterator();
        stats.record_verification_error();

        stats.reset();

        assert_eq!(stats.num_rebuilds(), 0);
        assert_eq!(stats.num_selections(), 0);
        assert_eq!(stats.num_iterators(), 0);
        assert_eq!(stats.num_verification_errors(), 0);
        assert_eq!(stats.avg_rebuild_time_ms(), 0.0);
    }

    #[test]
    fn test_statistics_report() {
        let stats = Statistics::new();

        stats.record_rebuild(0);
        stats.record_skipped_update();
        stats.record_index_lookup(true);
        stats.record_index_lookup(false);

        let report = stats.report();
        assert!(report.contains("Registry Statistics"));
        assert!(report.contains("Runs:          1"));
        assert!(report.contains("Skipped:       1 (50.0%)"));
        assert!(report.contains("Exact rate:    50.00%"));
    }
}
