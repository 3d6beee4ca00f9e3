use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use keyline::{Key, MergeStrategy, Registry, RegistryOptions, RowTable};
use tracing_subscriber::EnvFilter;

/// Benchmark configuration
struct BenchConfig {
    num_sources: usize,
    rows_per_source: usize,
    num_queries: usize,
    strategy: MergeStrategy,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            num_sources: 8,
            rows_per_source: 100_000,
            num_queries: 100_000,
            strategy: MergeStrategy::Pairwise,
        }
    }
}

/// Statistics for a benchmark run
struct BenchStats {
    duration: Duration,
    operations: usize,
    latencies: Vec<Duration>,
}

impl BenchStats {
    fn new() -> Self {
        BenchStats {
            duration: Duration::ZERO,
            operations: 0,
            latencies: Vec::new(),
        }
    }

    fn ops_per_sec(&self) -> f64 {
        self.operations as f64 / self.duration.as_secs_f64()
    }

    fn avg_latency_us(&self) -> f64 {
        if self.latencies.is_empty() {
            return 0.0;
        }
        let sum: u128 = self.latencies.iter().map(|d| d.as_micros()).sum();
        sum as f64 / self.latencies.len() as f64
    }

    fn percentile_latency_us(&mut self, percentile: f64) -> f64 {
        if self.latencies.is_empty() {
            return 0.0;
        }
        self.latencies.sort();
        let idx = ((self.latencies.len() as f64 * percentile / 100.0) as usize)
            .min(self.latencies.len() - 1);
        self.latencies[idx].as_nanos() as f64 / 1000.0
    }

    fn print_summary(&mut self, name: &str) {
        println!("\n{}", "=".repeat(60));
        println!("Benchmark: {}", name);
        println!("{}", "=".repeat(60));
        println!("Operations:     {:>12}", format_number(self.operations));
        println!("Duration:       {:>12.3} sec", self.duration.as_secs_f64());
        println!("Throughput:     {:>12.0} ops/sec", self.ops_per_sec());
        println!("\nLatency (microseconds):");
        println!("  Average:      {:>12.2}", self.avg_latency_us());
        println!("  P50:          {:>12.2}", self.percentile_latency_us(50.0));
        println!("  P99:          {:>12.2}", self.percentile_latency_us(99.0));
        println!("{}", "=".repeat(60));
    }
}

fn format_number(n: usize) -> String {
    n.to_string()
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(std::str::from_utf8)
        .collect::<Result<Vec<&str>, _>>()
        .unwrap()
        .join(",")
}

/// Pseudo-random sequence so runs are repeatable without a rand dependency
fn lcg(seed: &mut u64) -> u64 {
    *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    *seed >> 33
}

/// Ascending keys with random gaps of 1..=4, like irregularly sampled
/// timestamps.
fn generate_source(rows: usize, seed: u64) -> Vec<Key> {
    let mut state = seed;
    let mut key = 0.0;
    (0..rows)
        .map(|_| {
            key += (lcg(&mut state) % 4 + 1) as f64;
            key
        })
        .collect()
}

fn bench_rebuild(registry: &mut Registry, rounds: usize) -> BenchStats {
    println!("\nRunning rebuild benchmark...");
    let mut stats = BenchStats::new();

    let start = Instant::now();
    for _ in 0..rounds {
        registry.set_dirty();
        let op_start = Instant::now();
        registry.update().unwrap();
        stats.latencies.push(op_start.elapsed());
        stats.operations += 1;
    }
    stats.duration = start.elapsed();

    stats
}

fn bench_get_index(registry: &Registry, config: &BenchConfig) -> BenchStats {
    println!("\nRunning get_index benchmark...");
    let mut stats = BenchStats::new();
    let last = registry.get_last_key().unwrap_or(1.0);
    let mut seed = 7;

    let start = Instant::now();
    for _ in 0..config.num_queries {
        let key = (lcg(&mut seed) as f64 / 4.0) % last;
        let op_start = Instant::now();
        std::hint::black_box(registry.get_index(key));
        stats.latencies.push(op_start.elapsed());
        stats.operations += 1;
    }
    stats.duration = start.elapsed();

    stats
}

fn bench_selection_scan(registry: &Registry, config: &BenchConfig) -> BenchStats {
    println!("\nRunning selection + iteration benchmark...");
    let mut stats = BenchStats::new();
    let last = registry.get_last_key().unwrap_or(1.0);
    let mut seed = 11;
    let mut visited = 0usize;

    let start = Instant::now();
    for _ in 0..config.num_queries / 100 {
        let from = (lcg(&mut seed) as f64) % last;
        let op_start = Instant::now();
        let selection = registry.get_selection(from, from + 1000.0);
        if let (Some(first), Some(last)) = (selection.first_index, selection.last_index) {
            let mut iter = registry.get_iterator_fast(first, last);
            while iter.advance() {
                visited += 1;
            }
        }
        stats.latencies.push(op_start.elapsed());
        stats.operations += 1;
    }
    stats.duration = start.elapsed();
    println!("Visited {} keys", format_number(visited));

    stats
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("\nkeyline registry benchmark");
    println!("{}\n", "-".repeat(60));

    let config = BenchConfig::default();

    println!("Configuration:");
    println!("  Sources:        {}", format_number(config.num_sources));
    println!("  Rows/source:    {}", format_number(config.rows_per_source));
    println!("  Queries:        {}", format_number(config.num_queries));
    println!("  Strategy:       {:?}", config.strategy);

    let options = RegistryOptions {
        merge_strategy: config.strategy,
        ..Default::default()
    };
    let mut registry = Registry::with_options(options);
    for s in 0..config.num_sources {
        let keys = generate_source(config.rows_per_source, s as u64 + 1);
        registry.add_source(Arc::new(RowTable::from_keys(keys).unwrap()));
    }

    let mut rebuild_stats = bench_rebuild(&mut registry, 20);
    rebuild_stats.print_summary("Rebuild (update after set_dirty)");
    println!(
        "Merged {} keys, sync mode: {}",
        format_number(registry.len()),
        registry.is_in_sync_mode()
    );

    let mut index_stats = bench_get_index(&registry, &config);
    index_stats.print_summary("Key -> index (get_index)");

    let mut scan_stats = bench_selection_scan(&registry, &config);
    scan_stats.print_summary("Selection + range iteration");

    println!("\n{}", registry.statistics().report());
}
