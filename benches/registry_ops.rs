use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use keyline::{Key, MergeStrategy, Registry, RegistryOptions, RowTable};

/// `count` sources of `rows` keys each; every source samples a different
/// stride so roughly half the keys overlap between neighbours.
fn make_sources(count: usize, rows: usize) -> Vec<Arc<RowTable>> {
    (0..count)
        .map(|s| {
            let stride = (s % 3 + 1) as f64;
            let keys: Vec<Key> = (0..rows).map(|i| i as f64 * stride).collect();
            Arc::new(RowTable::from_keys(keys).unwrap())
        })
        .collect()
}

fn setup_registry(strategy: MergeStrategy, count: usize, rows: usize) -> Registry {
    let options = RegistryOptions {
        merge_strategy: strategy,
        ..Default::default()
    };
    let mut registry = Registry::with_options(options);
    for source in make_sources(count, rows) {
        registry.add_source(source);
    }
    registry.set_dirty();
    registry.update().unwrap();
    registry
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");

    for count in [2usize, 4, 8] {
        let rows = 10_000;
        group.throughput(Throughput::Elements((count * rows) as u64));

        for (name, strategy) in [
            ("pairwise", MergeStrategy::Pairwise),
            ("heap", MergeStrategy::Heap),
        ] {
            group.bench_with_input(BenchmarkId::new(name, count), &count, |b, &count| {
                let mut registry = setup_registry(strategy, count, rows);
                b.iter(|| {
                    registry.set_dirty();
                    registry.update().unwrap();
                    black_box(registry.len());
                });
            });
        }
    }

    group.finish();
}

fn bench_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    group.throughput(Throughput::Elements(1));

    let registry = setup_registry(MergeStrategy::Pairwise, 4, 100_000);
    let last = registry.get_last_key().unwrap();

    group.bench_function("get_index_exact", |b| {
        let mut k = 0.0;
        b.iter(|| {
            black_box(registry.get_index(black_box(k)));
            k = (k + 7.0) % last;
        });
    });

    group.bench_function("get_index_interpolated", |b| {
        let mut k = 0.5;
        b.iter(|| {
            black_box(registry.get_index(black_box(k)));
            k = (k + 7.0) % last;
        });
    });

    group.bench_function("get_key_fractional", |b| {
        let mut i = 0.25;
        let len = registry.len() as f64;
        b.iter(|| {
            black_box(registry.get_key(black_box(i)));
            i = (i + 13.0) % len;
        });
    });

    group.bench_function("get_selection", |b| {
        let mut start = 0.0;
        b.iter(|| {
            black_box(registry.get_selection(start, start + 500.0));
            start = (start + 11.0) % last;
        });
    });

    group.finish();
}

fn bench_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");
    let registry = setup_registry(MergeStrategy::Pairwise, 4, 100_000);

    for span in [100usize, 10_000] {
        group.throughput(Throughput::Elements(span as u64));
        group.bench_with_input(BenchmarkId::new("range", span), &span, |b, &span| {
            b.iter(|| {
                let mut iter = registry.get_iterator_fast(1000, 1000 + span - 1);
                let mut sum = 0.0;
                while iter.advance() {
                    sum += iter.current_key().unwrap_or_default();
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rebuild, bench_lookups, bench_iteration);
criterion_main!(benches);
