//! Benchmarks for cuckoo filter operations
//!
//! Measures single-threaded insert, lookup (hit and miss), and remove
//! throughput at increasing fill levels.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cuckoo_oxide::common::hash::item_hash;
use cuckoo_oxide::CuckooFilter;

/// Generate well-distributed item hashes
fn generate_hashes(count: usize) -> Vec<u64> {
    (0..count)
        .map(|i| item_hash(format!("key_{}", i).as_bytes()))
        .collect()
}

/// Benchmark filter insertions
fn bench_insertions(c: &mut Criterion) {
    let mut group = c.benchmark_group("cuckoo_insert");
    let sizes = [1000, 10_000];
    let hashes_10k = generate_hashes(10_000);

    for &size in &sizes {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("fill", size), &size, |b, &n| {
            b.iter(|| {
                let filter = CuckooFilter::builder(n as u64 * 2).build().unwrap();
                for &hash in hashes_10k.iter().take(n) {
                    filter.insert(black_box(hash));
                }
                filter
            })
        });
    }

    group.finish();
}

/// Benchmark filter lookups
fn bench_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("cuckoo_lookup");
    let n = 10_000;
    let hashes = generate_hashes(n);
    let absent: Vec<u64> = (0..1000)
        .map(|i| item_hash(format!("absent_{}", i).as_bytes()))
        .collect();

    let filter = CuckooFilter::builder(n as u64 * 2).build().unwrap();
    for &hash in &hashes {
        filter.insert(hash);
    }

    group.throughput(Throughput::Elements(1000));
    group.bench_function("hit", |b| {
        b.iter(|| {
            for &hash in hashes.iter().take(1000) {
                black_box(filter.contains(black_box(hash)));
            }
        })
    });
    group.bench_function("miss", |b| {
        b.iter(|| {
            for &hash in &absent {
                black_box(filter.contains(black_box(hash)));
            }
        })
    });
    group.bench_function("count", |b| {
        b.iter(|| {
            for &hash in hashes.iter().take(1000) {
                black_box(filter.count(black_box(hash)));
            }
        })
    });

    group.finish();
}

/// Benchmark removals
fn bench_removals(c: &mut Criterion) {
    let mut group = c.benchmark_group("cuckoo_remove");
    let n = 10_000;
    let hashes = generate_hashes(n);

    group.throughput(Throughput::Elements(n as u64));
    group.bench_function("drain", |b| {
        b.iter(|| {
            let filter = CuckooFilter::builder(n as u64 * 2).build().unwrap();
            for &hash in &hashes {
                filter.insert(hash);
            }
            for &hash in &hashes {
                black_box(filter.remove(black_box(hash)));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_insertions, bench_lookups, bench_removals);
criterion_main!(benches);
