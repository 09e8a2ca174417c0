use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeSet;
use sumi_tree::RBTreeSet;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

// ─── Insert benchmarks ──────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion, name: &str, keys: &[i64]) {
    let mut group = c.benchmark_group(name);

    group.bench_function(BenchmarkId::new("RBTreeSet", N), |b| {
        b.iter(|| {
            let mut set = RBTreeSet::new();
            for &k in keys {
                set.insert(k);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &k in keys {
                set.insert(k);
            }
            set
        });
    });

    group.finish();
}

fn bench_insert_ordered(c: &mut Criterion) {
    bench_insert(c, "set_insert_ordered", &ordered_keys(N));
}

fn bench_insert_reverse(c: &mut Criterion) {
    bench_insert(c, "set_insert_reverse", &reverse_ordered_keys(N));
}

fn bench_insert_random(c: &mut Criterion) {
    bench_insert(c, "set_insert_random", &random_keys(N));
}

// ─── Lookup benchmarks ──────────────────────────────────────────────────────

fn bench_contains_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let rb_set: RBTreeSet<i64> = keys.iter().copied().collect();
    let bt_set: BTreeSet<i64> = keys.iter().copied().collect();

    let mut group = c.benchmark_group("set_contains_random");

    group.bench_function(BenchmarkId::new("RBTreeSet", N), |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for k in &keys {
                if rb_set.contains(k) {
                    hits += 1;
                }
            }
            hits
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for k in &keys {
                if bt_set.contains(k) {
                    hits += 1;
                }
            }
            hits
        });
    });

    group.finish();
}

// ─── Remove benchmarks ──────────────────────────────────────────────────────

fn bench_remove_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let rb_set: RBTreeSet<i64> = keys.iter().copied().collect();
    let bt_set: BTreeSet<i64> = keys.iter().copied().collect();

    let mut group = c.benchmark_group("set_remove_random");

    group.bench_function(BenchmarkId::new("RBTreeSet", N), |b| {
        b.iter(|| {
            let mut set = rb_set.clone();
            for k in &keys {
                set.remove(k);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = bt_set.clone();
            for k in &keys {
                set.remove(k);
            }
            set
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_ordered,
    bench_insert_reverse,
    bench_insert_random,
    bench_contains_random,
    bench_remove_random,
);
criterion_main!(benches);
