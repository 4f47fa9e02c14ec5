//! Collection insert and scan benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use filedb_bench::{json_document, random_data};
use filedb_core::{Config, Database};
use tempfile::TempDir;

/// Benchmark raw inserts without fsync.
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection_insert");

    for size in [64, 256, 1024, 4096].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let temp_dir = TempDir::new().unwrap();
            let config = Config::default().sync_on_insert(false);
            let db = Database::dial_with_config(temp_dir.path(), config).unwrap();
            let collection = db.collection("bench").unwrap();
            let data = random_data(size);

            b.iter(|| collection.insert(black_box(&data)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark durable inserts (fsync per insert).
fn bench_insert_synced(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection_insert_synced");

    // Use a smaller sample size for fsync-bound operations
    group.sample_size(20);

    group.bench_function("256", |b| {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::dial(temp_dir.path()).unwrap();
        let collection = db.collection("bench").unwrap();
        let data = random_data(256);

        b.iter(|| collection.insert(black_box(&data)).unwrap());
    });

    group.finish();
}

/// Benchmark JSON inserts.
fn bench_insert_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection_insert_json");

    group.bench_function("256", |b| {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::default().sync_on_insert(false);
        let db = Database::dial_with_config(temp_dir.path(), config).unwrap();
        let collection = db.collection("bench").unwrap();
        let doc = json_document(1, 256);

        b.iter(|| collection.insert_json(black_box(&doc)).unwrap());
    });

    group.finish();
}

/// Benchmark full scans.
fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection_scan");

    for count in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let temp_dir = TempDir::new().unwrap();
            let config = Config::default().sync_on_insert(false);
            let db = Database::dial_with_config(temp_dir.path(), config).unwrap();
            let collection = db.collection("bench").unwrap();
            for i in 0..count {
                collection.insert_json(&json_document(i, 256)).unwrap();
            }

            b.iter(|| {
                let mut seen = 0usize;
                collection
                    .for_each(|payload| {
                        seen += black_box(payload).len();
                        false
                    })
                    .unwrap();
                black_box(seen)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_insert_synced,
    bench_insert_json,
    bench_scan
);
criterion_main!(benches);
