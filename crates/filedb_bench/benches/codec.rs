//! Record framing benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use filedb_bench::random_data;
use filedb_core::record::{encode, encode_into, RecordReader};

/// Benchmark framing a single payload.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_encode");

    for size in [64, 256, 1024, 4096].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let payload = random_data(size);
            b.iter(|| black_box(encode(black_box(&payload))));
        });
    }

    group.finish();
}

/// Benchmark decoding a stream of frames.
fn bench_decode_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_decode_stream");

    for count in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let mut data = Vec::new();
            for _ in 0..count {
                encode_into(&mut data, &random_data(256));
            }

            b.iter(|| {
                let mut total = 0usize;
                for payload in RecordReader::new(black_box(data.as_slice())) {
                    total += payload.unwrap().len();
                }
                black_box(total)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode_stream);
criterion_main!(benches);
