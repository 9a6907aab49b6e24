use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cryptolabs::security::{md5_digest, Md5};

fn bench_md5_one_shot(c: &mut Criterion) {
    let mut group = c.benchmark_group("md5_one_shot");
    for size in [64usize, 1024, 64 * 1024] {
        let data = vec![0x5au8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| md5_digest(black_box(data)));
        });
    }
    group.finish();
}

fn bench_md5_streaming(c: &mut Criterion) {
    let data = vec![0xa5u8; 64 * 1024];
    let mut group = c.benchmark_group("md5_streaming");
    group.throughput(Throughput::Bytes(data.len() as u64));
    // odd chunk size keeps the accumulator busy
    group.bench_function("chunks_of_1000", |b| {
        b.iter(|| {
            let mut hasher = Md5::new();
            for chunk in data.chunks(1000) {
                hasher.update(black_box(chunk));
            }
            hasher.finalize()
        });
    });
    group.finish();
}

criterion_group!(benches, bench_md5_one_shot, bench_md5_streaming);
criterion_main!(benches);
