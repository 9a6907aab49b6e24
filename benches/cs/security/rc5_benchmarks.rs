use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cryptolabs::security::{derive_key, KeySize, Rc5};

fn bench_key_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("rc5_key_schedule");
    for key_size in [KeySize::Bits64, KeySize::Bits128, KeySize::Bits256] {
        let key = derive_key("benchmark password", key_size);
        group.bench_with_input(BenchmarkId::from_parameter(key_size.bits()), &key, |b, key| {
            b.iter(|| Rc5::new(black_box(key)).unwrap());
        });
    }
    group.finish();
}

fn bench_cbc(c: &mut Criterion) {
    let rc5 = Rc5::new(&derive_key("benchmark password", KeySize::Bits128)).unwrap();
    let data = vec![0x42u8; 16 * 1024];
    let ciphertext = rc5.encrypt_cbc(&data);

    let mut group = c.benchmark_group("rc5_cbc");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("encrypt_16k", |b| b.iter(|| rc5.encrypt_cbc(black_box(&data))));
    group.bench_function("decrypt_16k", |b| {
        b.iter(|| rc5.decrypt_cbc(black_box(&ciphertext)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_key_schedule, bench_cbc);
criterion_main!(benches);
