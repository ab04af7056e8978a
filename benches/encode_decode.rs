use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};

const DATA_SIZE: usize = 1024 * 1024;

/// Bytes drawn from a skewed distribution, roughly like text: low symbols are far more likely.
fn skewed_data(rng: &mut rand::rngs::SmallRng) -> Vec<u8> {
    (0..DATA_SIZE)
        .map(|_| {
            let x: f64 = rng.gen();
            (x * x * x * 255.0) as u8
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = rand::rngs::SmallRng::seed_from_u64(0xDEADBEEF);
    let inputs = [
        ("uniform", (0..DATA_SIZE).map(|_| rng.gen()).collect::<Vec<u8>>()),
        ("skewed", skewed_data(&mut rng)),
        ("single", vec![b'x'; DATA_SIZE]),
    ];

    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Bytes(DATA_SIZE as u64));
    for (name, data) in &inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), data, |b, data| {
            b.iter(|| huffpack::encode(black_box(data)).unwrap())
        });
    }
    group.finish();

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(DATA_SIZE as u64));
    for (name, data) in &inputs {
        let container = huffpack::encode(data).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &container, |b, container| {
            b.iter(|| huffpack::decode(black_box(container)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
