//! Benchmarks for indicator implementations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use trendwatch_core::traits::Indicator;
use trendwatch_indicators::Sma;

fn generate_test_data(size: usize) -> Vec<Decimal> {
    (0..size)
        .map(|i| Decimal::new(10_000 + ((i * 37) % 1_000) as i64, 2))
        .collect()
}

fn benchmark_sma(c: &mut Criterion) {
    let mut group = c.benchmark_group("SMA");

    for size in [500, 5000, 50000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("window_200", size), &data, |b, data| {
            let sma = Sma::new(200).unwrap();
            b.iter(|| sma.calculate(black_box(data)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_sma);
criterion_main!(benches);
