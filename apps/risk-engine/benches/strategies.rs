//! Sequential vs shared-pool vs dedicated-pool throughput on a seeded
//! synthetic batch.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use risk_engine::pool::PoolConfig;
use risk_engine::{MonteCarloConfig, MonteCarloMetric, Portfolio, RiskCalculator, Strategy};

const BENCH_ITERATIONS: u32 = 10_000;

fn synthetic_batch(size: usize) -> Vec<Portfolio> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..size)
        .map(|i| {
            Portfolio::new(
                format!("BENCH-{i}"),
                rng.random_range(1_000_000.0..10_000_000.0),
                rng.random_range(0.05..0.20),
                rng.random_range(0.10..0.40),
            )
        })
        .collect()
}

fn bench_strategies(c: &mut Criterion) {
    let metric = MonteCarloMetric::new(MonteCarloConfig {
        iterations: BENCH_ITERATIONS,
        seed: Some(42),
    });
    let calculator =
        RiskCalculator::with_metric(metric, PoolConfig::dedicated()).expect("pool builds");

    for size in [16_usize, 128] {
        let batch = synthetic_batch(size);
        let mut group = c.benchmark_group(format!("risk_batch_{size}"));
        group.throughput(Throughput::Elements(size as u64));
        group.sample_size(10);

        for strategy in Strategy::ALL {
            group.bench_with_input(
                BenchmarkId::from_parameter(strategy),
                &batch,
                |b, batch| {
                    b.iter(|| calculator.run(strategy, black_box(batch)).unwrap());
                },
            );
        }
        group.finish();
    }

    calculator.shutdown();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
