//! Builder throughput over synthetic tick streams.
//!
//! Run with: `cargo bench --package tapeflow-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tapeflow_bench::{BUILDERS, BenchmarkConfig, generate, synthetic_ticks};
use tapeflow_lib::prelude::*;

/// Stream sizes: roughly an hour, a few hours and a full day of trading.
const SIZES: &[(&str, usize)] = &[("15k", 15_000), ("60k", 60_000), ("300k", 300_000)];

fn aggregation_benchmark(c: &mut Criterion) {
    let config = AggregationConfig::default().with_bucket_size(1_000_000.0);
    let mut group = c.benchmark_group("aggregate");
    group.sample_size(10);

    for (name, count) in SIZES {
        let ticks = synthetic_ticks(&BenchmarkConfig {
            ticks: *count,
            ..Default::default()
        });
        group.throughput(Throughput::Elements(*count as u64));

        for builder in BUILDERS {
            group.bench_with_input(BenchmarkId::new(*builder, name), &ticks, |b, ticks| {
                b.iter(|| generate(builder, black_box(ticks), &config).unwrap());
            });
        }
    }

    group.finish();
}

fn adjacency_benchmark(c: &mut Criterion) {
    let ticks = synthetic_ticks(&BenchmarkConfig::default());
    let binner = PriceBinner::new(0.5).unwrap();
    let mut group = c.benchmark_group("value_area");

    for adjacency in [ValueAreaAdjacency::Positional, ValueAreaAdjacency::Price] {
        let mut builder = VolumeProfileAggregator::new(binner).with_adjacency(adjacency);
        builder.add_ticks(ticks.clone()).unwrap();
        group.bench_function(format!("{adjacency:?}"), |b| {
            b.iter(|| builder.generate_profiles(Timeframe::HOUR_1, 70).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, aggregation_benchmark, adjacency_benchmark);
criterion_main!(benches);
