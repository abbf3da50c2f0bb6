//! Benchmark runner that outputs a markdown table for the README.
//!
//! Run with: `cargo run --package tapeflow-bench --bin benchmark_table --release`

use tapeflow_bench::{
    BUILDERS, BenchmarkConfig, BenchmarkResult, format_duration, format_rate, run_builder,
    synthetic_ticks,
};
use tapeflow_lib::prelude::*;

/// Number of iterations per benchmark for statistical significance.
const ITERATIONS: u32 = 3;

fn main() {
    println!("tapeflow builder benchmark");
    println!("==========================\n");

    let stream = BenchmarkConfig::default();
    let ticks = synthetic_ticks(&stream);
    let config = AggregationConfig::default().with_bucket_size(1_000_000.0);
    println!(
        "{} synthetic ticks, timeframe {}, bin {}, {} iterations each\n",
        ticks.len(),
        config.timeframe,
        config.price_bin_size,
        ITERATIONS
    );

    let results: Vec<BenchmarkResult> = BUILDERS
        .iter()
        .map(|builder| average(builder, &ticks, &config))
        .collect();

    println!("## Results\n");
    println!("| Builder | Time | Throughput | Records |");
    println!("|---------|------|------------|---------|");
    for result in &results {
        match &result.error {
            None => println!(
                "| {} | {} | {} | {} |",
                result.builder,
                format_duration(result.duration),
                format_rate(result.ticks_per_sec()),
                result.records
            ),
            Some(error) => println!("| {} | FAILED | {error} | - |", result.builder),
        }
    }

    println!("\n### Environment\n");
    println!("- OS: {}", std::env::consts::OS);
    println!("- Arch: {}", std::env::consts::ARCH);
    println!("- tapeflow version: {}", env!("CARGO_PKG_VERSION"));
}

fn average(builder: &'static str, ticks: &[Tick], config: &AggregationConfig) -> BenchmarkResult {
    let runs: Vec<_> = (0..ITERATIONS)
        .map(|_| run_builder(builder, ticks, config))
        .collect();

    if let Some(failed) = runs.iter().find(|r| !r.success()) {
        return failed.clone();
    }

    let mut result = runs[0].clone();
    result.duration = runs.iter().map(|r| r.duration).sum::<std::time::Duration>() / ITERATIONS;
    result
}
