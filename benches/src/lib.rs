//! Benchmark utilities for tapeflow.

use chrono::{DateTime, TimeDelta, Utc};
use std::time::{Duration, Instant};
use tapeflow_lib::ValidationError;
use tapeflow_lib::prelude::*;

/// Result of a single benchmark run.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    /// Name of the builder being benchmarked.
    pub builder: &'static str,
    /// Time spent generating results.
    pub duration: Duration,
    /// Number of input ticks.
    pub ticks: u64,
    /// Number of records produced.
    pub records: usize,
    /// Error message if the run failed.
    pub error: Option<String>,
}

impl BenchmarkResult {
    /// Calculate ticks processed per second.
    pub fn ticks_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 { self.ticks as f64 / secs } else { 0.0 }
    }

    /// Returns true if the builder produced its records.
    pub const fn success(&self) -> bool {
        self.error.is_none()
    }
}

/// Configuration for a synthetic tick stream.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of ticks to generate.
    pub ticks: usize,
    /// Generator seed.
    pub seed: u64,
    /// Mean milliseconds between ticks.
    pub mean_gap_ms: i64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            ticks: 100_000,
            seed: 42,
            // Roughly a busy BTCUSDT session
            mean_gap_ms: 250,
        }
    }
}

/// Builder names accepted by [`run_builder`].
pub const BUILDERS: &[&str] = &[
    "ohlcv",
    "vwap",
    "buckets",
    "order-flow",
    "delta",
    "bid-ask",
    "profile",
    "footprint",
    "footprint-range",
    "stats",
];

/// Generates a reproducible random-walk tick stream in timestamp order.
pub fn synthetic_ticks(config: &BenchmarkConfig) -> Vec<Tick> {
    let mut state = config.seed.max(1);
    let mut unit = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    // 2024-05-01T00:00:00Z
    let mut at = DateTime::<Utc>::from_timestamp_millis(1_714_521_600_000).unwrap_or_default();
    let mut price = 60_000.0;
    let mut ticks = Vec::with_capacity(config.ticks);
    while ticks.len() < config.ticks {
        price = (price + (unit() - 0.5) * 10.0).max(1.0);
        at += TimeDelta::milliseconds((unit() * 2.0 * config.mean_gap_ms as f64) as i64);
        let side = if unit() < 0.5 { Side::Buy } else { Side::Sell };
        let size = (unit() * 0.5 * 1e4).round() / 1e4;
        if let Ok(tick) = Tick::new("BTCUSDT", side, size, price, at) {
            ticks.push(tick);
        }
    }
    ticks
}

/// Loads `ticks` into the named builder and times result generation.
pub fn run_builder(
    builder: &'static str,
    ticks: &[Tick],
    config: &AggregationConfig,
) -> BenchmarkResult {
    let start = Instant::now();
    let outcome = generate(builder, ticks, config);
    let duration = start.elapsed();

    let (records, error) = match outcome {
        Ok(records) => (records, None),
        Err(e) => (0, Some(e.to_string())),
    };
    BenchmarkResult {
        builder,
        duration,
        ticks: ticks.len() as u64,
        records,
        error,
    }
}

/// Runs the named builder and returns the number of records produced.
pub fn generate(
    builder: &str,
    ticks: &[Tick],
    config: &AggregationConfig,
) -> std::result::Result<usize, Box<dyn std::error::Error>> {
    fn load<B: TickSink>(mut builder: B, ticks: &[Tick]) -> std::result::Result<B, ValidationError> {
        builder.add_ticks(ticks.iter().cloned())?;
        Ok(builder)
    }

    let tf = config.timeframe;
    let count = match builder {
        "ohlcv" => load(OhlcvAggregator::new(), ticks)?.generate_ohlcv(tf)?.len(),
        "vwap" => load(VwapAggregator::new(), ticks)?.generate_vwap(tf)?.len(),
        "buckets" => load(VolumeBucketAggregator::new(), ticks)?
            .generate_volume_buckets(config.bucket_size)?
            .len(),
        "order-flow" => load(OrderFlowAggregator::new(), ticks)?
            .generate_order_flow(tf)?
            .len(),
        "delta" => load(DeltaAggregator::new(), ticks)?.generate_delta(tf)?.len(),
        "bid-ask" => load(BidAskProfileAggregator::new(config.binner()?), ticks)?
            .generate_bid_ask_profiles(tf)?
            .len(),
        "profile" => load(VolumeProfileAggregator::new(config.binner()?), ticks)?
            .generate_profiles(tf, config.value_area_percentage)?
            .len(),
        "footprint" => load(FootprintAggregator::new(config.binner()?), ticks)?
            .generate_footprints(tf)?
            .len(),
        "footprint-range" => load(FootprintAggregator::new(config.binner()?), ticks)?
            .generate_range_footprints(config.range_levels)?
            .len(),
        "stats" => usize::from(
            load(StatsAggregator::new(), ticks)?
                .generate_stats()
                .is_some(),
        ),
        other => return Err(format!("unknown builder: {other}").into()),
    };
    Ok(count)
}

/// Format duration for display.
pub fn format_duration(d: Duration) -> String {
    let micros = d.as_micros();
    if micros >= 1_000_000 {
        format!("{:.2}s", d.as_secs_f64())
    } else if micros >= 1_000 {
        format!("{:.1}ms", micros as f64 / 1_000.0)
    } else {
        format!("{micros}µs")
    }
}

/// Format a rate with a k/M suffix.
pub fn format_rate(per_sec: f64) -> String {
    if per_sec >= 1e6 {
        format!("{:.1}M/s", per_sec / 1e6)
    } else if per_sec >= 1e3 {
        format!("{:.1}k/s", per_sec / 1e3)
    } else {
        format!("{per_sec:.0}/s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_ticks_are_ordered() {
        let config = BenchmarkConfig {
            ticks: 1_000,
            ..Default::default()
        };
        let ticks = synthetic_ticks(&config);
        assert_eq!(ticks.len(), 1_000);
        assert!(ticks.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(synthetic_ticks(&config), ticks);
    }

    #[test]
    fn test_every_builder_runs() {
        let ticks = synthetic_ticks(&BenchmarkConfig {
            ticks: 500,
            ..Default::default()
        });
        let config = AggregationConfig::default();
        for builder in BUILDERS {
            let result = run_builder(builder, &ticks, &config);
            assert!(result.success(), "{builder}: {:?}", result.error);
            assert!(result.records > 0, "{builder}");
        }
        assert!(!run_builder("parquet", &ticks, &config).success());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_micros(500)), "500µs");
        assert_eq!(format_duration(Duration::from_millis(12)), "12.0ms");
        assert_eq!(format_duration(Duration::from_secs(2)), "2.00s");
    }
}
