//! Bars triggered by cumulative traded notional instead of time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tapeflow_types::{Result, Tick, validate_bucket_size};
use tracing::debug;

use crate::bar::BarState;
use crate::buffer::impl_tick_sink;
use crate::TickBuffer;

/// A bar closed by traded notional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeBucket {
    /// `floor(cumulative notional / bucket_size)` shared by every tick in the bucket.
    pub bucket_index: u64,
    /// Configured notional per bucket.
    pub bucket_size: f64,
    /// Timestamp of the first tick.
    pub start_timestamp: DateTime<Utc>,
    /// Timestamp of the last tick.
    pub timestamp: DateTime<Utc>,
    /// First trade price.
    pub open: f64,
    /// Highest trade price.
    pub high: f64,
    /// Lowest trade price.
    pub low: f64,
    /// Last trade price.
    pub close: f64,
    /// Notional traded in the bucket.
    pub total_volume: f64,
    /// Size traded in the bucket.
    pub size: f64,
    /// Notional-weighted average price.
    pub avg_price: f64,
    /// Buy aggressor notional.
    pub buy_volume: f64,
    /// Sell aggressor notional.
    pub sell_volume: f64,
    /// `buy_volume - sell_volume`.
    pub net_flow: f64,
    /// Number of trades.
    pub trade_count: u32,
}

impl VolumeBucket {
    fn from_ticks(bucket_index: u64, bucket_size: f64, ticks: &[Tick]) -> Option<Self> {
        let state = BarState::from_ticks(ticks)?;
        let avg_price = if state.notional > 0.0 {
            state.price_notional / state.notional
        } else {
            state.close
        };
        Some(Self {
            bucket_index,
            bucket_size,
            start_timestamp: state.open_time,
            timestamp: state.close_time,
            open: state.open,
            high: state.high,
            low: state.low,
            close: state.close,
            total_volume: state.notional,
            size: state.size,
            avg_price,
            buy_volume: state.buy_notional,
            sell_volume: state.sell_notional,
            net_flow: state.buy_notional - state.sell_notional,
            trade_count: state.trade_count(),
        })
    }
}

/// Builds volume buckets from buffered ticks.
#[derive(Debug, Clone, Default)]
pub struct VolumeBucketAggregator {
    buffer: TickBuffer,
}

impl_tick_sink!(VolumeBucketAggregator);

impl VolumeBucketAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: TickBuffer::new(),
        }
    }

    /// Partitions the buffer by cumulative notional.
    ///
    /// A tick is never split: it belongs to the bucket index computed after
    /// adding its own notional, so a bucket can exceed `bucket_size` by up
    /// to one tick.
    ///
    /// # Errors
    ///
    /// Returns an error if `bucket_size` is not positive or the buffered
    /// timestamps are not in order.
    pub fn generate_volume_buckets(&self, bucket_size: f64) -> Result<Vec<VolumeBucket>> {
        validate_bucket_size(bucket_size)?;
        let ticks = self.buffer.as_slice();
        self.buffer.ensure_ordered()?;

        let mut buckets = Vec::new();
        let mut cumulative = 0.0;
        let mut begin = 0;
        let mut current: Option<u64> = None;
        for (i, tick) in ticks.iter().enumerate() {
            cumulative += tick.notional();
            let index = (cumulative / bucket_size).floor() as u64;
            match current {
                Some(open) if open != index => {
                    buckets.extend(VolumeBucket::from_ticks(open, bucket_size, &ticks[begin..i]));
                    begin = i;
                    current = Some(index);
                }
                Some(_) => {}
                None => current = Some(index),
            }
        }
        if let Some(open) = current {
            buckets.extend(VolumeBucket::from_ticks(open, bucket_size, &ticks[begin..]));
        }

        debug!(
            ticks = ticks.len(),
            buckets = buckets.len(),
            bucket_size,
            "generated volume buckets"
        );
        Ok(buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TickSink;
    use crate::testing::tick;
    use approx::assert_relative_eq;
    use tapeflow_types::Side;

    #[test]
    fn test_bucket_closes_once_threshold_crossed() {
        let mut agg = VolumeBucketAggregator::new();
        agg.add_ticks(vec![
            tick(10, 0, 0, 10.0, 10.0, Side::Buy),
            tick(10, 0, 1, 10.0, 6.0, Side::Sell),
            tick(10, 0, 2, 10.0, 5.0, Side::Buy),
            tick(10, 0, 3, 12.0, 5.0, Side::Sell),
        ])
        .unwrap();

        // cumulative notional: 100, 160, 210, 270
        let buckets = agg.generate_volume_buckets(150.0).unwrap();
        assert_eq!(buckets.len(), 2);

        let first = &buckets[0];
        assert_eq!(first.bucket_index, 0);
        assert_eq!(first.trade_count, 1);
        assert_relative_eq!(first.total_volume, 100.0);

        let second = &buckets[1];
        assert_eq!(second.bucket_index, 1);
        assert_eq!(second.trade_count, 3);
        assert_relative_eq!(second.total_volume, 170.0);
        assert_relative_eq!(second.buy_volume, 50.0);
        assert_relative_eq!(second.sell_volume, 120.0);
        assert_relative_eq!(second.net_flow, -70.0);
        assert_relative_eq!(second.high, 12.0);
        assert_relative_eq!(second.close, 12.0);
        assert_relative_eq!(second.size, 16.0);
        assert_eq!(second.start_timestamp, agg.ticks()[1].timestamp);
        assert_eq!(second.timestamp, agg.ticks()[3].timestamp);
    }

    #[test]
    fn test_large_tick_skips_indices_without_splitting() {
        let mut agg = VolumeBucketAggregator::new();
        agg.add_ticks(vec![
            tick(10, 0, 0, 100.0, 0.5, Side::Buy),
            tick(10, 0, 1, 100.0, 10.0, Side::Buy),
        ])
        .unwrap();

        let buckets = agg.generate_volume_buckets(100.0).unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].bucket_index, 0);
        assert_eq!(buckets[1].bucket_index, 10);
        assert_relative_eq!(buckets[1].total_volume, 1000.0);
    }

    #[test]
    fn test_total_volume_is_conserved() {
        let mut agg = VolumeBucketAggregator::new();
        for s in 0..50 {
            agg.add_tick(tick(10, 0, s, 100.0 + f64::from(s), 0.37, Side::Sell))
                .unwrap();
        }
        let expected: f64 = agg.ticks().iter().map(Tick::notional).sum();
        let buckets = agg.generate_volume_buckets(250.0).unwrap();
        let total: f64 = buckets.iter().map(|b| b.total_volume).sum();
        assert_relative_eq!(total, expected, max_relative = 1e-12);
        assert_eq!(buckets.iter().map(|b| b.trade_count).sum::<u32>(), 50);
    }

    #[test]
    fn test_invalid_bucket_size() {
        let agg = VolumeBucketAggregator::new();
        assert!(agg.generate_volume_buckets(0.0).is_err());
        assert!(agg.generate_volume_buckets(-5.0).is_err());
    }

    #[test]
    fn test_unordered_ticks_fail() {
        let mut agg = VolumeBucketAggregator::new();
        agg.add_ticks(vec![
            tick(10, 0, 5, 100.0, 1.0, Side::Buy),
            tick(10, 0, 0, 100.0, 1.0, Side::Buy),
        ])
        .unwrap();
        assert!(agg.generate_volume_buckets(100.0).is_err());
    }
}
