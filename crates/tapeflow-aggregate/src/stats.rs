//! Whole-buffer summary statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tapeflow_types::{
    ConfigError, DEFAULT_LARGE_ORDER_THRESHOLD_USD, Side, Tick, validate_large_order_threshold,
};
use tracing::debug;

use crate::TickBuffer;
use crate::buffer::impl_tick_sink;

/// Price extremes and dispersion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lowest trade price.
    pub min: f64,
    /// Highest trade price.
    pub max: f64,
    /// Sample standard deviation of trade prices; 0 for a single trade.
    pub std: f64,
}

/// Notional totals. Volumes are notional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeStats {
    /// Buy aggressor notional.
    pub total_buy_volume: f64,
    /// Sell aggressor notional.
    pub total_sell_volume: f64,
    /// Mean notional per trade.
    pub avg_trade_size: f64,
    /// Largest single-trade notional.
    pub largest_trade: f64,
}

/// Trade counts by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeDistribution {
    /// Number of buy trades.
    pub buy_trades: u64,
    /// Number of sell trades.
    pub sell_trades: u64,
}

/// Trades whose notional exceeds a fixed threshold, by side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LargeOrders {
    /// Notional a trade must exceed to count.
    pub threshold_usd: f64,
    /// Number of large buys.
    pub buy_orders: u64,
    /// Number of large sells.
    pub sell_orders: u64,
    /// `buy_orders + sell_orders`.
    pub total_large_orders: u64,
    /// Notional of large buys.
    pub large_buy_volume: f64,
    /// Notional of large sells.
    pub large_sell_volume: f64,
}

/// Summary over every buffered tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of ticks.
    pub total_ticks: u64,
    /// Earliest timestamp.
    pub first_timestamp: DateTime<Utc>,
    /// Latest timestamp.
    pub last_timestamp: DateTime<Utc>,
    /// `last_timestamp - first_timestamp` in milliseconds.
    pub time_span_ms: i64,
    /// Notional traded.
    pub total_volume: f64,
    /// Size traded.
    pub total_size: f64,
    /// Arithmetic mean trade price.
    pub avg_price: f64,
    /// Price extremes and dispersion.
    pub price_range: PriceRange,
    /// Notional totals.
    pub volume_stats: VolumeStats,
    /// Trade counts by side.
    pub trade_distribution: TradeDistribution,
    /// Large order breakdown.
    pub large_orders: LargeOrders,
}

/// Computes [`SummaryStats`] from buffered ticks.
#[derive(Debug, Clone)]
pub struct StatsAggregator {
    buffer: TickBuffer,
    large_order_threshold_usd: f64,
}

impl_tick_sink!(StatsAggregator);

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsAggregator {
    /// Creates an empty aggregator with the default large order threshold.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: TickBuffer::new(),
            large_order_threshold_usd: DEFAULT_LARGE_ORDER_THRESHOLD_USD,
        }
    }

    /// Sets the large order threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if `threshold_usd` is not finite and positive.
    pub fn with_threshold(mut self, threshold_usd: f64) -> Result<Self, ConfigError> {
        validate_large_order_threshold(threshold_usd)?;
        self.large_order_threshold_usd = threshold_usd;
        Ok(self)
    }

    /// Returns the large order threshold.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.large_order_threshold_usd
    }

    /// Computes the summary, or `None` for an empty buffer.
    ///
    /// Ticks need not be time-ordered.
    #[must_use]
    pub fn generate_stats(&self) -> Option<SummaryStats> {
        let ticks = self.buffer.as_slice();
        let first = ticks.first()?;
        let threshold = self.large_order_threshold_usd;
        let count = ticks.len() as f64;

        let mut first_timestamp = first.timestamp;
        let mut last_timestamp = first.timestamp;
        let mut price_sum = 0.0;
        let mut total_size = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut largest_trade: f64 = 0.0;
        let mut volume = VolumeStats {
            total_buy_volume: 0.0,
            total_sell_volume: 0.0,
            avg_trade_size: 0.0,
            largest_trade: 0.0,
        };
        let mut distribution = TradeDistribution {
            buy_trades: 0,
            sell_trades: 0,
        };
        let mut large = LargeOrders {
            threshold_usd: threshold,
            buy_orders: 0,
            sell_orders: 0,
            total_large_orders: 0,
            large_buy_volume: 0.0,
            large_sell_volume: 0.0,
        };

        for tick in ticks {
            let notional = tick.notional();
            first_timestamp = first_timestamp.min(tick.timestamp);
            last_timestamp = last_timestamp.max(tick.timestamp);
            price_sum += tick.price;
            total_size += tick.size;
            min = min.min(tick.price);
            max = max.max(tick.price);
            largest_trade = largest_trade.max(notional);

            let is_large = notional > threshold;
            match tick.side {
                Side::Buy => {
                    volume.total_buy_volume += notional;
                    distribution.buy_trades += 1;
                    if is_large {
                        large.buy_orders += 1;
                        large.large_buy_volume += notional;
                    }
                }
                Side::Sell => {
                    volume.total_sell_volume += notional;
                    distribution.sell_trades += 1;
                    if is_large {
                        large.sell_orders += 1;
                        large.large_sell_volume += notional;
                    }
                }
            }
        }

        let total_volume = volume.total_buy_volume + volume.total_sell_volume;
        let avg_price = price_sum / count;
        volume.avg_trade_size = total_volume / count;
        volume.largest_trade = largest_trade;
        large.total_large_orders = large.buy_orders + large.sell_orders;

        let stats = SummaryStats {
            total_ticks: ticks.len() as u64,
            first_timestamp,
            last_timestamp,
            time_span_ms: (last_timestamp - first_timestamp).num_milliseconds(),
            total_volume,
            total_size,
            avg_price,
            price_range: PriceRange {
                min,
                max,
                std: sample_std(ticks, avg_price),
            },
            volume_stats: volume,
            trade_distribution: distribution,
            large_orders: large,
        };

        debug!(
            ticks = stats.total_ticks,
            large_orders = stats.large_orders.total_large_orders,
            threshold,
            "generated summary stats"
        );
        Some(stats)
    }
}

fn sample_std(ticks: &[Tick], mean: f64) -> f64 {
    if ticks.len() < 2 {
        return 0.0;
    }
    let squares: f64 = ticks.iter().map(|t| (t.price - mean).powi(2)).sum();
    (squares / (ticks.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TickSink;
    use crate::testing::tick;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_buffer() {
        assert!(StatsAggregator::new().generate_stats().is_none());
    }

    #[test]
    fn test_summary() {
        let mut agg = StatsAggregator::new();
        agg.add_ticks(vec![
            tick(10, 0, 0, 60_000.0, 2.0, Side::Buy),
            tick(10, 0, 30, 60_010.0, 0.5, Side::Sell),
            tick(10, 1, 0, 60_020.0, 3.0, Side::Sell),
            tick(10, 2, 0, 60_030.0, 0.1, Side::Buy),
        ])
        .unwrap();

        let stats = agg.generate_stats().unwrap();
        assert_eq!(stats.total_ticks, 4);
        assert_eq!(stats.time_span_ms, 120_000);
        assert_relative_eq!(stats.total_size, 5.6, max_relative = 1e-12);
        assert_relative_eq!(stats.avg_price, 60_015.0);
        assert_relative_eq!(stats.price_range.min, 60_000.0);
        assert_relative_eq!(stats.price_range.max, 60_030.0);
        // deviations -15, -5, 5, 15 over n - 1 = 3
        assert_relative_eq!(
            stats.price_range.std,
            (500.0_f64 / 3.0).sqrt(),
            max_relative = 1e-12
        );

        assert_eq!(stats.trade_distribution.buy_trades, 2);
        assert_eq!(stats.trade_distribution.sell_trades, 2);
        assert_relative_eq!(stats.volume_stats.total_buy_volume, 126_003.0, max_relative = 1e-12);
        assert_relative_eq!(stats.volume_stats.total_sell_volume, 210_065.0, max_relative = 1e-12);
        assert_relative_eq!(stats.volume_stats.largest_trade, 180_060.0, max_relative = 1e-12);
        assert_relative_eq!(stats.total_volume, 336_068.0, max_relative = 1e-12);

        assert_eq!(stats.large_orders.buy_orders, 1);
        assert_eq!(stats.large_orders.sell_orders, 1);
        assert_eq!(stats.large_orders.total_large_orders, 2);
        assert_relative_eq!(stats.large_orders.large_buy_volume, 120_000.0);
        assert_relative_eq!(stats.large_orders.large_sell_volume, 180_060.0);
    }

    #[test]
    fn test_single_tick_std_is_zero() {
        let mut agg = StatsAggregator::new();
        agg.add_tick(tick(10, 0, 0, 100.0, 1.0, Side::Buy)).unwrap();
        let stats = agg.generate_stats().unwrap();
        assert_relative_eq!(stats.price_range.std, 0.0);
        assert_eq!(stats.time_span_ms, 0);
    }

    #[test]
    fn test_custom_threshold() {
        let mut agg = StatsAggregator::new().with_threshold(50.0).unwrap();
        agg.add_ticks(vec![
            tick(10, 0, 0, 100.0, 1.0, Side::Buy),
            tick(10, 0, 1, 10.0, 1.0, Side::Sell),
        ])
        .unwrap();
        let stats = agg.generate_stats().unwrap();
        assert_eq!(stats.large_orders.total_large_orders, 1);
        assert_relative_eq!(stats.large_orders.threshold_usd, 50.0);

        assert!(StatsAggregator::new().with_threshold(0.0).is_err());
    }

    #[test]
    fn test_unordered_ticks_are_accepted() {
        let mut agg = StatsAggregator::new();
        agg.add_ticks(vec![
            tick(10, 5, 0, 100.0, 1.0, Side::Buy),
            tick(10, 0, 0, 100.0, 1.0, Side::Buy),
        ])
        .unwrap();
        let stats = agg.generate_stats().unwrap();
        assert_eq!(stats.first_timestamp, agg.ticks()[1].timestamp);
        assert_eq!(stats.time_span_ms, 300_000);
    }
}
