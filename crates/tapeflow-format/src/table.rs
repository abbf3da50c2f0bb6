//! Flattening of result records into delimited rows.
//!
//! Records with nested price levels (profiles, footprints) expand to one
//! row per level, repeating the parent fields on every row.

use chrono::{DateTime, Utc};
use tapeflow_aggregate::{
    BidAskProfile, DeltaPeriod, FootprintCandle, Ohlcv, OrderFlowPeriod, SummaryStats,
    VolumeBucket, VolumeProfile, VwapPoint,
};

/// A record that can be written as rows of a fixed header.
pub trait Tabular {
    /// Column names.
    fn header() -> &'static [&'static str];

    /// The record's rows; every row has `header().len()` fields.
    fn rows(&self) -> Vec<Vec<String>>;
}

fn ts(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

macro_rules! row {
    ($($field:expr),* $(,)?) => {
        vec![$($field.to_string()),*]
    };
}

impl Tabular for Ohlcv {
    fn header() -> &'static [&'static str] {
        &["timestamp", "open", "high", "low", "close", "volume", "trade_count"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![row![
            ts(self.timestamp),
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.trade_count,
        ]]
    }
}

impl Tabular for VwapPoint {
    fn header() -> &'static [&'static str] {
        &[
            "timestamp",
            "vwap",
            "period_vwap",
            "volume",
            "cumulative_volume",
            "cumulative_pv",
        ]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![row![
            ts(self.timestamp),
            self.vwap,
            self.period_vwap,
            self.volume,
            self.cumulative_volume,
            self.cumulative_pv,
        ]]
    }
}

impl Tabular for VolumeBucket {
    fn header() -> &'static [&'static str] {
        &[
            "bucket_index",
            "bucket_size",
            "start_timestamp",
            "timestamp",
            "open",
            "high",
            "low",
            "close",
            "total_volume",
            "size",
            "avg_price",
            "buy_volume",
            "sell_volume",
            "net_flow",
            "trade_count",
        ]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![row![
            self.bucket_index,
            self.bucket_size,
            ts(self.start_timestamp),
            ts(self.timestamp),
            self.open,
            self.high,
            self.low,
            self.close,
            self.total_volume,
            self.size,
            self.avg_price,
            self.buy_volume,
            self.sell_volume,
            self.net_flow,
            self.trade_count,
        ]]
    }
}

impl Tabular for OrderFlowPeriod {
    fn header() -> &'static [&'static str] {
        &[
            "timestamp",
            "buy_volume",
            "sell_volume",
            "net_flow",
            "buy_trades",
            "sell_trades",
            "total_trades",
            "avg_trade_size",
            "large_trades",
            "imbalance_ratio",
        ]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![row![
            ts(self.timestamp),
            self.buy_volume,
            self.sell_volume,
            self.net_flow,
            self.buy_trades,
            self.sell_trades,
            self.total_trades,
            self.avg_trade_size,
            self.large_trades,
            self.imbalance_ratio,
        ]]
    }
}

impl Tabular for DeltaPeriod {
    fn header() -> &'static [&'static str] {
        &[
            "timestamp",
            "delta",
            "cumulative_delta",
            "buy_size",
            "sell_size",
            "trade_count",
        ]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![row![
            ts(self.timestamp),
            self.delta,
            self.cumulative_delta,
            self.buy_size,
            self.sell_size,
            self.trade_count,
        ]]
    }
}

impl Tabular for BidAskProfile {
    fn header() -> &'static [&'static str] {
        &["timestamp", "side", "price", "volume"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let at = ts(self.timestamp);
        let bids = self.bid_profile.iter().map(|l| ("bid", l));
        let asks = self.ask_profile.iter().map(|l| ("ask", l));
        asks.chain(bids)
            .map(|(side, level)| row![at, side, level.price, level.volume])
            .collect()
    }
}

impl Tabular for VolumeProfile {
    fn header() -> &'static [&'static str] {
        &[
            "timestamp",
            "price",
            "volume",
            "is_poc",
            "in_value_area",
            "value_area_high",
            "value_area_low",
            "total_volume",
        ]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let at = ts(self.timestamp);
        let va = &self.value_area;
        self.levels
            .iter()
            .map(|level| {
                row![
                    at,
                    level.price,
                    level.volume,
                    level.price == self.poc.price,
                    va.contains(level.price),
                    va.high,
                    va.low,
                    self.total_volume,
                ]
            })
            .collect()
    }
}

impl Tabular for FootprintCandle {
    fn header() -> &'static [&'static str] {
        &[
            "timestamp",
            "open_time",
            "open",
            "high",
            "low",
            "close",
            "total_volume",
            "delta",
            "price",
            "bid_volume",
            "ask_volume",
        ]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let (at, opened) = (ts(self.timestamp), ts(self.open_time));
        self.rows
            .iter()
            .map(|r| {
                row![
                    at,
                    opened,
                    self.open,
                    self.high,
                    self.low,
                    self.close,
                    self.total_volume,
                    self.delta,
                    r.price,
                    r.bid_volume,
                    r.ask_volume,
                ]
            })
            .collect()
    }
}

impl Tabular for SummaryStats {
    fn header() -> &'static [&'static str] {
        &[
            "total_ticks",
            "first_timestamp",
            "last_timestamp",
            "time_span_ms",
            "total_volume",
            "total_size",
            "avg_price",
            "price_min",
            "price_max",
            "price_std",
            "total_buy_volume",
            "total_sell_volume",
            "avg_trade_size",
            "largest_trade",
            "buy_trades",
            "sell_trades",
            "large_order_threshold_usd",
            "large_buy_orders",
            "large_sell_orders",
            "total_large_orders",
            "large_buy_volume",
            "large_sell_volume",
        ]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let (price, volume) = (&self.price_range, &self.volume_stats);
        let (trades, large) = (&self.trade_distribution, &self.large_orders);
        vec![row![
            self.total_ticks,
            ts(self.first_timestamp),
            ts(self.last_timestamp),
            self.time_span_ms,
            self.total_volume,
            self.total_size,
            self.avg_price,
            price.min,
            price.max,
            price.std,
            volume.total_buy_volume,
            volume.total_sell_volume,
            volume.avg_trade_size,
            volume.largest_trade,
            trades.buy_trades,
            trades.sell_trades,
            large.threshold_usd,
            large.buy_orders,
            large.sell_orders,
            large.total_large_orders,
            large.large_buy_volume,
            large.large_sell_volume,
        ]]
    }
}
