//! OHLCV (candlestick) bars over clock windows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tapeflow_types::{Result, Timeframe};
use tracing::debug;

use crate::bar::BarState;
use crate::buffer::impl_tick_sink;
use crate::{TickBuffer, TimeResampler};

/// OHLCV bar (candlestick) data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ohlcv {
    /// Bar open time (start of the window).
    pub timestamp: DateTime<Utc>,
    /// Price of the first trade in the window.
    pub open: f64,
    /// Highest trade price during the window.
    pub high: f64,
    /// Lowest trade price during the window.
    pub low: f64,
    /// Price of the last trade in the window.
    pub close: f64,
    /// Total traded size.
    pub volume: f64,
    /// Number of trades in the bar.
    pub trade_count: u32,
}

impl Ohlcv {
    /// Creates a new OHLCV bar.
    #[must_use]
    pub const fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        trade_count: u32,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            trade_count,
        }
    }

    const fn from_state(timestamp: DateTime<Utc>, state: &BarState) -> Self {
        Self::new(
            timestamp,
            state.open,
            state.high,
            state.low,
            state.close,
            state.size,
            state.trade_count(),
        )
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Returns the body size (|close - open|).
    #[must_use]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Returns true if this is a bullish (green) bar.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Returns true if this is a bearish (red) bar.
    #[must_use]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Returns the typical price ((high + low + close) / 3).
    #[must_use]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// Builds OHLCV bars from buffered ticks.
#[derive(Debug, Clone, Default)]
pub struct OhlcvAggregator {
    buffer: TickBuffer,
}

impl_tick_sink!(OhlcvAggregator);

impl OhlcvAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: TickBuffer::new(),
        }
    }

    /// Generates one bar per non-empty window of `timeframe`.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffered timestamps are not in order.
    pub fn generate_ohlcv(&self, timeframe: Timeframe) -> Result<Vec<Ohlcv>> {
        let windows = TimeResampler::new(timeframe).windows(self.buffer.as_slice())?;
        let bars: Vec<Ohlcv> = windows
            .iter()
            .filter_map(|w| BarState::from_ticks(w.ticks).map(|s| Ohlcv::from_state(w.start, &s)))
            .collect();

        debug!(
            ticks = self.buffer.len(),
            bars = bars.len(),
            %timeframe,
            "generated ohlcv bars"
        );
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TickSink;
    use crate::testing::tick;
    use chrono::{TimeZone, Timelike};
    use tapeflow_types::Side;

    fn create_test_bar() -> Ohlcv {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        Ohlcv::new(timestamp, 1.1000, 1.1050, 1.0980, 1.1020, 1000.0, 500)
    }

    #[test]
    fn test_range_and_body() {
        let bar = create_test_bar();
        assert!((bar.range() - 0.0070).abs() < 1e-10);
        assert!((bar.body() - 0.0020).abs() < 1e-10);
    }

    #[test]
    fn test_bullish_bearish() {
        let bar = create_test_bar();
        assert!(bar.is_bullish());
        assert!(!bar.is_bearish());

        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let bar = Ohlcv::new(timestamp, 1.1020, 1.1050, 1.0980, 1.1000, 1000.0, 500);
        assert!(!bar.is_bullish());
        assert!(bar.is_bearish());
    }

    #[test]
    fn test_typical_price() {
        let bar = create_test_bar();
        let expected = (1.1050 + 1.0980 + 1.1020) / 3.0;
        assert!((bar.typical_price() - expected).abs() < 1e-10);
    }

    #[test]
    fn test_minute_bars() {
        let mut agg = OhlcvAggregator::new();
        agg.add_ticks(vec![
            tick(10, 0, 0, 100.0, 1.0, Side::Buy),
            tick(10, 0, 30, 100.0, 2.0, Side::Sell),
            tick(10, 1, 10, 101.0, 1.0, Side::Buy),
        ])
        .unwrap();

        let bars = agg.generate_ohlcv(Timeframe::MINUTE_1).unwrap();
        assert_eq!(bars.len(), 2);

        let first = bars[0];
        assert_eq!(first.timestamp.minute(), 0);
        assert!((first.open - 100.0).abs() < 1e-10);
        assert!((first.high - 100.0).abs() < 1e-10);
        assert!((first.low - 100.0).abs() < 1e-10);
        assert!((first.close - 100.0).abs() < 1e-10);
        assert!((first.volume - 3.0).abs() < 1e-10);
        assert_eq!(first.trade_count, 2);

        let second = bars[1];
        assert_eq!(second.timestamp.minute(), 1);
        assert_eq!(second.timestamp.second(), 0);
        assert!((second.open - 101.0).abs() < 1e-10);
        assert!((second.close - 101.0).abs() < 1e-10);
        assert!((second.volume - 1.0).abs() < 1e-10);
        assert_eq!(second.trade_count, 1);
    }

    #[test]
    fn test_empty_buffer_yields_no_bars() {
        let agg = OhlcvAggregator::new();
        assert!(agg.generate_ohlcv(Timeframe::HOUR_1).unwrap().is_empty());
    }

    #[test]
    fn test_generate_is_repeatable_and_clear_resets() {
        let mut agg = OhlcvAggregator::new();
        agg.add_tick(tick(10, 0, 0, 100.0, 1.0, Side::Buy)).unwrap();

        let first = agg.generate_ohlcv(Timeframe::MINUTE_1).unwrap();
        let second = agg.generate_ohlcv(Timeframe::MINUTE_1).unwrap();
        assert_eq!(first, second);
        assert_eq!(agg.len(), 1);

        agg.clear();
        assert!(agg.generate_ohlcv(Timeframe::MINUTE_1).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_order_ticks_fail() {
        let mut agg = OhlcvAggregator::new();
        agg.add_ticks(vec![
            tick(10, 1, 0, 100.0, 1.0, Side::Buy),
            tick(10, 0, 0, 100.0, 1.0, Side::Buy),
        ])
        .unwrap();

        assert!(matches!(
            agg.generate_ohlcv(Timeframe::MINUTE_1),
            Err(tapeflow_types::TapeflowError::Ordering(_))
        ));
    }
}
