//! Footprint candles: OHLC plus a dense per-level bid/ask grid.
//!
//! Two boundary policies share the row construction: clock windows from
//! [`TimeResampler`], and range candles that close as soon as the next
//! tick would push the candle past a fixed number of price levels.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tapeflow_types::{
    PriceBinner, PriceLevel, Result, Side, Tick, Timeframe, validate_range_levels,
};
use tracing::debug;

use crate::bar::BarState;
use crate::buffer::impl_tick_sink;
use crate::{TickBuffer, TimeResampler};

/// Aggressor volume at one price bin of a footprint candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootprintRow {
    /// Lower edge of the bin.
    pub price: f64,
    /// Notional of Sell aggressors hitting the bid.
    pub bid_volume: f64,
    /// Notional of Buy aggressors lifting the ask.
    pub ask_volume: f64,
}

impl FootprintRow {
    const fn empty(price: f64) -> Self {
        Self {
            price,
            bid_volume: 0.0,
            ask_volume: 0.0,
        }
    }

    /// Returns `bid_volume + ask_volume`.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.bid_volume + self.ask_volume
    }
}

/// A footprint candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintCandle {
    /// Timestamp of the last tick.
    pub timestamp: DateTime<Utc>,
    /// Timestamp of the first tick.
    pub open_time: DateTime<Utc>,
    /// First trade price.
    pub open: f64,
    /// Highest trade price.
    pub high: f64,
    /// Lowest trade price.
    pub low: f64,
    /// Last trade price.
    pub close: f64,
    /// `Σ ask_volume + Σ bid_volume`.
    pub total_volume: f64,
    /// `Σ ask_volume - Σ bid_volume`.
    pub delta: f64,
    /// One row per bin from the low bin to the high bin, ascending, with no gaps.
    pub rows: Vec<FootprintRow>,
}

impl FootprintCandle {
    fn from_ticks(ticks: &[Tick], binner: &PriceBinner) -> Option<Self> {
        let state = BarState::from_ticks(ticks)?;

        let mut traded: BTreeMap<PriceLevel, FootprintRow> = BTreeMap::new();
        for tick in ticks {
            let level = binner.level(tick.price);
            let row = traded
                .entry(level)
                .or_insert_with(|| FootprintRow::empty(binner.price_of(level)));
            match tick.side {
                Side::Buy => row.ask_volume += tick.notional(),
                Side::Sell => row.bid_volume += tick.notional(),
            }
        }

        let low = binner.level(state.low);
        let high = binner.level(state.high);
        let rows: Vec<FootprintRow> = (low.0..=high.0)
            .map(PriceLevel)
            .map(|level| {
                traded
                    .get(&level)
                    .copied()
                    .unwrap_or_else(|| FootprintRow::empty(binner.price_of(level)))
            })
            .collect();

        let ask: f64 = rows.iter().map(|r| r.ask_volume).sum();
        let bid: f64 = rows.iter().map(|r| r.bid_volume).sum();
        Some(Self {
            timestamp: state.close_time,
            open_time: state.open_time,
            open: state.open,
            high: state.high,
            low: state.low,
            close: state.close,
            total_volume: ask + bid,
            delta: ask - bid,
            rows,
        })
    }

    /// Returns the number of price levels covered.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the row with the most volume, if any.
    #[must_use]
    pub fn point_of_control(&self) -> Option<&FootprintRow> {
        self.rows
            .iter()
            .reduce(|best, row| if row.total() > best.total() { row } else { best })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeStep {
    Accumulate,
    CloseAndStart,
}

/// The pending range candle: where it starts and the levels it spans.
#[derive(Debug, Clone, Copy)]
struct PendingRange {
    start: usize,
    low: PriceLevel,
    high: PriceLevel,
}

impl PendingRange {
    const fn new(start: usize, level: PriceLevel) -> Self {
        Self {
            start,
            low: level,
            high: level,
        }
    }

    /// Takes the tick at `index` into the candle, or starts a new candle
    /// with it if the span would exceed `limit` levels.
    fn step(&mut self, index: usize, level: PriceLevel, limit: u64) -> RangeStep {
        let low = self.low.min(level);
        let high = self.high.max(level);
        if low.span_to(high) > limit {
            *self = Self::new(index, level);
            RangeStep::CloseAndStart
        } else {
            self.low = low;
            self.high = high;
            RangeStep::Accumulate
        }
    }
}

/// Builds footprint candles from buffered ticks.
#[derive(Debug, Clone)]
pub struct FootprintAggregator {
    buffer: TickBuffer,
    binner: PriceBinner,
}

impl_tick_sink!(FootprintAggregator);

impl FootprintAggregator {
    /// Creates an empty aggregator binning prices with `binner`.
    #[must_use]
    pub const fn new(binner: PriceBinner) -> Self {
        Self {
            buffer: TickBuffer::new(),
            binner,
        }
    }

    /// Returns the price binner.
    #[must_use]
    pub const fn binner(&self) -> PriceBinner {
        self.binner
    }

    /// Generates one candle per non-empty clock window.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffered timestamps are not in order.
    pub fn generate_footprints(&self, timeframe: Timeframe) -> Result<Vec<FootprintCandle>> {
        let windows = TimeResampler::new(timeframe).windows(self.buffer.as_slice())?;
        let candles: Vec<FootprintCandle> = windows
            .iter()
            .filter_map(|w| FootprintCandle::from_ticks(w.ticks, &self.binner))
            .collect();

        debug!(
            ticks = self.buffer.len(),
            candles = candles.len(),
            %timeframe,
            bin = self.binner.width(),
            "generated time footprints"
        );
        Ok(candles)
    }

    /// Generates range candles spanning at most `range_levels` price bins each.
    ///
    /// # Errors
    ///
    /// Returns an error if `range_levels` is less than 2 or the buffered
    /// timestamps are not in order.
    pub fn generate_range_footprints(&self, range_levels: usize) -> Result<Vec<FootprintCandle>> {
        validate_range_levels(range_levels)?;
        self.buffer.ensure_ordered()?;
        let ticks = self.buffer.as_slice();
        let limit = u64::try_from(range_levels).unwrap_or(u64::MAX);

        let mut candles = Vec::new();
        let mut pending: Option<PendingRange> = None;
        for (index, tick) in ticks.iter().enumerate() {
            let level = self.binner.level(tick.price);
            match pending.as_mut() {
                None => pending = Some(PendingRange::new(index, level)),
                Some(range) => {
                    let start = range.start;
                    if range.step(index, level, limit) == RangeStep::CloseAndStart {
                        candles.extend(FootprintCandle::from_ticks(
                            &ticks[start..index],
                            &self.binner,
                        ));
                    }
                }
            }
        }
        if let Some(range) = pending {
            candles.extend(FootprintCandle::from_ticks(&ticks[range.start..], &self.binner));
        }

        debug!(
            ticks = ticks.len(),
            candles = candles.len(),
            range_levels,
            bin = self.binner.width(),
            "generated range footprints"
        );
        Ok(candles)
    }
}
