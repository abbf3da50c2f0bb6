//! Buy versus sell aggressor flow per window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tapeflow_types::{Result, Tick, Timeframe};
use tracing::debug;

use crate::bar::BarState;
use crate::buffer::impl_tick_sink;
use crate::{TickBuffer, TimeResampler};

/// Multiple of the mean trade notional above which a trade is large.
const LARGE_TRADE_MULTIPLE: f64 = 2.0;

/// Order flow over one window. Volumes are notional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderFlowPeriod {
    /// Window start.
    pub timestamp: DateTime<Utc>,
    /// Buy aggressor notional.
    pub buy_volume: f64,
    /// Sell aggressor notional.
    pub sell_volume: f64,
    /// `buy_volume - sell_volume`.
    pub net_flow: f64,
    /// Number of buy trades.
    pub buy_trades: u32,
    /// Number of sell trades.
    pub sell_trades: u32,
    /// Number of trades.
    pub total_trades: u32,
    /// Mean notional per trade.
    pub avg_trade_size: f64,
    /// Trades above twice the mean notional of the whole buffer.
    pub large_trades: u32,
    /// `buy_volume / sell_volume`, with a zero denominator replaced by 1.
    pub imbalance_ratio: f64,
}

impl OrderFlowPeriod {
    fn new(timestamp: DateTime<Utc>, state: &BarState, large_trades: u32) -> Self {
        let total_trades = state.trade_count();
        let denominator = if state.sell_notional == 0.0 {
            1.0
        } else {
            state.sell_notional
        };
        Self {
            timestamp,
            buy_volume: state.buy_notional,
            sell_volume: state.sell_notional,
            net_flow: state.buy_notional - state.sell_notional,
            buy_trades: state.buy_trades,
            sell_trades: state.sell_trades,
            total_trades,
            avg_trade_size: state.notional / f64::from(total_trades),
            large_trades,
            imbalance_ratio: state.buy_notional / denominator,
        }
    }
}

/// Builds order flow periods from buffered ticks.
#[derive(Debug, Clone, Default)]
pub struct OrderFlowAggregator {
    buffer: TickBuffer,
}

impl_tick_sink!(OrderFlowAggregator);

impl OrderFlowAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: TickBuffer::new(),
        }
    }

    /// Returns the notional above which a trade counts as large.
    ///
    /// The threshold is global: twice the mean notional over the whole
    /// buffer. Returns `None` for an empty buffer.
    #[must_use]
    pub fn large_trade_threshold(&self) -> Option<f64> {
        let ticks = self.buffer.as_slice();
        if ticks.is_empty() {
            return None;
        }
        let total: f64 = ticks.iter().map(Tick::notional).sum();
        Some(LARGE_TRADE_MULTIPLE * total / ticks.len() as f64)
    }

    /// Generates one period per non-empty window.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffered timestamps are not in order.
    pub fn generate_order_flow(&self, timeframe: Timeframe) -> Result<Vec<OrderFlowPeriod>> {
        let windows = TimeResampler::new(timeframe).windows(self.buffer.as_slice())?;
        let Some(threshold) = self.large_trade_threshold() else {
            return Ok(Vec::new());
        };

        let periods: Vec<OrderFlowPeriod> = windows
            .iter()
            .filter_map(|w| {
                let state = BarState::from_ticks(w.ticks)?;
                let large = w.ticks.iter().filter(|t| t.notional() > threshold).count();
                Some(OrderFlowPeriod::new(
                    w.start,
                    &state,
                    u32::try_from(large).unwrap_or(u32::MAX),
                ))
            })
            .collect();

        debug!(
            ticks = self.buffer.len(),
            periods = periods.len(),
            threshold,
            %timeframe,
            "generated order flow"
        );
        Ok(periods)
    }
}
