//! Size delta per window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tapeflow_types::{Result, Timeframe};
use tracing::debug;

use crate::bar::BarState;
use crate::buffer::impl_tick_sink;
use crate::{TickBuffer, TimeResampler};

/// Aggressor delta over one window, in size units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaPeriod {
    /// Window start.
    pub timestamp: DateTime<Utc>,
    /// `buy_size - sell_size`.
    pub delta: f64,
    /// Running delta since the first buffered tick.
    pub cumulative_delta: f64,
    /// Buy aggressor size.
    pub buy_size: f64,
    /// Sell aggressor size.
    pub sell_size: f64,
    /// Number of trades.
    pub trade_count: u32,
}

/// Builds delta periods from buffered ticks.
#[derive(Debug, Clone, Default)]
pub struct DeltaAggregator {
    buffer: TickBuffer,
}

impl_tick_sink!(DeltaAggregator);

impl DeltaAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: TickBuffer::new(),
        }
    }

    /// Generates one period per non-empty window.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffered timestamps are not in order.
    pub fn generate_delta(&self, timeframe: Timeframe) -> Result<Vec<DeltaPeriod>> {
        let windows = TimeResampler::new(timeframe).windows(self.buffer.as_slice())?;

        let mut cumulative_delta = 0.0;
        let mut periods = Vec::with_capacity(windows.len());
        for window in &windows {
            let Some(state) = BarState::from_ticks(window.ticks) else {
                continue;
            };
            let delta = state.buy_size - state.sell_size;
            cumulative_delta += delta;
            periods.push(DeltaPeriod {
                timestamp: window.start,
                delta,
                cumulative_delta,
                buy_size: state.buy_size,
                sell_size: state.sell_size,
                trade_count: state.trade_count(),
            });
        }

        debug!(
            ticks = self.buffer.len(),
            periods = periods.len(),
            %timeframe,
            "generated delta"
        );
        Ok(periods)
    }
}
