//! Volume-weighted average price, per window and running.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tapeflow_types::{Result, Timeframe};
use tracing::debug;

use crate::bar::BarState;
use crate::buffer::impl_tick_sink;
use crate::{TickBuffer, TimeResampler};

/// One VWAP sample at the close of a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VwapPoint {
    /// Window start.
    pub timestamp: DateTime<Utc>,
    /// Running VWAP: `cumulative_pv / cumulative_volume`.
    pub vwap: f64,
    /// VWAP of this window alone.
    pub period_vwap: f64,
    /// Notional traded in this window.
    pub volume: f64,
    /// Notional traded since the first buffered tick.
    pub cumulative_volume: f64,
    /// Running sum of price × notional.
    pub cumulative_pv: f64,
}

/// Builds a VWAP series from buffered ticks.
#[derive(Debug, Clone, Default)]
pub struct VwapAggregator {
    buffer: TickBuffer,
}

impl_tick_sink!(VwapAggregator);

impl VwapAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: TickBuffer::new(),
        }
    }

    /// Generates one point per window with non-zero notional.
    ///
    /// The cumulative sums run across the whole buffer and are never reset
    /// at window boundaries.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffered timestamps are not in order.
    pub fn generate_vwap(&self, timeframe: Timeframe) -> Result<Vec<VwapPoint>> {
        let windows = TimeResampler::new(timeframe).windows(self.buffer.as_slice())?;

        let mut cumulative_volume = 0.0;
        let mut cumulative_pv = 0.0;
        let mut points = Vec::with_capacity(windows.len());
        for window in &windows {
            let Some(state) = BarState::from_ticks(window.ticks) else {
                continue;
            };
            cumulative_volume += state.notional;
            cumulative_pv += state.price_notional;

            // zero-size prints carry no weight
            if state.notional <= 0.0 || cumulative_volume <= 0.0 {
                continue;
            }
            points.push(VwapPoint {
                timestamp: window.start,
                vwap: cumulative_pv / cumulative_volume,
                period_vwap: state.price_notional / state.notional,
                volume: state.notional,
                cumulative_volume,
                cumulative_pv,
            });
        }

        debug!(
            ticks = self.buffer.len(),
            windows = windows.len(),
            points = points.len(),
            %timeframe,
            "generated vwap"
        );
        Ok(points)
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
    fn test_cumulative_vwap() {
        let mut agg = VwapAggregator::new();
        agg.add_ticks(vec![
            tick(10, 0, 0, 100.0, 1.0, Side::Buy),
            tick(10, 0, 30, 102.0, 1.0, Side::Sell),
            tick(10, 1, 0, 110.0, 2.0, Side::Buy),
        ])
        .unwrap();

        let points = agg.generate_vwap(Timeframe::MINUTE_1).unwrap();
        assert_eq!(points.len(), 2);

        // notionals: 100, 102 | 220
        let first_pv = 100.0 * 100.0 + 102.0 * 102.0;
        assert_relative_eq!(points[0].volume, 202.0);
        assert_relative_eq!(points[0].cumulative_pv, first_pv);
        assert_relative_eq!(points[0].vwap, first_pv / 202.0);
        assert_relative_eq!(points[0].period_vwap, points[0].vwap);

        assert_relative_eq!(points[1].volume, 220.0);
        assert_relative_eq!(points[1].period_vwap, 110.0);
        assert_relative_eq!(points[1].cumulative_volume, 422.0);
        assert_relative_eq!(points[1].vwap, (first_pv + 110.0 * 220.0) / 422.0);
    }

    #[test]
    fn test_zero_volume_window_is_omitted() {
        let mut agg = VwapAggregator::new();
        agg.add_ticks(vec![
            tick(10, 0, 0, 100.0, 0.0, Side::Buy),
            tick(10, 1, 0, 100.0, 1.0, Side::Buy),
        ])
        .unwrap();

        let points = agg.generate_vwap(Timeframe::MINUTE_1).unwrap();
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points[0].vwap, 100.0);
    }

    #[test]
    fn test_empty() {
        let agg = VwapAggregator::new();
        assert!(agg.generate_vwap(Timeframe::MINUTE_1).unwrap().is_empty());
    }
}
