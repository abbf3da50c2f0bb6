//! Per-level aggressor volume split by side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tapeflow_types::{PriceBinner, Result, Side, Timeframe};
use tracing::debug;

use crate::buffer::impl_tick_sink;
use crate::volume_profile::{descending_levels, level_volumes};
use crate::{ProfileLevel, TickBuffer, TimeResampler};

/// Bid and ask volume by price level for one window.
///
/// Buy aggressor volume is kept under `bid_profile` and Sell aggressor
/// volume under `ask_profile`. Footprint rows use the opposite split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidAskProfile {
    /// Window start.
    pub timestamp: DateTime<Utc>,
    /// Buy aggressor notional per level, highest price first.
    pub bid_profile: Vec<ProfileLevel>,
    /// Sell aggressor notional per level, highest price first.
    pub ask_profile: Vec<ProfileLevel>,
}

/// Builds bid/ask profiles from buffered ticks.
#[derive(Debug, Clone)]
pub struct BidAskProfileAggregator {
    buffer: TickBuffer,
    binner: PriceBinner,
}

impl_tick_sink!(BidAskProfileAggregator);

impl BidAskProfileAggregator {
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

    /// Generates one profile pair per non-empty window.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffered timestamps are not in order.
    pub fn generate_bid_ask_profiles(&self, timeframe: Timeframe) -> Result<Vec<BidAskProfile>> {
        let windows = TimeResampler::new(timeframe).windows(self.buffer.as_slice())?;

        let profiles: Vec<BidAskProfile> = windows
            .iter()
            .map(|w| {
                let side = |side: Side| {
                    let levels =
                        level_volumes(&self.binner, w.ticks.iter().filter(|t| t.side == side));
                    descending_levels(&self.binner, &levels)
                };
                BidAskProfile {
                    timestamp: w.start,
                    bid_profile: side(Side::Buy),
                    ask_profile: side(Side::Sell),
                }
            })
            .collect();

        debug!(
            ticks = self.buffer.len(),
            profiles = profiles.len(),
            %timeframe,
            "generated bid/ask profiles"
        );
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TickSink;
    use crate::testing::tick;
    use approx::assert_relative_eq;

    #[test]
    fn test_sides_are_split_and_sorted() {
        let mut agg = BidAskProfileAggregator::new(PriceBinner::new(1.0).unwrap());
        agg.add_ticks(vec![
            tick(10, 0, 0, 100.2, 1.0, Side::Buy),
            tick(10, 0, 1, 101.7, 2.0, Side::Buy),
            tick(10, 0, 2, 100.9, 1.0, Side::Sell),
            tick(10, 0, 3, 100.0, 3.0, Side::Buy),
        ])
        .unwrap();

        let profiles = agg.generate_bid_ask_profiles(Timeframe::MINUTE_1).unwrap();
        assert_eq!(profiles.len(), 1);

        let bid = &profiles[0].bid_profile;
        assert_eq!(bid.len(), 2);
        assert_relative_eq!(bid[0].price, 101.0);
        assert_relative_eq!(bid[0].volume, 203.4, max_relative = 1e-12);
        assert_relative_eq!(bid[1].price, 100.0);
        assert_relative_eq!(bid[1].volume, 400.2, max_relative = 1e-12);

        let ask = &profiles[0].ask_profile;
        assert_eq!(ask.len(), 1);
        assert_relative_eq!(ask[0].price, 100.0);
        assert_relative_eq!(ask[0].volume, 100.9, max_relative = 1e-12);
    }

    #[test]
    fn test_one_sided_window_has_empty_side() {
        let mut agg = BidAskProfileAggregator::new(PriceBinner::new(1.0).unwrap());
        agg.add_tick(tick(10, 0, 0, 100.0, 1.0, Side::Sell)).unwrap();

        let profiles = agg.generate_bid_ask_profiles(Timeframe::MINUTE_1).unwrap();
        assert!(profiles[0].bid_profile.is_empty());
        assert_eq!(profiles[0].ask_profile.len(), 1);
    }

    #[test]
    fn test_buy_tick_lands_in_bid_profile() {
        let mut agg = BidAskProfileAggregator::new(PriceBinner::new(1.0).unwrap());
        agg.add_tick(tick(10, 0, 0, 100.0, 1.0, Side::Buy)).unwrap();

        let profiles = agg.generate_bid_ask_profiles(Timeframe::MINUTE_1).unwrap();
        assert_eq!(profiles.len(), 1);
        assert!(profiles[0].ask_profile.is_empty());
        assert_eq!(
            profiles[0].bid_profile,
            vec![ProfileLevel {
                price: 100.0,
                volume: 100.0,
            }]
        );
    }
}
