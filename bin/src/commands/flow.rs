//! Order flow commands: order flow, delta and bid/ask profiles.

use anyhow::Result;
use tapeflow_lib::prelude::*;
use tracing::info;

use super::feed;
use crate::input::InputArgs;
use crate::output::{self, OutputArgs};

/// Buy/sell notional, imbalance and large trades per window.
pub(crate) fn order_flow(
    input: &InputArgs,
    out: &OutputArgs,
    config: &AggregationConfig,
) -> Result<()> {
    let mut builder = OrderFlowAggregator::new();
    feed(&mut builder, input, config)?;

    if let Some(threshold) = builder.large_trade_threshold() {
        info!(threshold, "large trade threshold");
    }
    let periods = builder.generate_order_flow(config.timeframe)?;
    info!(periods = periods.len(), timeframe = %config.timeframe, "generated order flow");
    output::write(out, &periods)
}

/// Size delta per window with a running total.
pub(crate) fn delta(input: &InputArgs, out: &OutputArgs, config: &AggregationConfig) -> Result<()> {
    let mut builder = DeltaAggregator::new();
    feed(&mut builder, input, config)?;

    let periods = builder.generate_delta(config.timeframe)?;
    info!(periods = periods.len(), timeframe = %config.timeframe, "generated delta");
    output::write(out, &periods)
}

/// Bid and ask notional per price bin and window.
pub(crate) fn bid_ask(
    input: &InputArgs,
    out: &OutputArgs,
    config: &AggregationConfig,
) -> Result<()> {
    let mut builder = BidAskProfileAggregator::new(config.binner()?);
    feed(&mut builder, input, config)?;

    let profiles = builder.generate_bid_ask_profiles(config.timeframe)?;
    info!(profiles = profiles.len(), timeframe = %config.timeframe, "generated bid/ask profiles");
    output::write(out, &profiles)
}
