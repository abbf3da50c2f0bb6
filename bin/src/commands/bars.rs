//! Bar commands: OHLCV, VWAP and volume buckets.

use anyhow::Result;
use tapeflow_lib::prelude::*;
use tracing::info;

use super::feed;
use crate::input::InputArgs;
use crate::output::{self, OutputArgs};

/// Time-windowed OHLCV bars.
pub(crate) fn ohlcv(input: &InputArgs, out: &OutputArgs, config: &AggregationConfig) -> Result<()> {
    let mut builder = OhlcvAggregator::new();
    feed(&mut builder, input, config)?;

    let bars = builder.generate_ohlcv(config.timeframe)?;
    info!(bars = bars.len(), timeframe = %config.timeframe, "generated OHLCV");
    output::write(out, &bars)
}

/// Per-window and cumulative VWAP.
pub(crate) fn vwap(input: &InputArgs, out: &OutputArgs, config: &AggregationConfig) -> Result<()> {
    let mut builder = VwapAggregator::new();
    feed(&mut builder, input, config)?;

    let points = builder.generate_vwap(config.timeframe)?;
    info!(points = points.len(), timeframe = %config.timeframe, "generated VWAP");
    output::write(out, &points)
}

/// Bars closed every `bucket_size` of traded notional.
pub(crate) fn buckets(
    input: &InputArgs,
    out: &OutputArgs,
    config: &AggregationConfig,
) -> Result<()> {
    let mut builder = VolumeBucketAggregator::new();
    feed(&mut builder, input, config)?;

    let buckets = builder.generate_volume_buckets(config.bucket_size)?;
    info!(buckets = buckets.len(), bucket_size = config.bucket_size, "generated volume buckets");
    output::write(out, &buckets)
}
