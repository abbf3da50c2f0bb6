//! Price level commands: volume profiles and footprints.

use anyhow::Result;
use tapeflow_lib::prelude::*;
use tracing::info;

use super::{FootprintMode, feed};
use crate::input::InputArgs;
use crate::output::{self, OutputArgs};

/// Volume profile per window with POC and value area.
pub(crate) fn profile(
    input: &InputArgs,
    out: &OutputArgs,
    config: &AggregationConfig,
) -> Result<()> {
    let mut builder =
        VolumeProfileAggregator::new(config.binner()?).with_adjacency(config.value_area_adjacency);
    feed(&mut builder, input, config)?;

    let profiles = builder.generate_profiles(config.timeframe, config.value_area_percentage)?;
    info!(
        profiles = profiles.len(),
        timeframe = %config.timeframe,
        value_area = config.value_area_percentage,
        "generated volume profiles"
    );
    output::write(out, &profiles)
}

/// Footprint candles on clock windows or price ranges.
pub(crate) fn footprint(
    input: &InputArgs,
    out: &OutputArgs,
    config: &AggregationConfig,
    mode: FootprintMode,
) -> Result<()> {
    let mut builder = FootprintAggregator::new(config.binner()?);
    feed(&mut builder, input, config)?;

    let candles = match mode {
        FootprintMode::Time => builder.generate_footprints(config.timeframe)?,
        FootprintMode::Range => builder.generate_range_footprints(config.range_levels)?,
    };
    info!(candles = candles.len(), ?mode, "generated footprints");
    output::write(out, &candles)
}
