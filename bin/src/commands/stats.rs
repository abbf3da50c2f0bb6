//! Summary statistics command.

use anyhow::Result;
use tapeflow_lib::prelude::*;
use tracing::warn;

use super::feed;
use crate::input::InputArgs;
use crate::output::{self, OutputArgs};

/// One summary row over every loaded tick; no row when there are none.
pub(crate) fn stats(input: &InputArgs, out: &OutputArgs, config: &AggregationConfig) -> Result<()> {
    let mut builder = StatsAggregator::new().with_threshold(config.large_order_threshold_usd)?;
    feed(&mut builder, input, config)?;

    let summary: Vec<_> = builder.generate_stats().into_iter().collect();
    if summary.is_empty() {
        warn!("no ticks loaded, nothing to summarize");
    }
    output::write(out, &summary)
}
