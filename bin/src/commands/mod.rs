//! CLI command implementations.

pub(crate) mod bars;
pub(crate) mod flow;
pub(crate) mod levels;
pub(crate) mod stats;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tapeflow_lib::prelude::*;
use tracing::debug;

use crate::input::{self, InputArgs};

/// Value area neighbour selection, as a CLI flag.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum Adjacency {
    /// Next traded level in the sorted profile
    Positional,
    /// Next price bin, counting untraded bins as zero
    Price,
}

impl From<Adjacency> for ValueAreaAdjacency {
    fn from(adjacency: Adjacency) -> Self {
        match adjacency {
            Adjacency::Positional => Self::Positional,
            Adjacency::Price => Self::Price,
        }
    }
}

/// Footprint candle boundary policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FootprintMode {
    /// One candle per clock window
    Time,
    /// A new candle once the price span exceeds the level limit
    Range,
}

/// Validates `config`, then loads the input ticks into `builder`.
fn feed<B: TickSink>(builder: &mut B, input: &InputArgs, config: &AggregationConfig) -> Result<()> {
    config.validate().context("Invalid aggregation parameters")?;
    let ticks = input::load_ticks(input)?;
    builder.add_ticks(ticks)?;
    debug!(ticks = builder.len(), "builder loaded");
    Ok(())
}
