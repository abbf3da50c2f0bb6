//! tapeflow CLI - trade tick aggregation.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tapeflow_lib::prelude::*;

mod commands;
mod config;
mod input;
mod logging;
mod output;

use commands::{Adjacency, FootprintMode};
use input::InputArgs;
use output::OutputArgs;

#[derive(Parser)]
#[command(name = "tapeflow")]
#[command(about = "Aggregate trade tick files into bars, order flow, profiles and footprints", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// TOML file with aggregation defaults; flags override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// OHLCV bars per time window
    Ohlcv {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,

        /// Window width (e.g. 30s, 1min, 5min, 1H, 1D)
        #[arg(short, long)]
        timeframe: Option<Timeframe>,
    },

    /// Per-window and cumulative VWAP
    Vwap {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,

        /// Window width
        #[arg(short, long)]
        timeframe: Option<Timeframe>,
    },

    /// Bars closed by traded notional
    Buckets {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,

        /// Notional per bucket (USD)
        #[arg(short, long)]
        bucket_size: Option<f64>,
    },

    /// Buy/sell flow, imbalance and large trades per window
    OrderFlow {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,

        /// Window width
        #[arg(short, long)]
        timeframe: Option<Timeframe>,
    },

    /// Size delta and cumulative delta per window
    Delta {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,

        /// Window width
        #[arg(short, long)]
        timeframe: Option<Timeframe>,
    },

    /// Bid and ask volume per price level and window
    BidAsk {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,

        /// Window width
        #[arg(short, long)]
        timeframe: Option<Timeframe>,

        /// Price bin width
        #[arg(short, long)]
        bin_size: Option<f64>,
    },

    /// Volume profile with point of control and value area
    Profile {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,

        /// Window width
        #[arg(short, long)]
        timeframe: Option<Timeframe>,

        /// Price bin width
        #[arg(short, long)]
        bin_size: Option<f64>,

        /// Value area share of volume, in percent
        #[arg(long)]
        value_area: Option<u8>,

        /// Value area neighbour selection
        #[arg(long, value_enum)]
        adjacency: Option<Adjacency>,
    },

    /// Footprint candles on a clock or a price range
    Footprint {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,

        /// Candle boundary policy
        #[arg(short, long, value_enum, default_value = "time")]
        mode: FootprintMode,

        /// Window width (time mode)
        #[arg(short, long)]
        timeframe: Option<Timeframe>,

        /// Price bin width
        #[arg(short, long)]
        bin_size: Option<f64>,

        /// Maximum price levels per candle (range mode)
        #[arg(short, long)]
        range_levels: Option<usize>,
    },

    /// Summary statistics over every tick
    Stats {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,

        /// Notional above which a trade is a large order (USD)
        #[arg(long)]
        large_order_threshold: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let base = config::load(cli.config.as_deref())?;

    match command {
        Commands::Ohlcv {
            input,
            output,
            timeframe,
        } => {
            let config = config::with_timeframe(base, timeframe);
            commands::bars::ohlcv(&input, &output, &config)
        }
        Commands::Vwap {
            input,
            output,
            timeframe,
        } => {
            let config = config::with_timeframe(base, timeframe);
            commands::bars::vwap(&input, &output, &config)
        }
        Commands::Buckets {
            input,
            output,
            bucket_size,
        } => {
            let mut config = base;
            if let Some(size) = bucket_size {
                config = config.with_bucket_size(size);
            }
            commands::bars::buckets(&input, &output, &config)
        }
        Commands::OrderFlow {
            input,
            output,
            timeframe,
        } => {
            let config = config::with_timeframe(base, timeframe);
            commands::flow::order_flow(&input, &output, &config)
        }
        Commands::Delta {
            input,
            output,
            timeframe,
        } => {
            let config = config::with_timeframe(base, timeframe);
            commands::flow::delta(&input, &output, &config)
        }
        Commands::BidAsk {
            input,
            output,
            timeframe,
            bin_size,
        } => {
            let config = config::with_bin_size(config::with_timeframe(base, timeframe), bin_size);
            commands::flow::bid_ask(&input, &output, &config)
        }
        Commands::Profile {
            input,
            output,
            timeframe,
            bin_size,
            value_area,
            adjacency,
        } => {
            let mut config =
                config::with_bin_size(config::with_timeframe(base, timeframe), bin_size);
            if let Some(percentage) = value_area {
                config = config.with_value_area_percentage(percentage);
            }
            if let Some(adjacency) = adjacency {
                config = config.with_value_area_adjacency(adjacency.into());
            }
            commands::levels::profile(&input, &output, &config)
        }
        Commands::Footprint {
            input,
            output,
            mode,
            timeframe,
            bin_size,
            range_levels,
        } => {
            let mut config =
                config::with_bin_size(config::with_timeframe(base, timeframe), bin_size);
            if let Some(levels) = range_levels {
                config = config.with_range_levels(levels);
            }
            commands::levels::footprint(&input, &output, &config, mode)
        }
        Commands::Stats {
            input,
            output,
            large_order_threshold,
        } => {
            let mut config = base;
            if let Some(threshold) = large_order_threshold {
                config = config.with_large_order_threshold(threshold);
            }
            commands::stats::stats(&input, &output, &config)
        }
    }
}
