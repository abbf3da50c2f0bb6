//! Trade tick aggregation engine.
//!
//! This is a facade crate that re-exports functionality from the tapeflow
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use tapeflow_lib::prelude::*;
//!
//! let at = |s| Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, s).unwrap();
//! let binner = PriceBinner::new(1.0)?;
//! let mut footprint = FootprintAggregator::new(binner);
//! footprint.add_ticks([
//!     Tick::new("BTCUSDT", Side::Buy, 0.5, 60_000.5, at(0))?,
//!     Tick::new("BTCUSDT", Side::Sell, 0.2, 60_003.0, at(1))?,
//! ])?;
//!
//! let candles = footprint.generate_range_footprints(8)?;
//! assert_eq!(candles[0].level_count(), 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tapeflow/tapeflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use tapeflow_types::*;

// Re-export builders
#[cfg(feature = "aggregate")]
pub use tapeflow_aggregate::{
    BidAskProfile, BidAskProfileAggregator, DeltaAggregator, DeltaPeriod, FootprintAggregator,
    FootprintCandle, FootprintRow, LargeOrders, Ohlcv, OhlcvAggregator, OrderFlowAggregator,
    OrderFlowPeriod, PriceRange, ProfileLevel, StatsAggregator, SummaryStats, TickBuffer,
    TickSink, TimeResampler, TradeDistribution, ValueArea, VolumeBucket, VolumeBucketAggregator,
    VolumeProfile, VolumeProfileAggregator, VolumeStats, VwapAggregator, VwapPoint, Window,
    check_ordering,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use tapeflow_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat, Tabular,
};

/// Prelude module for convenient imports.
///
/// ```
/// use tapeflow_lib::prelude::*;
/// ```
pub mod prelude {
    pub use tapeflow_types::{
        AggregationConfig, DateRange, PriceBinner, RawTick, Result, Side, TapeflowError, Tick,
        Timeframe, ValueAreaAdjacency,
    };

    #[cfg(feature = "aggregate")]
    pub use tapeflow_aggregate::{
        BidAskProfileAggregator, DeltaAggregator, FootprintAggregator, OhlcvAggregator,
        OrderFlowAggregator, StatsAggregator, TickSink, VolumeBucketAggregator,
        VolumeProfileAggregator, VwapAggregator,
    };

    #[cfg(feature = "format")]
    pub use tapeflow_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat, Tabular};
}
