//! Tick aggregation engine for tapeflow.
//!
//! Every builder owns a [`TickBuffer`] and exposes it through [`TickSink`].
//! Results are computed in one batch by the builder's `generate_*` method:
//!
//! - [`OhlcvAggregator`] - OHLCV bars per clock window
//! - [`VwapAggregator`] - per-window and cumulative VWAP
//! - [`VolumeBucketAggregator`] - bars triggered by traded notional
//! - [`OrderFlowAggregator`] - buy/sell flow, imbalance and large trades
//! - [`DeltaAggregator`] - size delta and cumulative delta
//! - [`BidAskProfileAggregator`] - per-level aggressor volume by side
//! - [`VolumeProfileAggregator`] - volume profile with POC and value area
//! - [`FootprintAggregator`] - time and range footprint candles
//! - [`StatsAggregator`] - whole-buffer summary statistics

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tapeflow/tapeflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod bid_ask;
mod buffer;
mod delta;
mod footprint;
mod ohlcv;
mod order_flow;
mod resample;
mod stats;
mod volume_bucket;
mod volume_profile;
mod vwap;

pub use bid_ask::{BidAskProfile, BidAskProfileAggregator};
pub use buffer::{TickBuffer, TickSink, check_ordering};
pub use delta::{DeltaAggregator, DeltaPeriod};
pub use footprint::{FootprintAggregator, FootprintCandle, FootprintRow};
pub use ohlcv::{Ohlcv, OhlcvAggregator};
pub use order_flow::{OrderFlowAggregator, OrderFlowPeriod};
pub use resample::{TimeResampler, Window};
pub use stats::{
    LargeOrders, PriceRange, StatsAggregator, SummaryStats, TradeDistribution, VolumeStats,
};
pub use volume_bucket::{VolumeBucket, VolumeBucketAggregator};
pub use volume_profile::{ProfileLevel, ValueArea, VolumeProfile, VolumeProfileAggregator};
pub use vwap::{VwapAggregator, VwapPoint};
