//! Core types for the tapeflow trade tick aggregation engine.
//!
//! This crate provides the fundamental data structures used throughout tapeflow:
//!
//! - [`Tick`] - A single executed trade with side, size, price and timestamp
//! - [`RawTick`] - Unvalidated trade record as read from tick files
//! - [`Timeframe`] - Clock-aligned resampling window width
//! - [`PriceBinner`] - Price to discrete level mapping
//! - [`AggregationConfig`] - Parameters recognised by the builders
//! - [`DateRange`] - Date range for data selection

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tapeflow/tapeflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod date_range;
mod error;
mod price;
mod tick;
mod timeframe;

pub use config::{
    AggregationConfig, DEFAULT_LARGE_ORDER_THRESHOLD_USD, DEFAULT_VALUE_AREA_PERCENTAGE,
    ValueAreaAdjacency, validate_bucket_size, validate_large_order_threshold,
    validate_range_levels, validate_value_area_percentage,
};
pub use date_range::DateRange;
pub use error::{
    ConfigError, DateRangeError, OrderingError, Result, TapeflowError, TimeframeParseError,
    ValidationError,
};
pub use price::{PRICE_PRECISION, PriceBinner, PriceLevel, bin};
pub use tick::{RawTick, Side, Tick};
pub use timeframe::{TimeUnit, Timeframe};
