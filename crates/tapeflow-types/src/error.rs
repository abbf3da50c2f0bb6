//! Error types for tapeflow.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias for tapeflow operations.
pub type Result<T> = std::result::Result<T, TapeflowError>;

/// Errors that can occur while ingesting ticks or generating aggregates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TapeflowError {
    /// A tick failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Tick timestamps regressed inside a buffer.
    #[error(transparent)]
    Ordering(#[from] OrderingError),

    /// An aggregation parameter is out of range.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error for ticks with malformed or out-of-range fields.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Price is zero, negative or not a number.
    #[error("Invalid price: {0} (must be finite and > 0)")]
    InvalidPrice(f64),

    /// Size is negative or not a number.
    #[error("Invalid size: {0} (must be finite and >= 0)")]
    InvalidSize(f64),

    /// Side is neither buy nor sell.
    #[error("Unknown side: '{0}'")]
    UnknownSide(String),

    /// A numeric field could not be parsed.
    #[error("Malformed {field}: '{value}'")]
    Malformed {
        /// Name of the offending field.
        field: &'static str,
        /// Raw value as received.
        value: String,
    },

    /// Timestamp is outside the representable range.
    #[error("Invalid timestamp: {0} ms")]
    InvalidTimestamp(i64),
}

/// Error raised when a tick's timestamp is earlier than its predecessor.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Timestamp regression at tick {index}: {current} < {previous}")]
pub struct OrderingError {
    /// Position of the offending tick in the buffer.
    pub index: usize,
    /// Timestamp of the preceding tick.
    pub previous: DateTime<Utc>,
    /// Timestamp of the offending tick.
    pub current: DateTime<Utc>,
}

/// Error for invalid aggregation parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Price bin width is not a positive finite number.
    #[error("Invalid price bin size: {0} (must be > 0)")]
    InvalidBinSize(f64),

    /// Volume bucket size is not a positive finite number.
    #[error("Invalid bucket size: {0} (must be > 0)")]
    InvalidBucketSize(f64),

    /// Range candles need at least two price levels.
    #[error("Invalid range levels: {0} (must be > 1)")]
    InvalidRangeLevels(usize),

    /// Value area percentage outside 1..=100.
    #[error("Invalid value area percentage: {0} (must be in 1..=100)")]
    InvalidValueAreaPercentage(u8),

    /// Large order threshold is not a positive finite number.
    #[error("Invalid large order threshold: {0} (must be > 0)")]
    InvalidLargeOrderThreshold(f64),

    /// Timeframe string could not be parsed.
    #[error(transparent)]
    Timeframe(#[from] TimeframeParseError),
}

/// Error returned when parsing an invalid timeframe string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid timeframe '{0}', expected e.g. 30s, 1min, 5min, 1H, 4h, 1D")]
pub struct TimeframeParseError(pub(crate) String);

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: chrono::NaiveDate,
        /// The end date.
        end: chrono::NaiveDate,
    },
}
