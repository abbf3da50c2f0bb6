//! Aggregation parameters shared by the builders and the CLI.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, PriceBinner, Timeframe};

/// Default value area percentage.
pub const DEFAULT_VALUE_AREA_PERCENTAGE: u8 = 70;

/// Default notional above which a trade counts as a large order.
pub const DEFAULT_LARGE_ORDER_THRESHOLD_USD: f64 = 100_000.0;

/// Neighbour selection used when growing a value area outward from the POC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueAreaAdjacency {
    /// The next traded level in the sorted profile, however many bins away.
    #[default]
    Positional,
    /// The next bin by price; untraded bins contribute zero volume.
    Price,
}

/// Parameters recognised by the aggregation builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Resampling window width.
    pub timeframe: Timeframe,
    /// Price bin width.
    pub price_bin_size: f64,
    /// Notional per volume bucket.
    pub bucket_size: f64,
    /// Maximum distinct price bins per range footprint candle.
    pub range_levels: usize,
    /// Share of profile volume the value area must hold, in percent.
    pub value_area_percentage: u8,
    /// Value area neighbour selection.
    pub value_area_adjacency: ValueAreaAdjacency,
    /// Notional above which a trade is a large order.
    pub large_order_threshold_usd: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::MINUTE_1,
            price_bin_size: 1.0,
            bucket_size: 1000.0,
            range_levels: 8,
            value_area_percentage: DEFAULT_VALUE_AREA_PERCENTAGE,
            value_area_adjacency: ValueAreaAdjacency::Positional,
            large_order_threshold_usd: DEFAULT_LARGE_ORDER_THRESHOLD_USD,
        }
    }
}

impl AggregationConfig {
    /// Sets the resampling timeframe.
    #[must_use]
    pub const fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = timeframe;
        self
    }

    /// Sets the price bin width.
    #[must_use]
    pub const fn with_price_bin_size(mut self, size: f64) -> Self {
        self.price_bin_size = size;
        self
    }

    /// Sets the volume bucket size.
    #[must_use]
    pub const fn with_bucket_size(mut self, size: f64) -> Self {
        self.bucket_size = size;
        self
    }

    /// Sets the range candle level limit.
    #[must_use]
    pub const fn with_range_levels(mut self, levels: usize) -> Self {
        self.range_levels = levels;
        self
    }

    /// Sets the value area percentage.
    #[must_use]
    pub const fn with_value_area_percentage(mut self, percentage: u8) -> Self {
        self.value_area_percentage = percentage;
        self
    }

    /// Sets the value area neighbour selection.
    #[must_use]
    pub const fn with_value_area_adjacency(mut self, adjacency: ValueAreaAdjacency) -> Self {
        self.value_area_adjacency = adjacency;
        self
    }

    /// Sets the large order threshold.
    #[must_use]
    pub const fn with_large_order_threshold(mut self, threshold_usd: f64) -> Self {
        self.large_order_threshold_usd = threshold_usd;
        self
    }

    /// Returns a binner for the configured bin width.
    ///
    /// # Errors
    ///
    /// Returns an error if the bin width is not positive.
    pub fn binner(&self) -> Result<PriceBinner, ConfigError> {
        PriceBinner::new(self.price_bin_size)
    }

    /// Checks every parameter.
    ///
    /// # Errors
    ///
    /// Returns the first parameter found out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.binner()?;
        validate_bucket_size(self.bucket_size)?;
        validate_range_levels(self.range_levels)?;
        validate_value_area_percentage(self.value_area_percentage)?;
        validate_large_order_threshold(self.large_order_threshold_usd)?;
        Ok(())
    }
}

/// Checks a volume bucket size.
///
/// # Errors
///
/// Returns an error if `size` is not finite and positive.
pub fn validate_bucket_size(size: f64) -> Result<(), ConfigError> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidBucketSize(size))
    }
}

/// Checks a range candle level limit.
///
/// # Errors
///
/// Returns an error if `levels` is less than 2.
pub const fn validate_range_levels(levels: usize) -> Result<(), ConfigError> {
    if levels > 1 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRangeLevels(levels))
    }
}

/// Checks a value area percentage.
///
/// # Errors
///
/// Returns an error if `percentage` is outside `1..=100`.
pub const fn validate_value_area_percentage(percentage: u8) -> Result<(), ConfigError> {
    if matches!(percentage, 1..=100) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValueAreaPercentage(percentage))
    }
}

/// Checks a large order threshold.
///
/// # Errors
///
/// Returns an error if `threshold` is not finite and positive.
pub fn validate_large_order_threshold(threshold: f64) -> Result<(), ConfigError> {
    if threshold.is_finite() && threshold > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidLargeOrderThreshold(threshold))
    }
}
