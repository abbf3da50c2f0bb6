//! Trade tick representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ValidationError;

/// Aggressor side of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buyer lifted the offer.
    Buy,
    /// Seller hit the bid.
    Sell,
}

impl Side {
    /// Returns the side as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }

    /// Returns `+1.0` for buys and `-1.0` for sells.
    #[must_use]
    pub const fn sign(&self) -> f64 {
        match self {
            Self::Buy => 1.0,
            Self::Sell => -1.0,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Side {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" | "b" => Ok(Self::Buy),
            "sell" | "s" => Ok(Self::Sell),
            _ => Err(ValidationError::UnknownSide(s.to_string())),
        }
    }
}

/// A single executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Instrument symbol.
    pub symbol: String,
    /// Aggressor side.
    pub side: Side,
    /// Traded quantity in base units.
    pub size: f64,
    /// Execution price.
    pub price: f64,
    /// Execution time (UTC).
    pub timestamp: DateTime<Utc>,
}

impl Tick {
    /// Creates a validated tick.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is not positive or the size is negative.
    pub fn new(
        symbol: impl Into<String>,
        side: Side,
        size: f64,
        price: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let tick = Self {
            symbol: symbol.into(),
            side,
            size,
            price,
            timestamp,
        };
        tick.validate()?;
        Ok(tick)
    }

    /// Checks the price and size invariants.
    ///
    /// Fields are public, so builders re-check every tick they accept.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is not finite and positive, or the size
    /// is not finite and non-negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(ValidationError::InvalidPrice(self.price));
        }
        if !self.size.is_finite() || self.size < 0.0 {
            return Err(ValidationError::InvalidSize(self.size));
        }
        Ok(())
    }

    /// Returns the traded notional (size × price), i.e. the USD volume.
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.size * self.price
    }

    /// Returns the size signed by aggressor side.
    #[must_use]
    pub fn signed_size(&self) -> f64 {
        self.side.sign() * self.size
    }

    /// Returns true if the buyer was the aggressor.
    #[must_use]
    pub const fn is_buy(&self) -> bool {
        matches!(self.side, Side::Buy)
    }
}

/// Raw trade record as read from tick CSV files, before validation.
///
/// Columns: `timestamp` (milliseconds since epoch), `price`, `volume`
/// (trade size) and `side`. Numeric columns are kept as text so that a
/// malformed value is reported as a [`ValidationError`] rather than a
/// deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTick {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Price as text.
    pub price: String,
    /// Trade size as text.
    pub volume: String,
    /// Side as text, any case.
    pub side: String,
}

impl RawTick {
    /// Parses and validates the record into a [`Tick`].
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric field does not parse, the side is
    /// unknown, the timestamp is out of range, or the tick fails
    /// [`Tick::validate`].
    pub fn into_tick(self, symbol: impl Into<String>) -> Result<Tick, ValidationError> {
        let price = parse_number("price", &self.price)?;
        let size = parse_number("volume", &self.volume)?;
        let side = self.side.parse::<Side>()?;
        let timestamp = DateTime::from_timestamp_millis(self.timestamp)
            .ok_or(ValidationError::InvalidTimestamp(self.timestamp))?;
        Tick::new(symbol, side, size, price, timestamp)
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::Malformed {
            field,
            value: value.to_string(),
        })
}
