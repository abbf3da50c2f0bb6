//! Price binning into discrete levels.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Decimal places kept when converting a level back to a price.
pub const PRICE_PRECISION: i32 = 8;

/// Minimum slack added before flooring so that prices sitting exactly on a
/// bin edge (e.g. `0.3 / 0.1 = 2.9999999999999996`) land in the bin they name.
const BIN_EPSILON: f64 = 1e-9;

/// Relative slack, in units of `f64::EPSILON`, for large `price / width`
/// ratios where a fixed slack is below one ulp.
const BIN_ULPS: f64 = 4.0;

/// Integer index of a price bin: `floor(price / width)`.
///
/// Comparing indices instead of floating-point bin prices keeps keys exact,
/// so two prices are in the same level iff their indices are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PriceLevel(pub i64);

impl PriceLevel {
    /// Returns the next level up.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the next level down.
    #[must_use]
    pub const fn previous(self) -> Self {
        Self(self.0 - 1)
    }

    /// Returns the number of levels in `[self, other]`, inclusive.
    #[must_use]
    pub const fn span_to(self, other: Self) -> u64 {
        self.0.abs_diff(other.0) + 1
    }
}

/// Maps prices to [`PriceLevel`]s for a fixed bin width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBinner {
    width: f64,
}

impl PriceBinner {
    /// Creates a binner for the given bin width.
    ///
    /// # Errors
    ///
    /// Returns an error if `width` is not finite and positive.
    pub fn new(width: f64) -> Result<Self, ConfigError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(ConfigError::InvalidBinSize(width));
        }
        Ok(Self { width })
    }

    /// Returns the bin width.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Returns the level containing `price`.
    #[must_use]
    pub fn level(&self, price: f64) -> PriceLevel {
        let ratio = price / self.width;
        let slack = BIN_EPSILON.max(ratio.abs() * BIN_ULPS * f64::EPSILON);
        PriceLevel((ratio + slack).floor() as i64)
    }

    /// Returns the lower edge price of `level`, rounded to
    /// [`PRICE_PRECISION`] decimals.
    #[must_use]
    pub fn price_of(&self, level: PriceLevel) -> f64 {
        round_price(level.0 as f64 * self.width)
    }

    /// Returns the binned price of `price`: `floor(price / width) * width`.
    #[must_use]
    pub fn bin(&self, price: f64) -> f64 {
        self.price_of(self.level(price))
    }
}

/// Bins `price` at `width` without constructing a [`PriceBinner`].
///
/// `width` must be positive; callers holding unchecked input should go
/// through [`PriceBinner::new`].
#[must_use]
pub fn bin(price: f64, width: f64) -> f64 {
    PriceBinner { width }.bin(price)
}

fn round_price(price: f64) -> f64 {
    let scale = 10f64.powi(PRICE_PRECISION);
    let rounded = (price * scale).round() / scale;
    // avoid emitting -0.0 for the zero bin
    if rounded == 0.0 { 0.0 } else { rounded }
}
