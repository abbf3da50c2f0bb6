//! Resampling timeframe definitions.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::TimeframeParseError;

/// Unit of a [`Timeframe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// Seconds.
    Second,
    /// Minutes.
    Minute,
    /// Hours.
    Hour,
    /// Days.
    Day,
}

impl TimeUnit {
    /// Returns the unit length in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u64 {
        match self {
            Self::Second => 1,
            Self::Minute => 60,
            Self::Hour => 3600,
            Self::Day => 86400,
        }
    }

    /// Returns the canonical suffix used when formatting.
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Second => "s",
            Self::Minute => "min",
            Self::Hour => "h",
            Self::Day => "d",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "s" | "sec" | "second" | "seconds" => Some(Self::Second),
            "m" | "t" | "min" | "minute" | "minutes" => Some(Self::Minute),
            "h" | "hour" | "hours" => Some(Self::Hour),
            "d" | "day" | "days" | "daily" => Some(Self::Day),
            _ => None,
        }
    }
}

/// Fixed-width, clock-aligned resampling window.
///
/// Windows are aligned to multiples of the width counted from the Unix
/// epoch, so every width that divides a day is also aligned to midnight UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timeframe {
    count: u32,
    unit: TimeUnit,
}

impl Timeframe {
    /// 1-second windows.
    pub const SECOND_1: Self = Self::of(1, TimeUnit::Second);
    /// 1-minute windows.
    pub const MINUTE_1: Self = Self::of(1, TimeUnit::Minute);
    /// 5-minute windows.
    pub const MINUTE_5: Self = Self::of(5, TimeUnit::Minute);
    /// 15-minute windows.
    pub const MINUTE_15: Self = Self::of(15, TimeUnit::Minute);
    /// 30-minute windows.
    pub const MINUTE_30: Self = Self::of(30, TimeUnit::Minute);
    /// 1-hour windows.
    pub const HOUR_1: Self = Self::of(1, TimeUnit::Hour);
    /// 4-hour windows.
    pub const HOUR_4: Self = Self::of(4, TimeUnit::Hour);
    /// Daily windows.
    pub const DAY_1: Self = Self::of(1, TimeUnit::Day);

    const fn of(count: u32, unit: TimeUnit) -> Self {
        Self { count, unit }
    }

    /// Creates a timeframe of `count` units, or `None` if `count` is zero.
    #[must_use]
    pub const fn new(count: u32, unit: TimeUnit) -> Option<Self> {
        if count == 0 {
            None
        } else {
            Some(Self { count, unit })
        }
    }

    /// Returns the number of units.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Returns the unit.
    #[must_use]
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Returns the window width in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u64 {
        self.count as u64 * self.unit.seconds()
    }

    /// Returns the window width in milliseconds.
    #[must_use]
    pub const fn milliseconds(&self) -> i64 {
        (self.seconds() * 1000) as i64
    }

    /// Returns the window width as a [`TimeDelta`].
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.milliseconds())
    }

    /// Returns the start of the window containing `timestamp`.
    #[must_use]
    pub fn window_start(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        // timestamp_millis floors, so the sub-millisecond part is always >= 0
        let offset_ms = timestamp.timestamp_millis().rem_euclid(self.milliseconds());
        let sub_ms_nanos = i64::from(timestamp.timestamp_subsec_nanos() % 1_000_000);
        timestamp - TimeDelta::milliseconds(offset_ms) - TimeDelta::nanoseconds(sub_ms_nanos)
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Self::MINUTE_1
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.count, self.unit.suffix())
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || TimeframeParseError(s.to_string());
        let trimmed = s.trim();

        // Upper-case M means month in pandas offsets, which has no fixed width.
        if trimmed.ends_with('M') || trimmed.starts_with('M') {
            return Err(err());
        }

        let lower = trimmed.to_lowercase();
        let digits_first = lower.starts_with(|c: char| c.is_ascii_digit());
        let split = if digits_first {
            lower.find(|c: char| !c.is_ascii_digit())
        } else {
            lower.find(|c: char| c.is_ascii_digit())
        }
        .unwrap_or(lower.len());
        let (head, tail) = lower.split_at(split);
        let (count, unit) = if digits_first { (head, tail) } else { (tail, head) };

        let count = if count.is_empty() {
            1
        } else {
            count.parse::<u32>().map_err(|_| err())?
        };
        let unit = TimeUnit::parse(unit.trim()).ok_or_else(err)?;

        Self::new(count, unit).ok_or_else(err)
    }
}

impl TryFrom<String> for Timeframe {
    type Error = TimeframeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(value: Timeframe) -> Self {
        value.to_string()
    }
}
