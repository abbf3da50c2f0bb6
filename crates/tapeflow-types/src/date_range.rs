//! Inclusive calendar date ranges for selecting tick data.

use chrono::{DateTime, NaiveDate, Utc};

use crate::DateRangeError;

/// A range of dates for data selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a date range for a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Creates a range with optional bounds; a missing bound is open.
    ///
    /// # Errors
    ///
    /// Returns an error if both bounds are given and start > end.
    pub fn bounded(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, DateRangeError> {
        Self::new(
            start.unwrap_or(NaiveDate::MIN),
            end.unwrap_or(NaiveDate::MAX),
        )
    }

    /// Returns the total number of days in the range.
    #[must_use]
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Returns true if the range contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Returns true if the UTC date of `timestamp` is inside the range.
    #[must_use]
    pub fn contains_timestamp(&self, timestamp: DateTime<Utc>) -> bool {
        self.contains(timestamp.date_naive())
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
