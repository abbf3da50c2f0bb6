//! Clock-based partitioning of a time-ordered tick sequence.

use chrono::{DateTime, Utc};
use tapeflow_types::{OrderingError, Tick, Timeframe};
use tracing::warn;

/// A non-empty resampling window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window<'a> {
    /// Window start (inclusive).
    pub start: DateTime<Utc>,
    /// Ticks whose timestamps fall in `[start, start + width)`, in arrival order.
    pub ticks: &'a [Tick],
}

/// Splits ticks into contiguous, clock-aligned windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeResampler {
    timeframe: Timeframe,
}

impl TimeResampler {
    /// Creates a resampler for the given timeframe.
    #[must_use]
    pub const fn new(timeframe: Timeframe) -> Self {
        Self { timeframe }
    }

    /// Returns the timeframe being resampled to.
    #[must_use]
    pub const fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Returns the non-empty windows covering `ticks`, in ascending start order.
    ///
    /// Ticks are not re-sorted; because they arrive in time order every
    /// window is a contiguous sub-slice.
    ///
    /// # Errors
    ///
    /// Returns an error at the first timestamp that is earlier than its predecessor.
    pub fn windows<'a>(&self, ticks: &'a [Tick]) -> Result<Vec<Window<'a>>, OrderingError> {
        let mut windows = Vec::new();
        let Some(first) = ticks.first() else {
            return Ok(windows);
        };

        let mut begin = 0;
        let mut start = self.timeframe.window_start(first.timestamp);
        for index in 1..ticks.len() {
            let previous = ticks[index - 1].timestamp;
            let current = ticks[index].timestamp;
            if current < previous {
                let err = OrderingError {
                    index,
                    previous,
                    current,
                };
                warn!(error = %err, timeframe = %self.timeframe, "cannot resample unordered ticks");
                return Err(err);
            }

            let window_start = self.timeframe.window_start(current);
            if window_start != start {
                windows.push(Window {
                    start,
                    ticks: &ticks[begin..index],
                });
                begin = index;
                start = window_start;
            }
        }
        windows.push(Window {
            start,
            ticks: &ticks[begin..],
        });

        Ok(windows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::tick;
    use chrono::Timelike;
    use tapeflow_types::Side;

    #[test]
    fn test_empty_input() {
        let resampler = TimeResampler::new(Timeframe::MINUTE_1);
        assert!(resampler.windows(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_minute_windows_skip_gaps() {
        let ticks = vec![
            tick(10, 0, 0, 100.0, 1.0, Side::Buy),
            tick(10, 0, 30, 100.0, 2.0, Side::Sell),
            tick(10, 1, 10, 101.0, 1.0, Side::Buy),
            tick(10, 5, 59, 102.0, 1.0, Side::Buy),
        ];
        let windows = TimeResampler::new(Timeframe::MINUTE_1)
            .windows(&ticks)
            .unwrap();

        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].ticks.len(), 2);
        assert_eq!(windows[0].start.minute(), 0);
        assert_eq!(windows[1].start.minute(), 1);
        assert_eq!(windows[2].start.minute(), 5);
        assert_eq!(windows[2].start.second(), 0);
    }

    #[test]
    fn test_hour_window_holds_everything() {
        let ticks = vec![
            tick(10, 0, 0, 100.0, 1.0, Side::Buy),
            tick(10, 59, 59, 100.0, 1.0, Side::Buy),
        ];
        let windows = TimeResampler::new(Timeframe::HOUR_1)
            .windows(&ticks)
            .unwrap();

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].ticks.len(), 2);
        assert_eq!(windows[0].start.hour(), 10);
    }

    #[test]
    fn test_regression_is_an_error() {
        let ticks = vec![
            tick(10, 0, 30, 100.0, 1.0, Side::Buy),
            tick(10, 0, 10, 100.0, 1.0, Side::Buy),
        ];
        let err = TimeResampler::new(Timeframe::MINUTE_1)
            .windows(&ticks)
            .unwrap_err();

        assert_eq!(err.index, 1);
    }
}
