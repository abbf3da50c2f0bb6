//! Owned tick storage shared by every builder.

use tapeflow_types::{OrderingError, Tick, ValidationError};
use tracing::warn;

/// Append-only tick buffer owned by a single builder.
#[derive(Debug, Clone, Default)]
pub struct TickBuffer {
    ticks: Vec<Tick>,
}

impl TickBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { ticks: Vec::new() }
    }

    /// Appends a tick after re-checking its price and size.
    ///
    /// # Errors
    ///
    /// Returns an error if the tick has a non-positive price or a negative size.
    pub fn push(&mut self, tick: Tick) -> Result<(), ValidationError> {
        if let Err(e) = tick.validate() {
            warn!(error = %e, timestamp = %tick.timestamp, "rejected tick");
            return Err(e);
        }
        self.ticks.push(tick);
        Ok(())
    }

    /// Appends every tick, or none of them if any fails validation.
    ///
    /// # Errors
    ///
    /// Returns the first validation error; the buffer is left unchanged.
    pub fn extend<I>(&mut self, ticks: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = Tick>,
    {
        let incoming: Vec<Tick> = ticks.into_iter().collect();
        if let Some(e) = incoming.iter().find_map(|t| t.validate().err()) {
            warn!(error = %e, batch = incoming.len(), "rejected tick batch");
            return Err(e);
        }
        self.ticks.extend(incoming);
        Ok(())
    }

    /// Removes every tick.
    pub fn clear(&mut self) {
        self.ticks.clear();
    }

    /// Returns the number of buffered ticks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    /// Returns true if no ticks are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Returns the buffered ticks in arrival order.
    #[must_use]
    pub fn as_slice(&self) -> &[Tick] {
        &self.ticks
    }

    /// Checks that timestamps never decrease.
    ///
    /// # Errors
    ///
    /// Returns the first regression found.
    pub fn ensure_ordered(&self) -> Result<(), OrderingError> {
        check_ordering(&self.ticks)
    }
}

/// Checks that `ticks` are in non-decreasing timestamp order.
///
/// # Errors
///
/// Returns the position and timestamps of the first regression.
pub fn check_ordering(ticks: &[Tick]) -> Result<(), OrderingError> {
    for (index, pair) in ticks.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            let err = OrderingError {
                index: index + 1,
                previous: pair[0].timestamp,
                current: pair[1].timestamp,
            };
            warn!(error = %err, "tick timestamps regressed");
            return Err(err);
        }
    }
    Ok(())
}

/// Tick intake shared by all builders: `add_tick`, `add_ticks` and `clear`.
pub trait TickSink {
    /// Returns the builder's buffer.
    fn buffer(&self) -> &TickBuffer;

    /// Returns the builder's buffer mutably.
    fn buffer_mut(&mut self) -> &mut TickBuffer;

    /// Appends a single tick.
    ///
    /// # Errors
    ///
    /// Returns an error if the tick fails validation.
    fn add_tick(&mut self, tick: Tick) -> Result<(), ValidationError> {
        self.buffer_mut().push(tick)
    }

    /// Appends a batch of ticks atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if any tick fails validation.
    fn add_ticks<I>(&mut self, ticks: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = Tick>,
        Self: Sized,
    {
        self.buffer_mut().extend(ticks)
    }

    /// Resets the buffer.
    fn clear(&mut self) {
        self.buffer_mut().clear();
    }

    /// Returns the buffered ticks.
    fn ticks(&self) -> &[Tick] {
        self.buffer().as_slice()
    }

    /// Returns the number of buffered ticks.
    fn len(&self) -> usize {
        self.buffer().len()
    }

    /// Returns true if nothing is buffered.
    fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }
}

/// Implements [`TickSink`] for a builder with a `buffer: TickBuffer` field.
macro_rules! impl_tick_sink {
    ($builder:ty) => {
        impl $crate::TickSink for $builder {
            fn buffer(&self) -> &$crate::TickBuffer {
                &self.buffer
            }

            fn buffer_mut(&mut self) -> &mut $crate::TickBuffer {
                &mut self.buffer
            }
        }
    };
}

pub(crate) use impl_tick_sink;
