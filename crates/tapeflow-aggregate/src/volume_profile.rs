//! Volume profile per window with point of control and value area.
//!
//! Levels are keyed by [`PriceLevel`] in a `BTreeMap`, so iteration order
//! is by price and never depends on hashing.

use std::collections::BTreeMap;
use std::iter::{Peekable, successors};
use std::ops::Bound;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tapeflow_types::{
    PriceBinner, PriceLevel, Result, Tick, Timeframe, ValueAreaAdjacency,
    validate_value_area_percentage,
};
use tracing::debug;

use crate::buffer::impl_tick_sink;
use crate::{TickBuffer, TimeResampler};

/// Notional traded at one price bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileLevel {
    /// Lower edge of the bin.
    pub price: f64,
    /// Notional traded in the bin.
    pub volume: f64,
}

/// Price band around the POC holding the target share of volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueArea {
    /// Highest bin in the value area.
    pub high: f64,
    /// Lowest bin in the value area.
    pub low: f64,
    /// Target share of total volume, in percent.
    pub percentage: u8,
    /// Notional actually included.
    pub volume: f64,
}

impl ValueArea {
    /// Returns true if `price` lies within `[low, high]`.
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        (self.low..=self.high).contains(&price)
    }
}

/// Volume profile for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeProfile {
    /// Window start.
    pub timestamp: DateTime<Utc>,
    /// Traded bins, highest price first.
    pub levels: Vec<ProfileLevel>,
    /// Point of control: the bin with the most volume.
    pub poc: ProfileLevel,
    /// Value area around the POC.
    pub value_area: ValueArea,
    /// Notional traded in the window.
    pub total_volume: f64,
}

/// Sums notional per price level.
pub(crate) fn level_volumes<'a, I>(binner: &PriceBinner, ticks: I) -> BTreeMap<PriceLevel, f64>
where
    I: IntoIterator<Item = &'a Tick>,
{
    let mut levels = BTreeMap::new();
    for tick in ticks {
        *levels.entry(binner.level(tick.price)).or_insert(0.0) += tick.notional();
    }
    levels
}

/// Converts a level map to output rows, highest price first.
pub(crate) fn descending_levels(
    binner: &PriceBinner,
    levels: &BTreeMap<PriceLevel, f64>,
) -> Vec<ProfileLevel> {
    levels
        .iter()
        .rev()
        .map(|(&level, &volume)| ProfileLevel {
            price: binner.price_of(level),
            volume,
        })
        .collect()
}

/// Returns the level with the most volume; the highest price wins ties.
fn point_of_control(levels: &BTreeMap<PriceLevel, f64>) -> Option<(PriceLevel, f64)> {
    let mut best: Option<(PriceLevel, f64)> = None;
    for (&level, &volume) in levels.iter().rev() {
        if best.is_none_or(|(_, v)| volume > v) {
            best = Some((level, volume));
        }
    }
    best
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pick {
    Above,
    Below,
    Done,
}

impl Pick {
    fn choose(above: Option<f64>, below: Option<f64>) -> Self {
        match (above, below) {
            (None, None) => Self::Done,
            (None, Some(_)) => Self::Below,
            (Some(_), None) => Self::Above,
            (Some(a), Some(b)) if b > a => Self::Below,
            (Some(_), Some(_)) => Self::Above,
        }
    }
}

struct Expansion {
    low: PriceLevel,
    high: PriceLevel,
    volume: f64,
}

/// Grows the value area from the POC one neighbour at a time until
/// `target` is reached or both sides run out.
fn expand<A, B>(poc: (PriceLevel, f64), target: f64, above: A, below: B) -> Expansion
where
    A: Iterator<Item = (PriceLevel, f64)>,
    B: Iterator<Item = (PriceLevel, f64)>,
{
    let mut above: Peekable<A> = above.peekable();
    let mut below: Peekable<B> = below.peekable();
    let mut area = Expansion {
        low: poc.0,
        high: poc.0,
        volume: poc.1,
    };

    while area.volume < target {
        let pick = Pick::choose(
            above.peek().map(|&(_, v)| v),
            below.peek().map(|&(_, v)| v),
        );
        let next = match pick {
            Pick::Above => above.next(),
            Pick::Below => below.next(),
            Pick::Done => None,
        };
        let Some((level, volume)) = next else {
            break;
        };
        area.volume += volume;
        area.low = area.low.min(level);
        area.high = area.high.max(level);
    }
    area
}

fn value_area(
    levels: &BTreeMap<PriceLevel, f64>,
    poc: (PriceLevel, f64),
    target: f64,
    adjacency: ValueAreaAdjacency,
) -> Expansion {
    match adjacency {
        ValueAreaAdjacency::Positional => expand(
            poc,
            target,
            levels
                .range((Bound::Excluded(poc.0), Bound::Unbounded))
                .map(|(&l, &v)| (l, v)),
            levels.range(..poc.0).rev().map(|(&l, &v)| (l, v)),
        ),
        ValueAreaAdjacency::Price => {
            let volume_at =
                |level: PriceLevel| (level, levels.get(&level).copied().unwrap_or(0.0));
            let max = levels.last_key_value().map_or(poc.0, |(&l, _)| l);
            let min = levels.first_key_value().map_or(poc.0, |(&l, _)| l);
            let up =
                successors(Some(poc.0.next()), |l| Some(l.next())).take_while(|&l| l <= max);
            let down = successors(Some(poc.0.previous()), |l| Some(l.previous()))
                .take_while(|&l| l >= min);
            expand(poc, target, up.map(volume_at), down.map(volume_at))
        }
    }
}

impl VolumeProfile {
    /// Builds the profile of one window, or `None` if `ticks` is empty.
    ///
    /// `percentage` must already be validated.
    fn from_ticks(
        timestamp: DateTime<Utc>,
        ticks: &[Tick],
        binner: &PriceBinner,
        percentage: u8,
        adjacency: ValueAreaAdjacency,
    ) -> Option<Self> {
        let levels = level_volumes(binner, ticks);
        let poc = point_of_control(&levels)?;
        let total_volume: f64 = levels.values().sum();
        let target = total_volume * f64::from(percentage) / 100.0;
        let area = value_area(&levels, poc, target, adjacency);

        Some(Self {
            timestamp,
            levels: descending_levels(binner, &levels),
            poc: ProfileLevel {
                price: binner.price_of(poc.0),
                volume: poc.1,
            },
            value_area: ValueArea {
                high: binner.price_of(area.high),
                low: binner.price_of(area.low),
                percentage,
                volume: area.volume,
            },
            total_volume,
        })
    }
}

/// Builds volume profiles from buffered ticks.
#[derive(Debug, Clone)]
pub struct VolumeProfileAggregator {
    buffer: TickBuffer,
    binner: PriceBinner,
    adjacency: ValueAreaAdjacency,
}

impl_tick_sink!(VolumeProfileAggregator);

impl VolumeProfileAggregator {
    /// Creates an empty aggregator binning prices with `binner`.
    #[must_use]
    pub const fn new(binner: PriceBinner) -> Self {
        Self {
            buffer: TickBuffer::new(),
            binner,
            adjacency: ValueAreaAdjacency::Positional,
        }
    }

    /// Sets the value area neighbour selection.
    #[must_use]
    pub const fn with_adjacency(mut self, adjacency: ValueAreaAdjacency) -> Self {
        self.adjacency = adjacency;
        self
    }

    /// Returns the price binner.
    #[must_use]
    pub const fn binner(&self) -> PriceBinner {
        self.binner
    }

    /// Returns the value area neighbour selection.
    #[must_use]
    pub const fn adjacency(&self) -> ValueAreaAdjacency {
        self.adjacency
    }

    /// Generates one profile per non-empty window.
    ///
    /// # Errors
    ///
    /// Returns an error if `value_area_percentage` is outside `1..=100` or
    /// the buffered timestamps are not in order.
    pub fn generate_profiles(
        &self,
        timeframe: Timeframe,
        value_area_percentage: u8,
    ) -> Result<Vec<VolumeProfile>> {
        validate_value_area_percentage(value_area_percentage)?;
        let windows = TimeResampler::new(timeframe).windows(self.buffer.as_slice())?;

        let profiles: Vec<VolumeProfile> = windows
            .iter()
            .filter_map(|w| {
                VolumeProfile::from_ticks(
                    w.start,
                    w.ticks,
                    &self.binner,
                    value_area_percentage,
                    self.adjacency,
                )
            })
            .collect();

        debug!(
            ticks = self.buffer.len(),
            profiles = profiles.len(),
            %timeframe,
            bin = self.binner.width(),
            adjacency = ?self.adjacency,
            "generated volume profiles"
        );
        Ok(profiles)
    }
}
