//! Running per-bar state shared by the bar-shaped builders.

use chrono::{DateTime, Utc};
use tapeflow_types::{Side, Tick};

/// Running aggregates over the ticks of one bar, in arrival order.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BarState {
    pub(crate) open_time: DateTime<Utc>,
    pub(crate) close_time: DateTime<Utc>,
    pub(crate) open: f64,
    pub(crate) high: f64,
    pub(crate) low: f64,
    pub(crate) close: f64,
    /// Sum of sizes.
    pub(crate) size: f64,
    /// Sum of notionals.
    pub(crate) notional: f64,
    /// Sum of price × notional.
    pub(crate) price_notional: f64,
    pub(crate) buy_size: f64,
    pub(crate) sell_size: f64,
    pub(crate) buy_notional: f64,
    pub(crate) sell_notional: f64,
    pub(crate) buy_trades: u32,
    pub(crate) sell_trades: u32,
}

impl BarState {
    /// Creates the state from the first tick of a bar.
    pub(crate) fn new(tick: &Tick) -> Self {
        let mut state = Self {
            open_time: tick.timestamp,
            close_time: tick.timestamp,
            open: tick.price,
            high: tick.price,
            low: tick.price,
            close: tick.price,
            size: 0.0,
            notional: 0.0,
            price_notional: 0.0,
            buy_size: 0.0,
            sell_size: 0.0,
            buy_notional: 0.0,
            sell_notional: 0.0,
            buy_trades: 0,
            sell_trades: 0,
        };
        state.accumulate(tick);
        state
    }

    /// Folds every tick of `ticks` into one state, or `None` if empty.
    pub(crate) fn from_ticks(ticks: &[Tick]) -> Option<Self> {
        let (first, rest) = ticks.split_first()?;
        let mut state = Self::new(first);
        for tick in rest {
            state.update(tick);
        }
        Some(state)
    }

    /// Updates the state with the next tick.
    pub(crate) fn update(&mut self, tick: &Tick) {
        self.high = self.high.max(tick.price);
        self.low = self.low.min(tick.price);
        self.close = tick.price;
        self.close_time = tick.timestamp;
        self.accumulate(tick);
    }

    fn accumulate(&mut self, tick: &Tick) {
        let notional = tick.notional();
        self.size += tick.size;
        self.notional += notional;
        self.price_notional += tick.price * notional;
        match tick.side {
            Side::Buy => {
                self.buy_size += tick.size;
                self.buy_notional += notional;
                self.buy_trades += 1;
            }
            Side::Sell => {
                self.sell_size += tick.size;
                self.sell_notional += notional;
                self.sell_trades += 1;
            }
        }
    }

    /// Number of ticks folded in.
    pub(crate) const fn trade_count(&self) -> u32 {
        self.buy_trades + self.sell_trades
    }
}
