//! Spread signal engine.
//!
//! Tracks the last quote of each leg and turns every new quote into a
//! standardized deviation of the mid-price spread from its running mean.
//!
//! The spread is scored against the window as it stood *before* the new
//! observation, and only then admitted, so an observation never pulls its own
//! baseline toward itself.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::math::WindowedStats;
use crate::types::{Instrument, Price};

/// Last known touch and derived mid for one instrument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteState {
    pub bid: Price,
    pub ask: Price,
    /// 0 until the first quote with at least one side.
    pub mid: Price,
}

impl QuoteState {
    /// Store a new touch and re-derive the mid.
    ///
    /// Both sides → truncated mean; one side → that side; neither → the
    /// previous mid is kept.
    pub fn update(&mut self, bid: Price, ask: Price) {
        self.bid = bid;
        self.ask = ask;
        self.mid = match (bid, ask) {
            (0, 0) => self.mid,
            (b, 0) => b,
            (0, a) => a,
            (b, a) => b / 2 + a / 2 + (b % 2 + a % 2) / 2,
        };
    }

    #[inline]
    pub fn has_mid(&self) -> bool {
        self.mid != 0
    }
}

/// Ordering of the future mid relative to the index mid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpreadDirection {
    FutureAbove,
    FutureBelow,
    /// Equal mids, or at least one mid still unknown.
    Level,
}

impl std::fmt::Display for SpreadDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpreadDirection::FutureAbove => write!(f, "future_above"),
            SpreadDirection::FutureBelow => write!(f, "future_below"),
            SpreadDirection::Level => write!(f, "level"),
        }
    }
}

/// Signal magnitude plus the direction used to pick a side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadSignal {
    /// Non-negative distance from the mean in standard deviations.
    pub value: f64,
    pub direction: SpreadDirection,
    /// The spread admitted by this update, if both mids were known.
    pub spread: Option<Price>,
}

impl SpreadSignal {
    pub fn neutral() -> Self {
        Self {
            value: 0.0,
            direction: SpreadDirection::Level,
            spread: None,
        }
    }
}

/// Quote state for both legs plus the spread statistics.
#[derive(Debug, Clone)]
pub struct SpreadSignalEngine {
    future: QuoteState,
    index: QuoteState,
    stats: WindowedStats,
}

impl SpreadSignalEngine {
    pub fn new(window_capacity: usize) -> Self {
        Self::with_stats(WindowedStats::new(window_capacity))
    }

    /// Start from an existing window, e.g. warmed up from history.
    pub fn with_stats(stats: WindowedStats) -> Self {
        Self {
            future: QuoteState::default(),
            index: QuoteState::default(),
            stats,
        }
    }

    /// Store the new touch for `instrument` and score the resulting spread.
    pub fn update_and_signal(
        &mut self,
        instrument: Instrument,
        bid: Price,
        ask: Price,
    ) -> SpreadSignal {
        match instrument {
            Instrument::Future => self.future.update(bid, ask),
            Instrument::Index => self.index.update(bid, ask),
        }

        let direction = self.direction();

        if !self.future.has_mid() || !self.index.has_mid() {
            return SpreadSignal {
                direction,
                ..SpreadSignal::neutral()
            };
        }

        let spread = self.future.mid.abs_diff(self.index.mid);
        let value = self.stats.z_score(spread as f64);
        self.stats.push(spread as f64);

        trace!(
            instrument = %instrument,
            future_mid = self.future.mid,
            index_mid = self.index.mid,
            spread,
            signal = value,
            "Spread scored"
        );

        SpreadSignal {
            value,
            direction,
            spread: Some(spread),
        }
    }

    /// Current ordering of the two mids.
    pub fn direction(&self) -> SpreadDirection {
        if !self.future.has_mid() || !self.index.has_mid() {
            return SpreadDirection::Level;
        }
        match self.future.mid.cmp(&self.index.mid) {
            std::cmp::Ordering::Greater => SpreadDirection::FutureAbove,
            std::cmp::Ordering::Less => SpreadDirection::FutureBelow,
            std::cmp::Ordering::Equal => SpreadDirection::Level,
        }
    }

    pub fn quote(&self, instrument: Instrument) -> &QuoteState {
        match instrument {
            Instrument::Future => &self.future,
            Instrument::Index => &self.index,
        }
    }

    pub fn stats(&self) -> &WindowedStats {
        &self.stats
    }
}
