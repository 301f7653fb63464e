//! Common Types Module
//!
//! Shared venue types used across the codebase to avoid circular dependencies.
//! Prices are integer cents and volumes are integer lots, exactly as the venue
//! reports them.

use serde::{Deserialize, Serialize};

/// Price in minor currency units (cents). Zero means "no price on that side".
pub type Price = u64;

/// Volume in lots.
pub type Volume = u64;

/// Number of price levels carried by every order-book and trade-ticks message.
pub const TOP_LEVEL_COUNT: usize = 5;

/// Which leg of the pair a market data message belongs to.
///
/// Serialized by name; also read from the venue's numeric codes
/// (0 = future, 1 = index) and the `"etf"` alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "InstrumentCode")]
pub enum Instrument {
    Future,
    /// The tracking instrument (an ETF on the venue).
    Index,
}

/// Accepted wire forms of an instrument.
#[derive(Deserialize)]
#[serde(untagged)]
enum InstrumentCode {
    Numeric(u64),
    Name(String),
}

impl TryFrom<InstrumentCode> for Instrument {
    type Error = String;

    fn try_from(code: InstrumentCode) -> Result<Self, Self::Error> {
        match code {
            InstrumentCode::Numeric(0) => Ok(Instrument::Future),
            InstrumentCode::Numeric(1) => Ok(Instrument::Index),
            InstrumentCode::Numeric(n) => Err(format!("unknown instrument code {}", n)),
            InstrumentCode::Name(name) => match name.to_ascii_lowercase().as_str() {
                "future" => Ok(Instrument::Future),
                "index" | "etf" => Ok(Instrument::Index),
                other => Err(format!("unknown instrument '{}'", other)),
            },
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instrument::Future => write!(f, "future"),
            Instrument::Index => write!(f, "index"),
        }
    }
}

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// How long a resting order lives on the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifespan {
    /// Cancelled by the venue if not filled immediately.
    FillAndKill,
    /// Rests until cancelled or the session ends.
    GoodForDay,
}

impl std::fmt::Display for Lifespan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifespan::FillAndKill => write!(f, "FAK"),
            Lifespan::GoodForDay => write!(f, "GFD"),
        }
    }
}

/// Top levels of one side of the book (or of recent trading activity).
///
/// Levels are best-first; absent levels are zero-filled at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookLevels {
    pub prices: [Price; TOP_LEVEL_COUNT],
    pub volumes: [Volume; TOP_LEVEL_COUNT],
}

impl BookLevels {
    /// Levels with only the touch populated.
    pub fn touch(price: Price, volume: Volume) -> Self {
        let mut levels = Self::default();
        levels.prices[0] = price;
        levels.volumes[0] = volume;
        levels
    }

    /// Best price on this side, zero when the side is empty.
    #[inline]
    pub fn best_price(&self) -> Price {
        self.prices[0]
    }

    #[inline]
    pub fn best_volume(&self) -> Volume {
        self.volumes[0]
    }
}

/// An order-book (or trade-ticks) message for one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookUpdate {
    pub instrument: Instrument,
    /// Venue sequence number, used to detect missed or out-of-order messages.
    pub sequence_number: u64,
    pub asks: BookLevels,
    pub bids: BookLevels,
}

impl BookUpdate {
    /// Convenience constructor for a message carrying only the touch.
    pub fn top_of_book(
        instrument: Instrument,
        sequence_number: u64,
        bid: Price,
        ask: Price,
    ) -> Self {
        Self {
            instrument,
            sequence_number,
            asks: BookLevels::touch(ask, if ask == 0 { 0 } else { 1 }),
            bids: BookLevels::touch(bid, if bid == 0 { 0 } else { 1 }),
        }
    }

    #[inline]
    pub fn best_ask(&self) -> Price {
        self.asks.best_price()
    }

    #[inline]
    pub fn best_bid(&self) -> Price {
        self.bids.best_price()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_of_book_constructor() {
        let update = BookUpdate::top_of_book(Instrument::Index, 7, 9800, 9900);
        assert_eq!(update.best_bid(), 9800);
        assert_eq!(update.best_ask(), 9900);
        assert_eq!(update.asks.prices[1], 0);
        assert_eq!(update.bids.best_volume(), 1);
    }

    #[test]
    fn test_instrument_serde_accepts_etf_alias() {
        let parsed: Instrument = serde_json::from_str("\"etf\"").unwrap();
        assert_eq!(parsed, Instrument::Index);
        assert_eq!(serde_json::to_string(&Instrument::Index).unwrap(), "\"index\"");
    }

    #[test]
    fn test_instrument_numeric_codes() {
        assert_eq!(serde_json::from_str::<Instrument>("0").unwrap(), Instrument::Future);
        assert_eq!(serde_json::from_str::<Instrument>("1").unwrap(), Instrument::Index);
        assert!(serde_json::from_str::<Instrument>("2").is_err());
        assert!(serde_json::from_str::<Instrument>("\"bond\"").is_err());

        let line = r#"{"instrument":1,"sequence_number":3,"asks":{"prices":[9900,0,0,0,0],"volumes":[5,0,0,0,0]},"bids":{"prices":[9800,0,0,0,0],"volumes":[5,0,0,0,0]}}"#;
        let update: BookUpdate = serde_json::from_str(line).unwrap();
        assert_eq!(update.instrument, Instrument::Index);
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::Buy.to_string(), "buy");
        assert_eq!(Side::Sell.to_string(), "sell");
    }
}
