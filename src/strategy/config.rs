//! Trader configuration.
//!
//! `TraderConfig` carries the venue constants and strategy knobs. It can be
//! built fluently with `TraderConfigBuilder` or loaded from a JSON file; both
//! paths end in the same validation.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, Volume};

/// Errors that can occur when loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} must be positive")]
    NotPositive(&'static str),

    #[error("entry_threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),

    #[error("min_bid ({min_bid}) must be below max_ask ({max_ask})")]
    InvertedPriceBounds { min_bid: Price, max_ask: Price },

    #[error("max_ask ({max_ask}) must be at least one tick ({tick_size})")]
    MaxAskBelowTick { max_ask: Price, tick_size: Price },

    #[error("min_bid ({min_bid}) leaves no tick ({tick_size}) below max_ask ({max_ask})")]
    NoTickAboveMinBid {
        min_bid: Price,
        max_ask: Price,
        tick_size: Price,
    },
}

/// Strategy and venue parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraderConfig {
    /// Lots per entry order
    pub lot_size: Volume,
    /// Absolute position (lots) beyond which same-direction entries stop
    pub position_limit: i64,
    /// Smallest price increment in cents
    pub tick_size: Price,
    /// Signal (in standard deviations) an entry must exceed
    pub entry_threshold: f64,
    /// Spread observations kept in the statistics window
    pub window_capacity: usize,
    /// Lowest bid price the venue accepts
    pub min_bid: Price,
    /// Highest ask price the venue accepts
    pub max_ask: Price,
}

impl Default for TraderConfig {
    fn default() -> Self {
        Self {
            lot_size: 10,
            position_limit: 100,
            tick_size: 100,
            entry_threshold: 1.0,
            window_capacity: 100,
            min_bid: 1,
            max_ask: 2_147_483_647,
        }
    }
}

impl TraderConfig {
    /// Load and validate a JSON config file. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let config: TraderConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| ConfigError::Parse {
                path: display,
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant the trader relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lot_size == 0 {
            return Err(ConfigError::NotPositive("lot_size"));
        }
        if self.position_limit <= 0 {
            return Err(ConfigError::NotPositive("position_limit"));
        }
        if self.tick_size == 0 {
            return Err(ConfigError::NotPositive("tick_size"));
        }
        if self.window_capacity == 0 {
            return Err(ConfigError::NotPositive("window_capacity"));
        }
        if !self.entry_threshold.is_finite() || self.entry_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.entry_threshold));
        }
        if self.min_bid >= self.max_ask {
            return Err(ConfigError::InvertedPriceBounds {
                min_bid: self.min_bid,
                max_ask: self.max_ask,
            });
        }
        if self.max_ask < self.tick_size {
            return Err(ConfigError::MaxAskBelowTick {
                max_ask: self.max_ask,
                tick_size: self.tick_size,
            });
        }
        if self.min_bid > self.max_ask - self.tick_size {
            return Err(ConfigError::NoTickAboveMinBid {
                min_bid: self.min_bid,
                max_ask: self.max_ask,
                tick_size: self.tick_size,
            });
        }
        Ok(())
    }

    /// Price for hedge SELL orders: the first tick strictly above the minimum bid.
    ///
    /// Saturates instead of overflowing for bounds that skipped `validate`.
    pub fn hedge_sell_price(&self) -> Price {
        let tick = self.tick_size.max(1);
        self.min_bid.saturating_add(tick) / tick * tick
    }

    /// Price for hedge BUY orders: the maximum ask rounded down to a tick.
    pub fn hedge_buy_price(&self) -> Price {
        let tick = self.tick_size.max(1);
        self.max_ask / tick * tick
    }
}

/// Builder for `TraderConfig` with the venue defaults and validation.
#[derive(Debug, Clone, Default)]
pub struct TraderConfigBuilder {
    config: TraderConfig,
}

impl TraderConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lot_size(mut self, lots: Volume) -> Self {
        self.config.lot_size = lots;
        self
    }

    pub fn position_limit(mut self, limit: i64) -> Self {
        self.config.position_limit = limit;
        self
    }

    pub fn tick_size(mut self, tick: Price) -> Self {
        self.config.tick_size = tick;
        self
    }

    pub fn entry_threshold(mut self, threshold: f64) -> Self {
        self.config.entry_threshold = threshold;
        self
    }

    pub fn window_capacity(mut self, capacity: usize) -> Self {
        self.config.window_capacity = capacity;
        self
    }

    /// Venue price bounds used to price hedge orders.
    pub fn price_bounds(mut self, min_bid: Price, max_ask: Price) -> Self {
        self.config.min_bid = min_bid;
        self.config.max_ask = max_ask;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<TraderConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_venue_constants() {
        let config = TraderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lot_size, 10);
        assert_eq!(config.position_limit, 100);
        assert_eq!(config.tick_size, 100);
        assert_eq!(config.hedge_sell_price(), 100);
        assert_eq!(config.hedge_buy_price(), 2_147_483_600);
    }

    #[test]
    fn test_builder_validation() {
        assert!(matches!(
            TraderConfigBuilder::new().lot_size(0).build(),
            Err(ConfigError::NotPositive("lot_size"))
        ));
        assert!(matches!(
            TraderConfigBuilder::new().window_capacity(0).build(),
            Err(ConfigError::NotPositive("window_capacity"))
        ));
        assert!(matches!(
            TraderConfigBuilder::new().entry_threshold(f64::NAN).build(),
            Err(ConfigError::InvalidThreshold(_))
        ));
        assert!(matches!(
            TraderConfigBuilder::new().price_bounds(500, 400).build(),
            Err(ConfigError::InvertedPriceBounds { .. })
        ));
        assert!(matches!(
            TraderConfigBuilder::new().price_bounds(1, 50).build(),
            Err(ConfigError::MaxAskBelowTick { .. })
        ));

        let config = TraderConfigBuilder::new()
            .lot_size(5)
            .position_limit(50)
            .entry_threshold(2.0)
            .build()
            .unwrap();
        assert_eq!(config.lot_size, 5);
        assert_eq!(config.position_limit, 50);
        assert_eq!(config.entry_threshold, 2.0);
    }

    #[test]
    fn test_min_bid_near_max_is_rejected() {
        let err = TraderConfigBuilder::new()
            .price_bounds(u64::MAX - 50, u64::MAX)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoTickAboveMinBid { .. }));

        // Unvalidated extreme bounds still price without overflow
        let config = TraderConfig {
            min_bid: u64::MAX - 50,
            max_ask: u64::MAX,
            ..TraderConfig::default()
        };
        assert_eq!(config.hedge_sell_price(), u64::MAX / 100 * 100);
    }

    #[test]
    fn test_hedge_prices_are_tick_aligned() {
        let config = TraderConfigBuilder::new()
            .tick_size(25)
            .price_bounds(130, 10_010)
            .build()
            .unwrap();
        assert_eq!(config.hedge_sell_price(), 150);
        assert_eq!(config.hedge_buy_price(), 10_000);
    }

    #[test]
    fn test_from_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trader.json");
        let mut file = File::create(&path).unwrap();
        write!(file, r#"{{ "lot_size": 20, "entry_threshold": 1.5 }}"#).unwrap();

        let config = TraderConfig::from_file(&path).unwrap();
        assert_eq!(config.lot_size, 20);
        assert_eq!(config.entry_threshold, 1.5);
        assert_eq!(config.tick_size, 100);
    }

    #[test]
    fn test_from_file_reports_missing_file() {
        let err = TraderConfig::from_file("/nonexistent/trader.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
