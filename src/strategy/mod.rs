//! Pairs-trading strategy: configuration, spread signal and the
//! order/position manager that acts on it.

pub mod autotrader;
pub mod config;
pub mod spread_signal;

pub use autotrader::{AutoTrader, TraderSnapshot};
pub use config::{ConfigError, TraderConfig, TraderConfigBuilder};
pub use spread_signal::{QuoteState, SpreadDirection, SpreadSignal, SpreadSignalEngine};
