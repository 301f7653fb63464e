//! Pairs-trading autotrader for a future/index pair.
//!
//! Quotes on either leg update a running window of the mid-price spread; a
//! spread far enough from its mean places a passive order on the quoted
//! instrument, and every fill on it is hedged with an aggressive order on
//! the paired one.

pub mod cli;
pub mod commands;
pub mod gateway;
pub mod math;
pub mod metrics;
pub mod observability;
pub mod orders;
pub mod strategy;
pub mod trading;
pub mod types;
