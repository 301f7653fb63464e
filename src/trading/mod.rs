//! Trading session drivers.
//!
//! This module contains the replay engine that drives the autotrader from
//! recorded venue events.

mod replay_engine;

pub use replay_engine::{ReplayError, ReplaySession, ReplaySummary, StopReason};
