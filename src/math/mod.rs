//! Mathematical utilities for trading strategies.
//!
//! This module provides the statistical primitives used by the spread
//! signal, chiefly an O(1) windowed mean/variance tracker with a direct
//! recomputation oracle for verification.

pub mod windowed_stats;

pub use windowed_stats::{Moments, WindowedStats};
