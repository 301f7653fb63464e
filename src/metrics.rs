//! Prometheus Metrics Module
//!
//! Pre-registered metrics for the autotrader. Counters and gauges are plain
//! atomics, so recording from the event handlers costs next to nothing.

use lazy_static::lazy_static;
use prometheus::{
    opts, register_gauge, register_int_counter, register_int_counter_vec, register_int_gauge,
    Encoder, Gauge, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};

use crate::types::{Instrument, Side, Volume};

lazy_static! {
    // --- Order Metrics ---

    /// Entry orders inserted (by side)
    pub static ref ORDERS_INSERTED: IntCounterVec = register_int_counter_vec!(
        opts!("autotrader_orders_inserted_total", "Entry orders inserted"),
        &["side"]
    ).expect("FATAL: Failed to register ORDERS_INSERTED metric - check for duplicate registration");

    /// Cancel requests sent by the repricing pass (by side)
    pub static ref ORDERS_CANCELLED: IntCounterVec = register_int_counter_vec!(
        opts!("autotrader_cancels_total", "Cancel requests sent"),
        &["side"]
    ).expect("FATAL: Failed to register ORDERS_CANCELLED metric - check for duplicate registration");

    /// Orders terminated by a venue error
    pub static ref ORDERS_REJECTED: IntCounter = register_int_counter!(
        opts!("autotrader_orders_rejected_total", "Orders terminated by a venue error")
    ).expect("FATAL: Failed to register ORDERS_REJECTED metric - check for duplicate registration");

    // --- Fill Metrics ---

    /// Fill events on resting orders (by side)
    pub static ref FILLS_TOTAL: IntCounterVec = register_int_counter_vec!(
        opts!("autotrader_fills_total", "Fill events on resting orders"),
        &["side"]
    ).expect("FATAL: Failed to register FILLS_TOTAL metric - check for duplicate registration");

    /// Lots filled on resting orders (by side)
    pub static ref FILLED_VOLUME: IntCounterVec = register_int_counter_vec!(
        opts!("autotrader_filled_volume_total", "Lots filled on resting orders"),
        &["side"]
    ).expect("FATAL: Failed to register FILLED_VOLUME metric - check for duplicate registration");

    /// Hedge orders sent (by side)
    pub static ref HEDGES_TOTAL: IntCounterVec = register_int_counter_vec!(
        opts!("autotrader_hedges_total", "Hedge orders sent"),
        &["side"]
    ).expect("FATAL: Failed to register HEDGES_TOTAL metric - check for duplicate registration");

    // --- Strategy Metrics ---

    /// Net position in lots
    pub static ref POSITION: IntGauge = register_int_gauge!(
        opts!("autotrader_position_lots", "Net position in lots")
    ).expect("FATAL: Failed to register POSITION metric - check for duplicate registration");

    /// Most recent spread signal in standard deviations
    pub static ref LAST_SIGNAL: Gauge = register_gauge!(
        opts!("autotrader_last_signal", "Most recent spread signal")
    ).expect("FATAL: Failed to register LAST_SIGNAL metric - check for duplicate registration");

    // --- Market Data Metrics ---

    /// Trade tick messages received (by instrument)
    pub static ref TRADE_TICKS_TOTAL: IntCounterVec = register_int_counter_vec!(
        opts!("autotrader_trade_ticks_total", "Trade tick messages received"),
        &["instrument"]
    ).expect("FATAL: Failed to register TRADE_TICKS_TOTAL metric - check for duplicate registration");
}

fn side_label(side: Side) -> &'static str {
    match side {
        Side::Buy => "buy",
        Side::Sell => "sell",
    }
}

/// Record an inserted entry order
pub fn record_insert(side: Side) {
    ORDERS_INSERTED.with_label_values(&[side_label(side)]).inc();
}

/// Record a cancel request
pub fn record_cancel(side: Side) {
    ORDERS_CANCELLED.with_label_values(&[side_label(side)]).inc();
}

pub fn record_rejected() {
    ORDERS_REJECTED.inc();
}

/// Record a fill on a resting order
pub fn record_fill(side: Side, volume: Volume) {
    let label = side_label(side);
    FILLS_TOTAL.with_label_values(&[label]).inc();
    FILLED_VOLUME.with_label_values(&[label]).inc_by(volume);
}

pub fn record_hedge(side: Side) {
    HEDGES_TOTAL.with_label_values(&[side_label(side)]).inc();
}

pub fn set_position(lots: i64) {
    POSITION.set(lots);
}

pub fn set_last_signal(value: f64) {
    LAST_SIGNAL.set(value);
}

pub fn record_trade_ticks(instrument: Instrument) {
    let label = match instrument {
        Instrument::Future => "future",
        Instrument::Index => "index",
    };
    TRADE_TICKS_TOTAL.with_label_values(&[label]).inc();
}

/// Get metrics as text in the Prometheus exposition format
///
/// Encoding failures are logged and yield an empty string.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode Prometheus metrics: {}", e);
        return String::new();
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Prometheus metrics buffer is not valid UTF-8: {}", e);
            String::new()
        }
    }
}
