//! # Pairs Autotrader
//!
//! Order and position manager for the future/index pair.
//!
//! ## Architecture
//! - `SpreadSignalEngine` scores every quote against the running spread window.
//! - `OrderTracker` holds at most one resting order per side (ask, bid).
//! - `ExecutionGateway` receives inserts, cancels and hedges; their outcomes
//!   come back later through the `MarketEventHandler` callbacks.
//!
//! ## Quote handling
//! Every book update first runs the repricing pass: a resting order whose
//! price no longer matches the touch on its side is cancelled and its slot
//! marked `CancelPending`. Then, if the signal exceeds the entry threshold,
//! an order is placed one tick inside the touch on the side the spread
//! direction calls for, provided that slot is empty and the position limit
//! allows it.
//!
//! ## Fills
//! A fill on the bid order adds to the position and is hedged with an
//! aggressive SELL at the venue's lowest tick-aligned bid; a fill on the ask
//! order does the opposite with a BUY at the highest tick-aligned ask.
//! Slots are cleared only by a zero-remaining status or an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use super::config::TraderConfig;
use super::spread_signal::{SpreadDirection, SpreadSignal, SpreadSignalEngine};
use crate::gateway::{ExecutionGateway, MarketEventHandler};
use crate::metrics;
use crate::orders::{OrderId, OrderIdGenerator, OrderTracker, SlotSide, SlotState};
use crate::types::{BookUpdate, Instrument, Lifespan, Price, Side, Volume};

/// Point-in-time view of the trader, for logs, summaries and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderSnapshot {
    pub position: i64,
    pub ask_slot: SlotState,
    pub bid_slot: SlotState,
    pub active_orders: usize,
    /// Fees in cents; negative values are rebates received.
    pub total_fees: i64,
    pub hedged_volume: Volume,
    pub last_signal: f64,
    pub spread_observations: usize,
    pub connected: bool,
}

/// The single owned aggregate holding all trading state.
///
/// Handlers take `&mut self` and run to completion; the venue delivers
/// events one at a time, so nothing here is shared or locked.
pub struct AutoTrader<G: ExecutionGateway> {
    config: TraderConfig,
    gateway: G,
    signals: SpreadSignalEngine,
    orders: OrderTracker,
    ids: OrderIdGenerator,
    position: i64,
    /// Latest cumulative fees reported for each active order
    open_fees: HashMap<OrderId, i64>,
    realized_fees: i64,
    hedged_volume: Volume,
    last_signal: Option<SpreadSignal>,
    last_sequence: HashMap<Instrument, u64>,
    connected: bool,
}

impl<G: ExecutionGateway> AutoTrader<G> {
    pub fn new(config: TraderConfig, gateway: G) -> Self {
        let signals = SpreadSignalEngine::new(config.window_capacity);
        Self::with_signal_engine(config, gateway, signals)
    }

    /// Build a trader around an existing (e.g. warmed-up) signal engine.
    pub fn with_signal_engine(config: TraderConfig, gateway: G, signals: SpreadSignalEngine) -> Self {
        Self {
            config,
            gateway,
            signals,
            orders: OrderTracker::new(),
            ids: OrderIdGenerator::new(),
            position: 0,
            open_fees: HashMap::new(),
            realized_fees: 0,
            hedged_volume: 0,
            last_signal: None,
            last_sequence: HashMap::new(),
            connected: true,
        }
    }

    /// Process a new touch for `instrument`: reprice, then maybe enter.
    ///
    /// Returns the signal computed for this update.
    #[instrument(level = "debug", skip(self))]
    pub fn on_quote_update(
        &mut self,
        instrument: Instrument,
        top_ask: Price,
        top_bid: Price,
    ) -> SpreadSignal {
        let signal = self
            .signals
            .update_and_signal(instrument, top_bid, top_ask);
        self.last_signal = Some(signal);
        metrics::set_last_signal(signal.value);

        self.reprice(SlotSide::Ask, top_ask);
        self.reprice(SlotSide::Bid, top_bid);

        if signal.value > self.config.entry_threshold {
            debug!(
                signal = signal.value,
                direction = %signal.direction,
                position = self.position,
                "Signal above entry threshold"
            );
            match signal.direction {
                SpreadDirection::FutureAbove if self.position < self.config.position_limit => {
                    self.enter(SlotSide::Bid, top_bid);
                }
                SpreadDirection::FutureBelow if self.position > -self.config.position_limit => {
                    self.enter(SlotSide::Ask, top_ask);
                }
                _ => {}
            }
        }

        signal
    }

    /// Cancel the resting order on `side` if the touch moved away from it.
    fn reprice(&mut self, side: SlotSide, touch: Price) {
        let order = match self.orders.slot(side) {
            SlotState::Pending(order) => order,
            _ => return,
        };
        if touch == 0 || touch == order.price {
            return;
        }

        if self.orders.begin_cancel(side).is_some() {
            info!(
                order_id = %order.id,
                slot = %side,
                resting_price = order.price,
                touch,
                "Touch moved, cancelling resting order"
            );
            self.gateway.cancel_order(order.id);
            metrics::record_cancel(side.order_side());
        }
    }

    /// Place a new resting order one tick inside the touch on `side`.
    fn enter(&mut self, side: SlotSide, touch: Price) {
        if !self.orders.slot(side).is_empty() {
            return;
        }
        if touch == 0 {
            debug!(slot = %side, "No touch on this side, skipping entry");
            return;
        }

        let price = match side {
            SlotSide::Bid => touch.checked_add(self.config.tick_size),
            SlotSide::Ask => touch.checked_sub(self.config.tick_size),
        };
        let price = match price {
            Some(p) if p > 0 => p,
            _ => {
                warn!(slot = %side, touch, "Entry price out of range, skipping entry");
                return;
            }
        };

        let id = self.ids.next_id();
        if let Err(e) = self.orders.open(side, id, price) {
            error!(order_id = %id, error = %e, "Refusing to insert order");
            return;
        }

        let order_side = side.order_side();
        info!(
            order_id = %id,
            side = %order_side,
            price,
            volume = self.config.lot_size,
            position = self.position,
            "Inserting entry order"
        );
        self.gateway.insert_order(
            id,
            order_side,
            price,
            self.config.lot_size,
            Lifespan::GoodForDay,
        );
        metrics::record_insert(order_side);
    }

    /// Apply a fill on one of our resting orders and hedge it.
    pub fn on_fill(&mut self, id: OrderId, price: Price, volume: Volume) {
        let side = match self.orders.route(id) {
            Some(side) => side,
            None => {
                debug!(order_id = %id, "Fill for unknown order ignored");
                return;
            }
        };

        info!(
            target: "trades",
            order_id = %id,
            slot = %side,
            price,
            volume,
            "Order filled"
        );
        metrics::record_fill(side.order_side(), volume);

        if volume == 0 {
            return;
        }
        let lots = i64::try_from(volume).unwrap_or(i64::MAX);

        let (hedge_side, hedge_price) = match side {
            SlotSide::Ask => {
                self.position = self.position.saturating_sub(lots);
                (Side::Buy, self.config.hedge_buy_price())
            }
            SlotSide::Bid => {
                self.position = self.position.saturating_add(lots);
                (Side::Sell, self.config.hedge_sell_price())
            }
        };
        metrics::set_position(self.position);

        let hedge_id = self.ids.next_id();
        info!(
            order_id = %hedge_id,
            side = %hedge_side,
            price = hedge_price,
            volume,
            position = self.position,
            "Sending hedge order"
        );
        self.gateway
            .send_hedge_order(hedge_id, hedge_side, hedge_price, volume);
        metrics::record_hedge(hedge_side);
    }

    /// Apply a status update; zero remaining volume retires the order.
    pub fn on_status(&mut self, id: OrderId, remaining_volume: Volume, fees: i64) {
        if !self.orders.is_active(id) {
            debug!(order_id = %id, "Status for unknown order ignored");
            return;
        }
        self.open_fees.insert(id, fees);

        if remaining_volume == 0 {
            self.retire(id, "completed");
        }
    }

    /// A venue error terminates the order it names.
    pub fn on_order_error(&mut self, id: OrderId, message: &str) {
        if id.is_none() {
            warn!(error = message, "Venue error");
            return;
        }
        if !self.orders.is_active(id) {
            warn!(order_id = %id, error = message, "Error for unknown order");
            return;
        }
        warn!(order_id = %id, error = message, "Order rejected");
        metrics::record_rejected();
        self.retire(id, "rejected");
    }

    fn retire(&mut self, id: OrderId, reason: &str) {
        if let Some(fees) = self.open_fees.remove(&id) {
            self.realized_fees += fees;
        }
        if let Some(side) = self.orders.retire(id) {
            info!(order_id = %id, slot = %side, reason, "Order retired, slot cleared");
        }
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn slot(&self, side: SlotSide) -> SlotState {
        self.orders.slot(side)
    }

    pub fn orders(&self) -> &OrderTracker {
        &self.orders
    }

    pub fn signal_engine(&self) -> &SpreadSignalEngine {
        &self.signals
    }

    pub fn last_signal(&self) -> Option<SpreadSignal> {
        self.last_signal
    }

    pub fn config(&self) -> &TraderConfig {
        &self.config
    }

    /// Fees of retired orders plus the latest figure for active ones.
    pub fn total_fees(&self) -> i64 {
        self.realized_fees + self.open_fees.values().sum::<i64>()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    pub fn snapshot(&self) -> TraderSnapshot {
        TraderSnapshot {
            position: self.position,
            ask_slot: self.orders.slot(SlotSide::Ask),
            bid_slot: self.orders.slot(SlotSide::Bid),
            active_orders: self.orders.active().len(),
            total_fees: self.total_fees(),
            hedged_volume: self.hedged_volume,
            last_signal: self.last_signal.map(|s| s.value).unwrap_or(0.0),
            spread_observations: self.signals.stats().len(),
            connected: self.connected,
        }
    }
}

impl<G: ExecutionGateway> MarketEventHandler for AutoTrader<G> {
    fn on_order_book(&mut self, update: &BookUpdate) {
        if let Some(prev) = self
            .last_sequence
            .insert(update.instrument, update.sequence_number)
        {
            if update.sequence_number <= prev {
                warn!(
                    instrument = %update.instrument,
                    sequence = update.sequence_number,
                    previous = prev,
                    "Out-of-order order book message"
                );
            }
        }

        debug!(
            instrument = %update.instrument,
            sequence = update.sequence_number,
            ask = update.best_ask(),
            ask_volume = update.asks.best_volume(),
            bid = update.best_bid(),
            bid_volume = update.bids.best_volume(),
            "Order book received"
        );

        self.on_quote_update(update.instrument, update.best_ask(), update.best_bid());
    }

    fn on_trade_ticks(&mut self, ticks: &BookUpdate) {
        debug!(
            instrument = %ticks.instrument,
            sequence = ticks.sequence_number,
            ask = ticks.best_ask(),
            ask_volume = ticks.asks.best_volume(),
            bid = ticks.best_bid(),
            bid_volume = ticks.bids.best_volume(),
            "Trade ticks received"
        );
        metrics::record_trade_ticks(ticks.instrument);
    }

    fn on_order_filled(&mut self, id: OrderId, price: Price, volume: Volume) {
        self.on_fill(id, price, volume);
    }

    fn on_hedge_filled(&mut self, id: OrderId, price: Price, volume: Volume) {
        if price == 0 && volume == 0 {
            warn!(target: "trades", order_id = %id, "Hedge order failed");
            return;
        }
        self.hedged_volume = self.hedged_volume.saturating_add(volume);
        info!(
            target: "trades",
            order_id = %id,
            price,
            volume,
            "Hedge order filled"
        );
    }

    fn on_order_status(
        &mut self,
        id: OrderId,
        fill_volume: Volume,
        remaining_volume: Volume,
        fees: i64,
    ) {
        debug!(
            order_id = %id,
            fill_volume,
            remaining_volume,
            fees,
            "Order status received"
        );
        self.on_status(id, remaining_volume, fees);
    }

    fn on_error(&mut self, id: OrderId, message: &str) {
        self.on_order_error(id, message);
    }

    fn on_disconnect(&mut self) {
        self.connected = false;
        warn!(position = self.position, "Execution connection lost");
    }
}
