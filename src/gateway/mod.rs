//! Venue gateway interfaces.
//!
//! The transport and session layer live outside this crate. They talk to the
//! trader through two small capability traits:
//!
//! - `ExecutionGateway` - requests the trader sends to the venue
//! - `MarketEventHandler` - callbacks the venue delivers to the trader
//!
//! Every outbound request is fire-and-forget: its outcome comes back later as
//! a separate inbound event. `GatewayEvent` is the serializable form of the
//! inbound callbacks, used for replay files and tests.

pub mod paper;

pub use paper::PaperGateway;

use serde::{Deserialize, Serialize};

use crate::orders::OrderId;
use crate::types::{BookUpdate, Lifespan, Price, Side, Volume};

/// Requests the trader sends to the execution venue.
///
/// Implementations must not block: the trader calls these from inside an
/// event handler and expects to return before the next event is delivered.
pub trait ExecutionGateway {
    /// Insert a resting limit order on the quoted instrument.
    fn insert_order(
        &mut self,
        id: OrderId,
        side: Side,
        price: Price,
        volume: Volume,
        lifespan: Lifespan,
    );

    /// Request cancellation of a resting order.
    fn cancel_order(&mut self, id: OrderId);

    /// Send an aggressive hedge order on the paired instrument.
    fn send_hedge_order(&mut self, id: OrderId, side: Side, price: Price, volume: Volume);
}

/// Callbacks delivered by the venue, strictly one at a time and in order.
pub trait MarketEventHandler {
    /// Top five levels of the book for one instrument.
    fn on_order_book(&mut self, update: &BookUpdate);

    /// Recent trading activity for one instrument (same shape as the book).
    fn on_trade_ticks(&mut self, ticks: &BookUpdate);

    /// A resting order was (partially) filled.
    fn on_order_filled(&mut self, id: OrderId, price: Price, volume: Volume);

    /// A hedge order was (partially) filled. Price and volume are zero when
    /// the hedge failed.
    fn on_hedge_filled(&mut self, id: OrderId, price: Price, volume: Volume);

    /// Status change of a resting order. `remaining_volume` is zero once the
    /// order is fully filled or cancelled.
    fn on_order_status(
        &mut self,
        id: OrderId,
        fill_volume: Volume,
        remaining_volume: Volume,
        fees: i64,
    );

    /// Venue error. `id` is `OrderId::NONE` when it concerns no order.
    fn on_error(&mut self, id: OrderId, message: &str);

    /// Execution connection lost.
    fn on_disconnect(&mut self);
}

/// Serializable inbound event, one per venue callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    OrderBook(BookUpdate),
    TradeTicks(BookUpdate),
    OrderFilled {
        id: OrderId,
        price: Price,
        volume: Volume,
    },
    HedgeFilled {
        id: OrderId,
        price: Price,
        volume: Volume,
    },
    OrderStatus {
        id: OrderId,
        #[serde(default)]
        fill_volume: Volume,
        remaining_volume: Volume,
        #[serde(default)]
        fees: i64,
    },
    Error {
        id: OrderId,
        message: String,
    },
    Disconnect,
}

impl GatewayEvent {
    /// Deliver this event to a handler.
    pub fn dispatch<H: MarketEventHandler + ?Sized>(&self, handler: &mut H) {
        match self {
            GatewayEvent::OrderBook(update) => handler.on_order_book(update),
            GatewayEvent::TradeTicks(ticks) => handler.on_trade_ticks(ticks),
            GatewayEvent::OrderFilled { id, price, volume } => {
                handler.on_order_filled(*id, *price, *volume)
            }
            GatewayEvent::HedgeFilled { id, price, volume } => {
                handler.on_hedge_filled(*id, *price, *volume)
            }
            GatewayEvent::OrderStatus {
                id,
                fill_volume,
                remaining_volume,
                fees,
            } => handler.on_order_status(*id, *fill_volume, *remaining_volume, *fees),
            GatewayEvent::Error { id, message } => handler.on_error(*id, message),
            GatewayEvent::Disconnect => handler.on_disconnect(),
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayEvent::OrderBook(_) => "order_book",
            GatewayEvent::TradeTicks(_) => "trade_ticks",
            GatewayEvent::OrderFilled { .. } => "order_filled",
            GatewayEvent::HedgeFilled { .. } => "hedge_filled",
            GatewayEvent::OrderStatus { .. } => "order_status",
            GatewayEvent::Error { .. } => "error",
            GatewayEvent::Disconnect => "disconnect",
        }
    }
}

/// A request the trader sent to the venue, as journaled by `PaperGateway`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundRequest {
    Insert {
        id: OrderId,
        side: Side,
        price: Price,
        volume: Volume,
        lifespan: Lifespan,
    },
    Cancel {
        id: OrderId,
    },
    Hedge {
        id: OrderId,
        side: Side,
        price: Price,
        volume: Volume,
    },
}

impl OutboundRequest {
    pub fn id(&self) -> OrderId {
        match self {
            OutboundRequest::Insert { id, .. }
            | OutboundRequest::Cancel { id }
            | OutboundRequest::Hedge { id, .. } => *id,
        }
    }
}
