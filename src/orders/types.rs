//! Core types for order management.
//!
//! Provides type-safe order identifiers and the per-side slot state.

use serde::{Deserialize, Serialize};

use crate::types::{Price, Side};

/// Type-safe client order identifier.
///
/// Uses a newtype wrapper to prevent accidentally mixing order IDs with
/// prices or volumes, which share the same integer representation.
/// Id 0 is reserved by the venue for errors that concern no particular order.
///
/// # Example
///
/// ```
/// use autotrader::orders::OrderId;
///
/// let id = OrderId::new(5);
/// assert_eq!(id.get(), 5);
/// assert!(!id.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    /// The venue's "no particular order" id.
    pub const NONE: OrderId = OrderId(0);

    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// True for the reserved id 0.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// An order resting on the book: its id and limit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestingOrder {
    pub id: OrderId,
    pub price: Price,
}

/// Lifecycle of the single order slot on one side of the book.
///
/// `Empty → Pending → Empty` on a fill to zero remaining, or
/// `Empty → Pending → CancelPending → Empty` when the quote is repriced.
/// The slot is only cleared by a zero-remaining status (or an error), never
/// by the cancel request itself, so a late fill still finds its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlotState {
    #[default]
    Empty,
    /// Order inserted and resting (or in flight to the venue).
    Pending(RestingOrder),
    /// Cancel requested, waiting for the confirming status.
    CancelPending(RestingOrder),
}

impl SlotState {
    /// The order held by this slot, if any.
    pub fn order(&self) -> Option<RestingOrder> {
        match self {
            SlotState::Empty => None,
            SlotState::Pending(order) | SlotState::CancelPending(order) => Some(*order),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SlotState::Empty)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SlotState::Pending(_))
    }

    pub fn is_cancel_pending(&self) -> bool {
        matches!(self, SlotState::CancelPending(_))
    }
}

impl std::fmt::Display for SlotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotState::Empty => write!(f, "Empty"),
            SlotState::Pending(o) => write!(f, "Pending(id={}, price={})", o.id, o.price),
            SlotState::CancelPending(o) => {
                write!(f, "CancelPending(id={}, price={})", o.id, o.price)
            }
        }
    }
}

/// Which resting-order slot an order id belongs to.
///
/// The ask slot holds sell orders, the bid slot holds buy orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotSide {
    Ask,
    Bid,
}

impl SlotSide {
    /// Order side of the resting quote held in this slot.
    pub fn order_side(self) -> Side {
        match self {
            SlotSide::Ask => Side::Sell,
            SlotSide::Bid => Side::Buy,
        }
    }
}

impl std::fmt::Display for SlotSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotSide::Ask => write!(f, "ask"),
            SlotSide::Bid => write!(f, "bid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_newtype() {
        let id = OrderId::new(42);
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");

        let id2: OrderId = 7u64.into();
        assert_eq!(id2, OrderId::new(7));
        assert!(OrderId::NONE.is_none());
    }

    #[test]
    fn test_slot_state_accessors() {
        let order = RestingOrder {
            id: OrderId::new(3),
            price: 9_900,
        };
        assert!(SlotState::Empty.is_empty());
        assert_eq!(SlotState::Empty.order(), None);

        let pending = SlotState::Pending(order);
        assert!(pending.is_pending());
        assert_eq!(pending.order(), Some(order));

        let cancelling = SlotState::CancelPending(order);
        assert!(cancelling.is_cancel_pending());
        assert!(!cancelling.is_empty());
        assert_eq!(cancelling.order(), Some(order));
    }

    #[test]
    fn test_slot_side_maps_to_order_side() {
        assert_eq!(SlotSide::Ask.order_side(), Side::Sell);
        assert_eq!(SlotSide::Bid.order_side(), Side::Buy);
    }

    #[test]
    fn test_order_id_serializes_as_number() {
        let json = serde_json::to_string(&OrderId::new(12)).unwrap();
        assert_eq!(json, "12");
    }
}
