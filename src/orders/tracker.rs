//! Resting-order slots and the active order registry.
//!
//! The trader quotes at most one order per side. `OrderSlots` holds those two
//! slots, `ActiveOrders` maps every outstanding id to its slot so that fills,
//! status updates and errors can be routed without scanning.
//!
//! Both structures are owned exclusively by the trader and mutated from a
//! single event loop, so there is no locking here.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};

use super::types::{OrderId, RestingOrder, SlotSide, SlotState};
use crate::types::Price;

/// Errors from slot operations that would break the one-order-per-side rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderTrackingError {
    /// Slot already holds an order
    #[error("{0} slot already occupied by order {1}")]
    SlotOccupied(SlotSide, OrderId),

    /// Id is already registered
    #[error("Order {0} is already active")]
    DuplicateOrder(OrderId),
}

/// Monotonic client order id source. Ids start at 1; 0 is reserved.
#[derive(Debug, Clone)]
pub struct OrderIdGenerator {
    next: u64,
}

impl OrderIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate the next id.
    pub fn next_id(&mut self) -> OrderId {
        let id = OrderId::new(self.next);
        self.next += 1;
        id
    }

    /// The id the next call to `next_id` will return.
    pub fn peek(&self) -> OrderId {
        OrderId::new(self.next)
    }
}

impl Default for OrderIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of outstanding order ids.
#[derive(Debug, Clone, Default)]
pub struct ActiveOrders {
    orders: HashMap<OrderId, SlotSide>,
}

impl ActiveOrders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an order against its slot.
    pub fn insert(&mut self, id: OrderId, side: SlotSide) -> Result<(), OrderTrackingError> {
        if self.orders.contains_key(&id) {
            return Err(OrderTrackingError::DuplicateOrder(id));
        }
        self.orders.insert(id, side);
        debug!(order_id = %id, slot = %side, "Order registered");
        Ok(())
    }

    /// Remove an order, returning the slot it was registered against.
    pub fn remove(&mut self, id: OrderId) -> Option<SlotSide> {
        self.orders.remove(&id)
    }

    pub fn slot_of(&self, id: OrderId) -> Option<SlotSide> {
        self.orders.get(&id).copied()
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.orders.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of active ids registered against `side`.
    pub fn count_for(&self, side: SlotSide) -> usize {
        self.orders.values().filter(|s| **s == side).count()
    }
}

/// The ask and bid slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderSlots {
    ask: SlotState,
    bid: SlotState,
}

impl OrderSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, side: SlotSide) -> SlotState {
        match side {
            SlotSide::Ask => self.ask,
            SlotSide::Bid => self.bid,
        }
    }

    fn get_mut(&mut self, side: SlotSide) -> &mut SlotState {
        match side {
            SlotSide::Ask => &mut self.ask,
            SlotSide::Bid => &mut self.bid,
        }
    }

    pub fn is_empty(&self, side: SlotSide) -> bool {
        self.get(side).is_empty()
    }

    /// Occupy an empty slot with a freshly inserted order.
    pub fn occupy(
        &mut self,
        side: SlotSide,
        id: OrderId,
        price: Price,
    ) -> Result<(), OrderTrackingError> {
        let slot = self.get_mut(side);
        if let Some(existing) = slot.order() {
            return Err(OrderTrackingError::SlotOccupied(side, existing.id));
        }
        *slot = SlotState::Pending(RestingOrder { id, price });
        Ok(())
    }

    /// Move a pending order to `CancelPending`.
    ///
    /// Returns the order when the transition happened; a slot that is empty
    /// or already cancelling is left untouched.
    pub fn mark_cancel_pending(&mut self, side: SlotSide) -> Option<RestingOrder> {
        let slot = self.get_mut(side);
        match *slot {
            SlotState::Pending(order) => {
                *slot = SlotState::CancelPending(order);
                Some(order)
            }
            _ => None,
        }
    }

    /// Clear whichever slot currently holds `id`.
    pub fn clear_order(&mut self, id: OrderId) -> Option<SlotSide> {
        for side in [SlotSide::Ask, SlotSide::Bid] {
            let slot = self.get_mut(side);
            if slot.order().map(|o| o.id) == Some(id) {
                *slot = SlotState::Empty;
                return Some(side);
            }
        }
        None
    }

    /// Slot currently holding `id`, if any.
    pub fn side_of(&self, id: OrderId) -> Option<SlotSide> {
        [SlotSide::Ask, SlotSide::Bid]
            .into_iter()
            .find(|side| self.get(*side).order().map(|o| o.id) == Some(id))
    }
}

/// Slots plus registry, kept consistent with each other.
#[derive(Debug, Clone, Default)]
pub struct OrderTracker {
    slots: OrderSlots,
    active: ActiveOrders,
}

impl OrderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &ActiveOrders {
        &self.active
    }

    pub fn slot(&self, side: SlotSide) -> SlotState {
        self.slots.get(side)
    }

    /// Record a newly inserted resting order in its slot and the registry.
    pub fn open(
        &mut self,
        side: SlotSide,
        id: OrderId,
        price: Price,
    ) -> Result<(), OrderTrackingError> {
        if self.active.contains(id) {
            return Err(OrderTrackingError::DuplicateOrder(id));
        }
        self.slots.occupy(side, id, price)?;
        self.active.insert(id, side)
    }

    /// Mark the order in `side` as cancel-in-flight.
    pub fn begin_cancel(&mut self, side: SlotSide) -> Option<RestingOrder> {
        self.slots.mark_cancel_pending(side)
    }

    /// Retire an order: clear its slot and drop it from the registry.
    ///
    /// Returns the slot it occupied, `None` for unknown ids.
    pub fn retire(&mut self, id: OrderId) -> Option<SlotSide> {
        let registered = self.active.remove(id);
        let cleared = self.slots.clear_order(id);
        if registered != cleared {
            warn!(
                order_id = %id,
                registered = ?registered,
                cleared = ?cleared,
                "Slot and registry disagreed while retiring order"
            );
        }
        registered.or(cleared)
    }

    /// Slot an active order belongs to.
    pub fn route(&self, id: OrderId) -> Option<SlotSide> {
        self.active.slot_of(id).or_else(|| self.slots.side_of(id))
    }

    pub fn is_active(&self, id: OrderId) -> bool {
        self.active.contains(id)
    }
}
