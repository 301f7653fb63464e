//! Order Management Module
//!
//! Provides the single-slot-per-side resting order state machine and the
//! registry used to route venue callbacks to the right slot.
//!
//! # Architecture
//!
//! - `OrderTracker` - Slots plus registry, kept consistent
//! - `OrderSlots` - Ask and bid slot state (`Empty`, `Pending`, `CancelPending`)
//! - `ActiveOrders` - Outstanding id → slot map
//! - Core types - `OrderId`, `SlotState`, `SlotSide`, `RestingOrder`
//!
//! # Example
//!
//! ```
//! use autotrader::orders::{OrderIdGenerator, OrderTracker, SlotSide};
//!
//! let mut ids = OrderIdGenerator::new();
//! let mut tracker = OrderTracker::new();
//! let id = ids.next_id();
//! tracker.open(SlotSide::Bid, id, 9_900).unwrap();
//! assert_eq!(tracker.route(id), Some(SlotSide::Bid));
//! ```

mod tracker;
mod types;

pub use tracker::{ActiveOrders, OrderIdGenerator, OrderSlots, OrderTracker, OrderTrackingError};
pub use types::{OrderId, RestingOrder, SlotSide, SlotState};
