//! Paper Execution Gateway
//!
//! Journals every outbound request in memory and emits a structured tracing
//! event for it. Nothing is sent anywhere; replay runs and tests read the
//! journal back to see what the trader asked for.

use tracing::info;

use super::{ExecutionGateway, OutboundRequest};
use crate::orders::OrderId;
use crate::types::{Lifespan, Price, Side, Volume};

/// In-memory execution gateway.
#[derive(Debug, Default, Clone)]
pub struct PaperGateway {
    journal: Vec<OutboundRequest>,
}

impl PaperGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request sent so far, oldest first.
    pub fn requests(&self) -> &[OutboundRequest] {
        &self.journal
    }

    /// Drain the journal, e.g. between test steps.
    pub fn take_requests(&mut self) -> Vec<OutboundRequest> {
        std::mem::take(&mut self.journal)
    }

    pub fn inserts(&self) -> impl Iterator<Item = &OutboundRequest> + '_ {
        self.journal
            .iter()
            .filter(|r| matches!(r, OutboundRequest::Insert { .. }))
    }

    pub fn cancels(&self) -> impl Iterator<Item = &OutboundRequest> + '_ {
        self.journal
            .iter()
            .filter(|r| matches!(r, OutboundRequest::Cancel { .. }))
    }

    pub fn hedges(&self) -> impl Iterator<Item = &OutboundRequest> + '_ {
        self.journal
            .iter()
            .filter(|r| matches!(r, OutboundRequest::Hedge { .. }))
    }
}

impl ExecutionGateway for PaperGateway {
    fn insert_order(
        &mut self,
        id: OrderId,
        side: Side,
        price: Price,
        volume: Volume,
        lifespan: Lifespan,
    ) {
        info!(
            target: "trades",
            request = "INSERT",
            order_id = %id,
            side = %side,
            price,
            volume,
            lifespan = %lifespan,
            "Paper order inserted"
        );
        self.journal.push(OutboundRequest::Insert {
            id,
            side,
            price,
            volume,
            lifespan,
        });
    }

    fn cancel_order(&mut self, id: OrderId) {
        info!(target: "trades", request = "CANCEL", order_id = %id, "Paper cancel requested");
        self.journal.push(OutboundRequest::Cancel { id });
    }

    fn send_hedge_order(&mut self, id: OrderId, side: Side, price: Price, volume: Volume) {
        info!(
            target: "trades",
            request = "HEDGE",
            order_id = %id,
            side = %side,
            price,
            volume,
            "Paper hedge sent"
        );
        self.journal.push(OutboundRequest::Hedge {
            id,
            side,
            price,
            volume,
        });
    }
}
