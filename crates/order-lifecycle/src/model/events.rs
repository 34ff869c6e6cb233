//! Payloads exchanged over the event log.
//!
//! Field names are the JSON wire names.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use uuid::Uuid;

use super::order::{OrderId, PaymentMethod, TransactionId, UserId};

/// Unique id of one event, used by consumers to drop redeliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Published once an order is paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPaid {
    pub event_id: EventId,
    pub order_id: OrderId,
    pub user_id: UserId,
    pub payment_method: PaymentMethod,
    pub transaction_id: TransactionId,
}

/// Consumed when the assembly of a paid order has finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyCompleted {
    pub event_id: EventId,
    pub order_id: OrderId,
    pub user_id: UserId,
    pub build_time_sec: u64,
}
