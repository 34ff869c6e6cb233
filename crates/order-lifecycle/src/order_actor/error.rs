//! Error types for the Order actor and every operation built on it.

use actor_framework::FrameworkError;
use thiserror::Error;

use super::Transition;
use crate::clients::{CatalogError, PaymentError};
use crate::events::PublishError;
use crate::model::{OrderId, OrderStatus, PartId, TransactionId};

/// Errors that can occur during order operations.
///
/// The first group is the domain taxonomy, raised by the state machine or the orchestrator. The
/// second group passes collaborator failures through unchanged.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// At least one requested part is missing from the catalog, or no part was requested.
    #[error("Parts not found: {missing:?}")]
    PartsNotFound { missing: Vec<PartId> },

    #[error("Order {0} is already paid")]
    AlreadyPaid(OrderId),

    #[error("Order {0} is cancelled")]
    Cancelled(OrderId),

    /// The transition is not legal from the current status.
    #[error("Order {order_id} is {status}, cannot {transition}")]
    InvalidStatus {
        order_id: OrderId,
        status: OrderStatus,
        transition: Transition,
    },

    /// Only a paid order has a payment to announce.
    #[error("Order {order_id} is {status}, not paid")]
    NotPaid {
        order_id: OrderId,
        status: OrderStatus,
    },

    #[error("Catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Payment: {0}")]
    Payment(#[from] PaymentError),

    #[error("Order store: {0}")]
    Store(#[from] FrameworkError),

    /// The user was charged but the order could not be marked paid, usually because a
    /// concurrent cancel or pay got there first. The charge needs reconciling.
    #[error("Payment {transaction_id} charged but not recorded: {source}")]
    Charged {
        transaction_id: TransactionId,
        #[source]
        source: Box<OrderError>,
    },

    /// The order is paid but the "order paid" event may not have reached the log.
    #[error("Payment {transaction_id} succeeded, order paid event not published: {source}")]
    Publish {
        transaction_id: TransactionId,
        #[source]
        source: PublishError,
    },
}
