//! # Order Orchestrator
//!
//! The synchronous API of the order lifecycle: Create, Get, Pay and Cancel.
//!
//! The orchestrator owns no state. Orders live in the order actor, whose hooks enforce the
//! state machine; the orchestrator sequences the calls to the catalog, the payment service, the
//! store and the publisher, and bounds the remote calls with timeouts.
//!
//! There is no compensation across services. If the payment succeeds and the publish fails,
//! the order stays paid and the caller gets [`OrderError::Publish`] with the transaction id;
//! [`OrderOrchestrator::republish_paid`] retries the publish alone.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, instrument, warn};

use crate::clients::{CatalogClient, CatalogError, OrderClient, PaymentClient, PaymentError};
use crate::config::OrderConfig;
use crate::events::EventPublisher;
use crate::model::{
    EventId, Order, OrderCreate, OrderId, OrderPaid, OrderStatus, PartId, PartsFilter,
    PaymentMethod, TransactionId, UserId,
};
use crate::order_actor::{OrderError, Transition};

/// Upper bounds on the remote calls made by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub catalog: Duration,
    pub payment: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            catalog: Duration::from_secs(5),
            payment: Duration::from_secs(3),
        }
    }
}

impl From<&OrderConfig> for Timeouts {
    fn from(config: &OrderConfig) -> Self {
        Self {
            catalog: config.catalog_timeout(),
            payment: config.payment_timeout(),
        }
    }
}

#[derive(Clone)]
pub struct OrderOrchestrator {
    orders: OrderClient,
    catalog: Arc<dyn CatalogClient>,
    payments: Arc<dyn PaymentClient>,
    publisher: Arc<dyn EventPublisher>,
    timeouts: Timeouts,
}

impl OrderOrchestrator {
    pub fn new(
        orders: OrderClient,
        catalog: Arc<dyn CatalogClient>,
        payments: Arc<dyn PaymentClient>,
        publisher: Arc<dyn EventPublisher>,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            orders,
            catalog,
            payments,
            publisher,
            timeouts,
        }
    }

    /// Prices `part_ids` against the catalog and stores a pending order.
    ///
    /// The catalog must return exactly one part per requested id. An id that is unknown to the
    /// catalog, or listed more than once, fails the request with
    /// [`OrderError::PartsNotFound`] naming it.
    #[instrument(skip(self))]
    pub async fn create(&self, user_id: UserId, part_ids: Vec<PartId>) -> Result<Order, OrderError> {
        if part_ids.is_empty() {
            return Err(OrderError::PartsNotFound {
                missing: Vec::new(),
            });
        }

        let parts = tokio::time::timeout(
            self.timeouts.catalog,
            self.catalog.list_parts(PartsFilter::by_ids(part_ids.clone())),
        )
        .await
        .map_err(|_| CatalogError::Timeout(self.timeouts.catalog))??;

        if parts.len() != part_ids.len() {
            let found: HashSet<&PartId> = parts.iter().map(|p| &p.id).collect();
            let mut seen = HashSet::new();
            let missing: Vec<PartId> = part_ids
                .iter()
                .filter(|id| !found.contains(id) || !seen.insert(*id))
                .cloned()
                .collect();
            warn!(?missing, "Parts not in catalog or requested twice");
            return Err(OrderError::PartsNotFound { missing });
        }

        let total_price: f64 = parts.iter().map(|p| p.price).sum();
        let order = self
            .orders
            .create_order(OrderCreate {
                user_id,
                part_ids,
                total_price,
            })
            .await?;

        info!(order_id = %order.order_id, total_price, "Order created");
        Ok(order)
    }

    pub async fn get(&self, order_id: OrderId) -> Result<Order, OrderError> {
        self.orders.get_order(order_id).await
    }

    /// Charges the user and marks the order paid, then publishes "order paid".
    ///
    /// The status check runs twice: once before charging, so a paid or cancelled order is never
    /// charged, and again inside the store when the payment is recorded. If the second check or
    /// the store fails after the charge, the error is [`OrderError::Charged`] carrying the
    /// transaction id.
    #[instrument(skip(self))]
    pub async fn pay(
        &self,
        order_id: OrderId,
        payment_method: PaymentMethod,
    ) -> Result<TransactionId, OrderError> {
        let order = self.orders.get_order(order_id).await?;
        order.advance(Transition::Pay)?;

        let transaction_id = tokio::time::timeout(
            self.timeouts.payment,
            self.payments
                .pay_order(order_id, &order.user_id, payment_method),
        )
        .await
        .map_err(|_| PaymentError::Timeout(self.timeouts.payment))??;

        let paid = match self
            .orders
            .mark_paid(order_id, transaction_id.clone(), payment_method)
            .await
        {
            Ok(paid) => paid,
            Err(source) => {
                error!(%order_id, %transaction_id, error = %source, "Charge not recorded on order");
                return Err(OrderError::Charged {
                    transaction_id,
                    source: Box::new(source),
                });
            }
        };
        info!(%order_id, %transaction_id, %payment_method, "Order paid");

        self.publish_paid(&paid).await?;
        Ok(transaction_id)
    }

    /// Cancels a pending order.
    #[instrument(skip(self))]
    pub async fn cancel(&self, order_id: OrderId) -> Result<(), OrderError> {
        self.orders.cancel(order_id).await?;
        info!(%order_id, "Order cancelled");
        Ok(())
    }

    /// Publishes "order paid" again for a paid order, with a fresh event id.
    #[instrument(skip(self))]
    pub async fn republish_paid(&self, order_id: OrderId) -> Result<EventId, OrderError> {
        let order = self.orders.get_order(order_id).await?;
        self.publish_paid(&order).await
    }

    async fn publish_paid(&self, order: &Order) -> Result<EventId, OrderError> {
        let (OrderStatus::Paid, Some(transaction_id), Some(payment_method)) =
            (order.status, &order.transaction_id, order.payment_method)
        else {
            return Err(OrderError::NotPaid {
                order_id: order.order_id,
                status: order.status,
            });
        };

        let event = OrderPaid {
            event_id: EventId::new(),
            order_id: order.order_id,
            user_id: order.user_id.clone(),
            payment_method,
            transaction_id: transaction_id.clone(),
        };
        match self.publisher.publish_order_paid(&event).await {
            Ok(()) => Ok(event.event_id),
            Err(source) => {
                warn!(order_id = %order.order_id, error = %source, "Order paid event not published");
                Err(OrderError::Publish {
                    transaction_id: transaction_id.clone(),
                    source,
                })
            }
        }
    }
}
