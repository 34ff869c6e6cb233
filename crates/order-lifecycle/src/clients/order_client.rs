//! # Order Client
//!
//! Provides a high-level API for interacting with the `Order` actor.
//! It wraps a `ResourceClient<Order>` and exposes one method per status transition.
use crate::model::{EventId, Order, OrderCreate, OrderId, OrderUpdate, PaymentMethod, TransactionId};
use crate::order_actor::{AssemblyOutcome, OrderAction, OrderError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Order actor.
///
/// Transition checks run in the actor; this client only shapes requests and turns the boxed
/// entity error back into an [`OrderError`].
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Like [`ActorClient::get`], but an absent order is an error.
    pub async fn get_order(&self, id: OrderId) -> Result<Order, OrderError> {
        self.get(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn mark_paid(
        &self,
        id: OrderId,
        transaction_id: TransactionId,
        payment_method: PaymentMethod,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .update(
                id,
                OrderUpdate::MarkPaid {
                    transaction_id,
                    payment_method,
                },
            )
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn cancel(&self, id: OrderId) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .update(id, OrderUpdate::Cancel)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn complete_assembly(
        &self,
        id: OrderId,
        event_id: EventId,
    ) -> Result<AssemblyOutcome, OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, OrderAction::CompleteAssembly { event_id })
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => other
                .into_entity_error::<OrderError>()
                .unwrap_or_else(OrderError::Store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PartId, UserId};
    use actor_framework::mock::{create_mock_client, expect_action, expect_update, MockClient};

    #[tokio::test]
    async fn test_entity_error_is_recovered() {
        let (client, mut receiver) = create_mock_client::<Order>(10);
        let order_client = OrderClient::new(client);
        let order_id = OrderId::new();

        let cancel_task = tokio::spawn(async move { order_client.cancel(order_id).await });

        let (id, update, responder) = expect_update(&mut receiver)
            .await
            .expect("Expected Update request");
        assert_eq!(id, order_id);
        assert!(matches!(update, OrderUpdate::Cancel));

        responder
            .send(Err(FrameworkError::EntityError(Box::new(
                OrderError::AlreadyPaid(order_id),
            ))))
            .unwrap();

        let result = cancel_task.await.unwrap();
        assert!(matches!(result, Err(OrderError::AlreadyPaid(id)) if id == order_id));
    }

    #[tokio::test]
    async fn test_framework_errors_pass_through() {
        let (client, mut receiver) = create_mock_client::<Order>(10);
        let order_client = OrderClient::new(client);
        let order_id = OrderId::new();

        let task = tokio::spawn(async move {
            order_client
                .complete_assembly(order_id, EventId::new())
                .await
        });

        let (_, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert!(matches!(action, OrderAction::CompleteAssembly { .. }));
        responder
            .send(Err(FrameworkError::NotFound(order_id.to_string())))
            .unwrap();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(OrderError::NotFound(id)) if id == order_id.to_string()));
    }

    #[tokio::test]
    async fn test_get_order_absent_is_not_found() {
        let mut mock = MockClient::<Order>::new();
        let order_id = OrderId::new();
        mock.expect_get(order_id).return_ok(None);

        let order_client = OrderClient::new(mock.client());
        let err = order_client.get_order(order_id).await.unwrap_err();
        assert!(matches!(err, OrderError::NotFound(_)));
        mock.verify();
    }

    #[tokio::test]
    async fn test_closed_store_is_a_store_error() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_create().return_err(FrameworkError::ActorClosed);

        let order_client = OrderClient::new(mock.client());
        let err = order_client
            .create_order(OrderCreate {
                user_id: UserId::from("u1"),
                part_ids: vec![PartId::from("p1")],
                total_price: 1.0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Store(FrameworkError::ActorClosed)));
        mock.verify();
    }
}
