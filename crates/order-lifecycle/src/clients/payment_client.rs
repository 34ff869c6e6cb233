//! # Payment Client
//!
//! The [`PaymentClient`] port and [`FakePaymentClient`], which approves every charge.
use crate::model::{OrderId, PaymentMethod, TransactionId, UserId};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment service did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Payment declined: {0}")]
    Declined(String),

    #[error("Payment service unavailable: {0}")]
    Unavailable(String),
}

/// Charges a user for an order.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    async fn pay_order(
        &self,
        order_id: OrderId,
        user_id: &UserId,
        payment_method: PaymentMethod,
    ) -> Result<TransactionId, PaymentError>;
}

/// Approves every charge with a fresh UUID transaction id.
#[derive(Debug, Clone, Default)]
pub struct FakePaymentClient;

#[async_trait]
impl PaymentClient for FakePaymentClient {
    async fn pay_order(
        &self,
        order_id: OrderId,
        user_id: &UserId,
        payment_method: PaymentMethod,
    ) -> Result<TransactionId, PaymentError> {
        let transaction_id = TransactionId(Uuid::new_v4().to_string());
        info!(%transaction_id, %order_id, %user_id, %payment_method, "Payment approved");
        Ok(transaction_id)
    }
}
