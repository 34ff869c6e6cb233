//! "Order paid" publishing.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use super::codec::{self, CodecError};
use super::log::{EventLog, LogError};
use crate::model::OrderPaid;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Log(#[from] LogError),
}

/// Emits lifecycle events to a durable log.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish_order_paid(&self, event: &OrderPaid) -> Result<(), PublishError>;
}

/// Publishes to one topic of an [`EventLog`], keyed by order id.
#[derive(Clone)]
pub struct LogPublisher {
    log: EventLog,
    topic: String,
}

impl LogPublisher {
    pub fn new(log: EventLog, topic: impl Into<String>) -> Self {
        Self {
            log,
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn publish_order_paid(&self, event: &OrderPaid) -> Result<(), PublishError> {
        let payload = codec::encode(event)?;
        let offset = self
            .log
            .append(&self.topic, event.order_id.to_string(), payload)
            .await?;
        info!(
            topic = %self.topic,
            offset,
            event_id = %event.event_id,
            order_id = %event.order_id,
            "Published order paid"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventId, OrderId, PaymentMethod, TransactionId, UserId};

    fn paid() -> OrderPaid {
        OrderPaid {
            event_id: EventId::new(),
            order_id: OrderId::new(),
            user_id: UserId::from("u1"),
            payment_method: PaymentMethod::Sbp,
            transaction_id: TransactionId::from("t1"),
        }
    }

    #[tokio::test]
    async fn test_record_is_keyed_by_order_id() {
        let log = EventLog::new();
        let publisher = LogPublisher::new(log.clone(), "order.paid");
        let event = paid();

        publisher.publish_order_paid(&event).await.unwrap();

        let records = log.records("order.paid").await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, event.order_id.to_string());
        let decoded: OrderPaid = codec::decode(&records[0].payload).unwrap();
        assert_eq!(decoded, event);
    }

    #[tokio::test]
    async fn test_closed_log_fails_publish() {
        let log = EventLog::new();
        log.close().await;
        let publisher = LogPublisher::new(log, "order.paid");

        let err = publisher.publish_order_paid(&paid()).await.unwrap_err();
        assert!(matches!(err, PublishError::Log(LogError::Closed)));
    }
}
