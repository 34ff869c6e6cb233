//! # Assembly Subscriber
//!
//! Consumes assembly completion events and moves the referenced order from `paid` to
//! `completed`.
//!
//! Delivery is at least once. Repeats are absorbed twice over: recently handled event ids are
//! remembered and skipped, and the order entity itself answers `Duplicate` for an order that is
//! already completed.
//!
//! A record is committed once it is handled. A failure that may succeed later (the order store
//! was unreachable) leaves the record uncommitted so the log delivers it again, up to
//! `max_redeliveries` times. Any other failure is logged and the record is committed; it never
//! stops the loop.

use std::collections::{HashSet, VecDeque};

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::codec::{self, CodecError};
use super::log::{LogConsumer, Record};
use crate::clients::OrderClient;
use crate::config::SubscriberConfig;
use crate::model::{AssemblyCompleted, EventId};
use crate::order_actor::{AssemblyOutcome, OrderError};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Order(#[from] OrderError),
}

impl HandlerError {
    /// Only store plumbing failures are worth another delivery.
    pub fn is_retryable(&self) -> bool {
        matches!(self, HandlerError::Order(OrderError::Store(_)))
    }
}

/// Bounded memory of handled event ids. The oldest id is forgotten first.
struct RecentEvents {
    ids: HashSet<EventId>,
    order: VecDeque<EventId>,
    capacity: usize,
}

impl RecentEvents {
    fn new(capacity: usize) -> Self {
        Self {
            ids: HashSet::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn contains(&self, id: &EventId) -> bool {
        self.ids.contains(id)
    }

    fn insert(&mut self, id: EventId) {
        if self.capacity == 0 || !self.ids.insert(id) {
            return;
        }
        self.order.push_back(id);
        if self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
    }
}

pub struct AssemblySubscriber {
    consumer: LogConsumer,
    orders: OrderClient,
    settings: SubscriberConfig,
    recent: RecentEvents,
}

impl AssemblySubscriber {
    pub fn new(consumer: LogConsumer, orders: OrderClient, settings: SubscriberConfig) -> Self {
        let recent = RecentEvents::new(settings.dedup_capacity);
        Self {
            consumer,
            orders,
            settings,
            recent,
        }
    }

    /// Handles one payload.
    pub async fn handle(&mut self, payload: &[u8]) -> Result<AssemblyOutcome, HandlerError> {
        let event: AssemblyCompleted = codec::decode(payload)?;

        if self.recent.contains(&event.event_id) {
            debug!(event_id = %event.event_id, order_id = %event.order_id, "Already handled");
            return Ok(AssemblyOutcome::Duplicate);
        }

        let outcome = self
            .orders
            .complete_assembly(event.order_id, event.event_id)
            .await?;
        self.recent.insert(event.event_id);

        info!(
            event_id = %event.event_id,
            order_id = %event.order_id,
            user_id = %event.user_id,
            build_time_sec = event.build_time_sec,
            ?outcome,
            "Assembly handled"
        );
        Ok(outcome)
    }

    /// Consumes until `shutdown` is cancelled or the log is closed.
    ///
    /// A record being handled when `shutdown` fires is finished and committed first.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(
            topic = self.consumer.topic(),
            group = self.consumer.group(),
            "Assembly subscriber started"
        );

        let mut deliveries: u32 = 0;
        loop {
            let record = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                record = self.consumer.next() => match record {
                    Some(record) => record,
                    None => break,
                },
            };

            deliveries += 1;
            match self.handle(&record.payload).await {
                Ok(_) => {
                    self.consumer.commit(&record).await;
                    deliveries = 0;
                }
                Err(e) if e.is_retryable() && deliveries <= self.settings.max_redeliveries => {
                    warn!(
                        topic = %record.topic,
                        offset = record.offset,
                        delivery = deliveries,
                        error = %e,
                        "Assembly event failed, awaiting redelivery"
                    );
                    tokio::select! {
                        biased;
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(self.settings.redelivery_backoff()) => {}
                    }
                }
                Err(e) => {
                    self.skip(&record, &e).await;
                    deliveries = 0;
                }
            }
        }

        info!(topic = self.consumer.topic(), "Assembly subscriber stopped");
    }

    async fn skip(&self, record: &Record, e: &HandlerError) {
        error!(
            topic = %record.topic,
            offset = record.offset,
            key = %record.key,
            error = %e,
            "Assembly event dropped"
        );
        self.consumer.commit(record).await;
    }
}
