//! Stand-in for the assembly service.
//!
//! Reads "order paid", waits a random build time and answers with "assembly completed". The
//! completion reuses the event id of the paid event it answers.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::TopicsConfig;
use crate::events::codec;
use crate::events::{EventLog, LogConsumer};
use crate::model::{AssemblyCompleted, OrderPaid};

/// Consumer group of the simulator on the "order paid" topic.
pub const ASSEMBLY_GROUP: &str = "assembly";

pub struct AssemblySimulator {
    consumer: LogConsumer,
    log: EventLog,
    completed_topic: String,
    build_time_sec: RangeInclusive<u64>,
}

impl AssemblySimulator {
    pub fn new(log: EventLog, topics: &TopicsConfig, build_time_sec: RangeInclusive<u64>) -> Self {
        Self {
            consumer: log.consumer(&topics.order_paid, ASSEMBLY_GROUP),
            log,
            completed_topic: topics.order_assembled.clone(),
            build_time_sec,
        }
    }

    pub async fn run(self, shutdown: CancellationToken) {
        info!(topic = self.consumer.topic(), "Assembly simulator started");

        loop {
            let record = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                record = self.consumer.next() => match record {
                    Some(record) => record,
                    None => break,
                },
            };

            let paid: OrderPaid = match codec::decode(&record.payload) {
                Ok(paid) => paid,
                Err(e) => {
                    error!(offset = record.offset, error = %e, "Skipping order paid record");
                    self.consumer.commit(&record).await;
                    continue;
                }
            };

            let build_time_sec = rand::rng().random_range(self.build_time_sec.clone());
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(Duration::from_secs(build_time_sec)) => {}
            }

            let completed = AssemblyCompleted {
                event_id: paid.event_id,
                order_id: paid.order_id,
                user_id: paid.user_id,
                build_time_sec,
            };
            let sent = match codec::encode(&completed) {
                Ok(payload) => self
                    .log
                    .append(&self.completed_topic, completed.order_id.to_string(), payload)
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            match sent {
                Ok(_) => {
                    info!(order_id = %completed.order_id, build_time_sec, "Ship assembled");
                    self.consumer.commit(&record).await;
                }
                // Left uncommitted: the log only rejects appends once it is closed.
                Err(e) => {
                    error!(order_id = %completed.order_id, error = %e, "Assembly result not published");
                    break;
                }
            }
        }

        info!("Assembly simulator stopped");
    }
}
