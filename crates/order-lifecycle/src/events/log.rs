//! In-process durable event log.
//!
//! Topics are append-only sequences of [`Record`]s. Each consumer group has one committed
//! offset per topic; a [`LogConsumer`] always reads the first record its group has not
//! committed, so a record that is not committed is delivered again.
//!
//! Records stay in memory until [`EventLog::compact`] drops the prefix every known group has
//! committed. Offsets are never reused after compaction.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub topic: String,
    pub offset: u64,
    pub key: String,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LogError {
    #[error("Event log is closed")]
    Closed,
}

#[derive(Default)]
struct Topic {
    /// Offset of `records[0]`.
    base: u64,
    records: Vec<Record>,
    /// Next offset to deliver, per consumer group.
    committed: HashMap<String, u64>,
}

#[derive(Default)]
struct LogState {
    topics: HashMap<String, Topic>,
    closed: bool,
}

/// Shared handle to the log. Clones refer to the same topics.
#[derive(Clone, Default)]
pub struct EventLog {
    state: Arc<Mutex<LogState>>,
    appended: Arc<Notify>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record and returns its offset.
    pub async fn append(
        &self,
        topic: &str,
        key: impl Into<String>,
        payload: Vec<u8>,
    ) -> Result<u64, LogError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(LogError::Closed);
        }
        let entry = state.topics.entry(topic.to_string()).or_default();
        let offset = entry.base + entry.records.len() as u64;
        entry.records.push(Record {
            topic: topic.to_string(),
            offset,
            key: key.into(),
            payload,
        });
        drop(state);

        debug!(topic, offset, "Appended");
        self.appended.notify_waiters();
        Ok(offset)
    }

    /// Every retained record of `topic`, committed or not.
    pub async fn records(&self, topic: &str) -> Vec<Record> {
        let state = self.state.lock().await;
        state
            .topics
            .get(topic)
            .map(|t| t.records.clone())
            .unwrap_or_default()
    }

    /// The next offset `group` will read from `topic`.
    pub async fn committed(&self, topic: &str, group: &str) -> u64 {
        let state = self.state.lock().await;
        state
            .topics
            .get(topic)
            .and_then(|t| t.committed.get(group).copied())
            .unwrap_or(0)
    }

    /// Drops the records of `topic` that every group reading it has committed, and returns how
    /// many were dropped. A topic nobody has committed on keeps everything.
    pub async fn compact(&self, topic: &str) -> usize {
        let mut state = self.state.lock().await;
        let Some(entry) = state.topics.get_mut(topic) else {
            return 0;
        };
        let Some(low) = entry.committed.values().copied().min() else {
            return 0;
        };
        let dropped = low.saturating_sub(entry.base).min(entry.records.len() as u64) as usize;
        entry.records.drain(..dropped);
        entry.base += dropped as u64;
        if dropped > 0 {
            debug!(topic, dropped, base = entry.base, "Compacted");
        }
        dropped
    }

    pub fn consumer(&self, topic: impl Into<String>, group: impl Into<String>) -> LogConsumer {
        LogConsumer {
            log: self.clone(),
            topic: topic.into(),
            group: group.into(),
        }
    }

    /// Rejects further appends and ends every waiting consumer. Records stay readable.
    pub async fn close(&self) {
        self.state.lock().await.closed = true;
        self.appended.notify_waiters();
        info!("Event log closed");
    }
}

/// Reads one topic on behalf of one consumer group.
pub struct LogConsumer {
    log: EventLog,
    topic: String,
    group: String,
}

impl LogConsumer {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Waits for the first uncommitted record of this group.
    ///
    /// Returns `None` once the log is closed and the group has nothing left to read.
    pub async fn next(&self) -> Option<Record> {
        loop {
            let appended = self.log.appended.notified();
            tokio::pin!(appended);
            appended.as_mut().enable();

            {
                let state = self.log.state.lock().await;
                if let Some(topic) = state.topics.get(&self.topic) {
                    let offset = topic.committed.get(&self.group).copied().unwrap_or(0);
                    // A group that joins after compaction starts at the oldest retained record.
                    let index = offset.saturating_sub(topic.base) as usize;
                    if let Some(record) = topic.records.get(index) {
                        return Some(record.clone());
                    }
                }
                if state.closed {
                    return None;
                }
            }

            appended.await;
        }
    }

    /// Marks `record` and everything before it as consumed by this group.
    pub async fn commit(&self, record: &Record) {
        let mut state = self.log.state.lock().await;
        let topic = state.topics.entry(self.topic.clone()).or_default();
        let next = topic.committed.entry(self.group.clone()).or_insert(0);
        *next = (*next).max(record.offset + 1);
        debug!(topic = %self.topic, group = %self.group, offset = record.offset, "Committed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_uncommitted_record_is_redelivered() {
        let log = EventLog::new();
        log.append("t", "k", b"one".to_vec()).await.unwrap();
        log.append("t", "k", b"two".to_vec()).await.unwrap();

        let consumer = log.consumer("t", "g");
        let first = consumer.next().await.unwrap();
        assert_eq!(first.offset, 0);
        assert_eq!(consumer.next().await.unwrap(), first);

        consumer.commit(&first).await;
        assert_eq!(consumer.next().await.unwrap().payload, b"two".to_vec());
        assert_eq!(log.committed("t", "g").await, 1);
    }

    #[tokio::test]
    async fn test_groups_have_independent_offsets() {
        let log = EventLog::new();
        log.append("t", "k", b"one".to_vec()).await.unwrap();

        let a = log.consumer("t", "a");
        let b = log.consumer("t", "b");
        let record = a.next().await.unwrap();
        a.commit(&record).await;

        assert_eq!(b.next().await.unwrap().offset, 0);
        assert_eq!(log.committed("t", "a").await, 1);
        assert_eq!(log.committed("t", "b").await, 0);
    }

    #[tokio::test]
    async fn test_next_waits_for_append() {
        let log = EventLog::new();
        let consumer = log.consumer("t", "g");
        let waiter = tokio::spawn(async move { consumer.next().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        log.append("t", "order-1", b"late".to_vec()).await.unwrap();

        let record = waiter.await.unwrap().unwrap();
        assert_eq!(record.key, "order-1");
    }

    #[tokio::test]
    async fn test_close_ends_consumers_and_rejects_appends() {
        let log = EventLog::new();
        let consumer = log.consumer("t", "g");
        let waiter = tokio::spawn(async move { consumer.next().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        log.close().await;

        assert!(waiter.await.unwrap().is_none());
        assert_eq!(
            log.append("t", "k", Vec::new()).await.unwrap_err(),
            LogError::Closed
        );
    }

    #[tokio::test]
    async fn test_compact_drops_what_every_group_committed() {
        let log = EventLog::new();
        for payload in [b"one", b"two", b"six"] {
            log.append("t", "k", payload.to_vec()).await.unwrap();
        }
        assert_eq!(log.compact("t").await, 0);

        let fast = log.consumer("t", "fast");
        let slow = log.consumer("t", "slow");
        for _ in 0..2 {
            let record = fast.next().await.unwrap();
            fast.commit(&record).await;
        }
        let record = slow.next().await.unwrap();
        slow.commit(&record).await;

        assert_eq!(log.compact("t").await, 1);
        let offsets: Vec<u64> = log.records("t").await.iter().map(|r| r.offset).collect();
        assert_eq!(offsets, vec![1, 2]);

        assert_eq!(slow.next().await.unwrap().offset, 1);
        assert_eq!(fast.next().await.unwrap().offset, 2);
        assert_eq!(log.append("t", "k", b"ten".to_vec()).await.unwrap(), 3);

        let late = log.consumer("t", "late");
        assert_eq!(late.next().await.unwrap().offset, 1);
    }
}
