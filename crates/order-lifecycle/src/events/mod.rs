//! # Events
//!
//! Asynchronous side of the order lifecycle.
//!
//! - [`codec`] - JSON encoding of event payloads
//! - [`log`] - [`EventLog`], an in-process durable log with per-group committed offsets
//! - [`publisher`] - [`EventPublisher`] port and the log-backed "order paid" publisher
//! - [`subscriber`] - [`AssemblySubscriber`], the at-least-once assembly completion consumer

pub mod codec;
pub mod log;
pub mod publisher;
pub mod subscriber;

pub use codec::CodecError;
pub use log::{EventLog, LogConsumer, LogError, Record};
pub use publisher::{EventPublisher, LogPublisher, PublishError};
pub use subscriber::{AssemblySubscriber, HandlerError};
