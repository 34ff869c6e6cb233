//! # Order Lifecycle
//!
//! Drives a purchase order from creation through payment to assembly completion.
//!
//! - **[model]**: plain data ([`Order`](model::Order), [`Part`](model::Part), event payloads).
//! - **[order_actor]**: the order store, an [`ActorEntity`](actor_framework::ActorEntity) whose
//!   hooks hold the status state machine.
//! - **[catalog_actor]**: in-process parts catalog used by the demo and the tests.
//! - **[clients]**: the order store client and the catalog / payment ports with their adapters.
//! - **[events]**: JSON codec, the in-process event log, the "order paid" publisher and the
//!   assembly subscriber.
//! - **[orchestrator]**: Create / Get / Pay / Cancel on top of the ports.
//! - **[lifecycle]**: wiring, graceful shutdown and tracing setup.

pub mod catalog_actor;
pub mod clients;
pub mod config;
pub mod events;
pub mod lifecycle;
pub mod model;
pub mod orchestrator;
pub mod order_actor;
