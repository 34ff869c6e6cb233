//! # Clients
//!
//! Typed handles the orchestrator works through.
//!
//! - [`OrderClient`] wraps the order actor's `ResourceClient` and recovers [`OrderError`](crate::order_actor::OrderError)
//!   from framework errors.
//! - [`CatalogClient`] and [`PaymentClient`] are the ports to the catalog and payment services,
//!   with in-process adapters ([`InMemoryCatalog`], [`FakePaymentClient`]).

pub mod catalog_client;
pub mod order_client;
pub mod payment_client;

pub use catalog_client::*;
pub use order_client::*;
pub use payment_client::*;
