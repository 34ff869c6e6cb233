//! # Order Actor
//!
//! The order store: a [`ResourceActor`] over [`Order`] whose hooks enforce the status state
//! machine.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`], the taxonomy shared by the store and the orchestrator
//! - [`actions`] - [`OrderAction`] and [`AssemblyOutcome`] for assembly completion
//! - [`new()`] - Factory function that creates the actor and its client
//!
//! ## State machine
//!
//! ```text
//! pending_payment --Pay--> paid --Complete--> completed
//!        |
//!        +------Cancel--> cancelled
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use order_lifecycle::model::{OrderCreate, OrderStatus, PartId, PaymentMethod, TransactionId, UserId};
//! use order_lifecycle::order_actor::{self, OrderError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), OrderError> {
//!     let (actor, client) = order_actor::new(32);
//!     tokio::spawn(actor.run(()));
//!
//!     let order = client
//!         .create_order(OrderCreate {
//!             user_id: UserId::from("user-1"),
//!             part_ids: vec![PartId::from("engine")],
//!             total_price: 100.0,
//!         })
//!         .await?;
//!
//!     let paid = client
//!         .mark_paid(order.order_id, TransactionId::from("t1"), PaymentMethod::Card)
//!         .await?;
//!     assert_eq!(paid.status, OrderStatus::Paid);
//!
//!     // Cancelling a paid order is rejected inside the actor.
//!     assert!(matches!(
//!         client.cancel(order.order_id).await,
//!         Err(OrderError::AlreadyPaid(_))
//!     ));
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use std::fmt::{self, Display};

use crate::clients::OrderClient;
use crate::model::{Order, OrderId};
use actor_framework::ResourceActor;

/// A requested status change, checked against the current status by [`Order::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Pay,
    Cancel,
    Complete,
}

impl Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Transition::Pay => "pay",
            Transition::Cancel => "cancel",
            Transition::Complete => "complete",
        })
    }
}

/// Creates a new Order actor and its client. Every created order gets a fresh UUID v4.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size, OrderId::new);
    (actor, OrderClient::new(generic_client))
}
