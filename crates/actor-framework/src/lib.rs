//! # Actor Framework
//!
//! Building blocks for type-safe resource actors on Tokio. Each resource type gets one
//! [`ResourceActor`] that owns every instance of it and processes requests one at a time;
//! callers talk to it through a cheap, cloneable [`ResourceClient`].
//!
//! ## Layers
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain model and lifecycle hooks
//! 2. **Runtime Layer** ([`ResourceActor`]) - message loop and in-memory store
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed requests
//!
//! ## Conditional updates for free
//!
//! Because an actor handles one request at a time, a hook that checks the current state of an
//! entity and then mutates it is atomic with respect to every other request on that store. Two
//! racing updates are serialized; the second one runs its check against the result of the
//! first. `on_update` and `handle_action` run against a copy, so a failing hook leaves the
//! stored entity untouched.
//!
//! ## Context Injection
//!
//! Dependencies are injected at **runtime** through `run(context)` rather than at construction,
//! so actors can be created first and wired afterwards.
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor, ResourceClient};
//! use async_trait::async_trait;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! #[derive(Clone, Debug)] struct Shelf { id: u32, free: u32 }
//! #[derive(Debug)] struct ShelfCreate { free: u32 }
//! #[derive(Debug)] struct ShelfUpdate;
//! #[derive(Debug)] enum ShelfAction { Take(u32) }
//! #[derive(Debug, thiserror::Error)] #[error("shelf is full")] struct ShelfFull;
//!
//! #[async_trait]
//! impl ActorEntity for Shelf {
//!     type Id = u32; type Create = ShelfCreate; type Update = ShelfUpdate;
//!     type Action = ShelfAction; type ActionResult = u32; type Context = (); type Error = ShelfFull;
//!
//!     fn from_create_params(id: u32, params: ShelfCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, free: params.free })
//!     }
//!     async fn on_update(&mut self, _: ShelfUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, action: ShelfAction, _: &()) -> Result<u32, Self::Error> {
//!         match action {
//!             ShelfAction::Take(n) if n <= self.free => { self.free -= n; Ok(self.free) }
//!             ShelfAction::Take(_) => Err(ShelfFull),
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let next = AtomicU32::new(1);
//!     let (actor, client): (_, ResourceClient<Shelf>) =
//!         ResourceActor::new(10, move || next.fetch_add(1, Ordering::SeqCst));
//!     tokio::spawn(actor.run(()));
//!
//!     let shelf = client.create(ShelfCreate { free: 3 }).await.unwrap();
//!     assert_eq!(client.perform_action(shelf.id, ShelfAction::Take(2)).await.unwrap(), 1);
//!
//!     // Rejected: the stored shelf keeps its single free slot.
//!     let err = client.perform_action(shelf.id, ShelfAction::Take(2)).await.unwrap_err();
//!     assert!(err.into_entity_error::<ShelfFull>().is_ok());
//!     assert_eq!(client.get(shelf.id).await.unwrap().unwrap().free, 1);
//! }
//! ```
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers a real `ResourceClient` from scripted expectations, for testing
//! code that sits on top of a client without spawning the actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
