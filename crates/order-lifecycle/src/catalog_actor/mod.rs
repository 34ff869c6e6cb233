//! # Catalog Actor
//!
//! In-process parts catalog: a [`ResourceActor`] over [`Part`]. It backs
//! [`InMemoryCatalog`](crate::clients::InMemoryCatalog), the catalog adapter used by the demo
//! binary and the tests.
//!
//! Parts are created with a generated UUID id and can be repriced or restocked through
//! [`PartUpdate`](crate::model::PartUpdate). The catalog has no custom actions.

pub mod entity;

use crate::model::{Part, PartId};
use actor_framework::{ResourceActor, ResourceClient};
use uuid::Uuid;

/// Creates a new Catalog actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Part>, ResourceClient<Part>) {
    ResourceActor::new(buffer_size, || PartId(Uuid::new_v4().to_string()))
}
