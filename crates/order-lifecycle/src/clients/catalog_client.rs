//! # Catalog Client
//!
//! The [`CatalogClient`] port the orchestrator prices orders through, and [`InMemoryCatalog`],
//! an adapter backed by the [catalog actor](crate::catalog_actor).
use crate::catalog_actor::entity::PartError;
use crate::model::{Part, PartCreate, PartId, PartUpdate, PartsFilter};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// The catalog refused the part itself.
    #[error("Invalid part: {0}")]
    InvalidPart(#[from] PartError),
}

/// Read access to the parts catalog.
///
/// A result shorter than the requested id set means some of the ids do not exist.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn list_parts(&self, filter: PartsFilter) -> Result<Vec<Part>, CatalogError>;
}

/// Catalog adapter over the in-process catalog actor.
#[derive(Clone)]
pub struct InMemoryCatalog {
    inner: ResourceClient<Part>,
}

impl InMemoryCatalog {
    pub fn new(inner: ResourceClient<Part>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn add_part(&self, params: PartCreate) -> Result<Part, CatalogError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_part(&self, id: PartId, update: PartUpdate) -> Result<Part, CatalogError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Part> for InMemoryCatalog {
    type Error = CatalogError;

    fn inner(&self) -> &ResourceClient<Part> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<PartError>() {
            Ok(invalid) => CatalogError::InvalidPart(invalid),
            Err(other) => CatalogError::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalog {
    #[instrument(skip(self))]
    async fn list_parts(&self, filter: PartsFilter) -> Result<Vec<Part>, CatalogError> {
        let candidates = if filter.ids.is_empty() {
            self.list().await?
        } else {
            let mut seen = HashSet::new();
            let ids: Vec<PartId> = filter
                .ids
                .iter()
                .filter(|id| seen.insert(*id))
                .cloned()
                .collect();
            self.inner.get_many(ids).await.map_err(Self::map_error)?
        };

        let parts: Vec<Part> = candidates
            .into_iter()
            .filter(|part| filter.matches(part))
            .collect();
        debug!(found = parts.len(), "Listed parts");
        Ok(parts)
    }
}
