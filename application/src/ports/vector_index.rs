//! Vector index port

use async_trait::async_trait;
use scholia_domain::{ResolvedFilter, ResourceId, RetrievedResource};
use thiserror::Error;

/// Errors raised by the vector index
#[derive(Error, Debug, Clone)]
pub enum VectorIndexError {
    #[error("Vector index unavailable: {0}")]
    Unavailable(String),

    #[error("Vector index request failed: {0}")]
    RequestFailed(String),

    #[error("Vector index response invalid: {0}")]
    InvalidResponse(String),
}

/// One nearest-neighbour lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorQuery {
    pub vector: Vec<f32>,
    pub limit: usize,
    pub filter: Option<ResolvedFilter>,
}

/// A point returned by the index, in rank order.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexPoint {
    pub id: ResourceId,
    pub score: f32,
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl IndexPoint {
    pub fn into_resource(self) -> RetrievedResource {
        RetrievedResource::from_payload(self.id, &self.payload)
    }
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Nearest neighbours for a single query, best first.
    async fn search(&self, query: &VectorQuery) -> Result<Vec<IndexPoint>, VectorIndexError>;

    /// One result list per submitted query, in submission order, from a
    /// single round trip. The whole call fails if any query fails.
    async fn search_batch(
        &self,
        queries: &[VectorQuery],
    ) -> Result<Vec<Vec<IndexPoint>>, VectorIndexError>;
}
