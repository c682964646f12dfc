//! Embedding model port

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while embedding text
#[derive(Error, Debug, Clone)]
pub enum EmbeddingError {
    #[error("Embedding request failed: {0}")]
    RequestFailed(String),

    #[error("Embedding response invalid: {0}")]
    InvalidResponse(String),

    #[error("Embedding timed out")]
    Timeout,
}

/// Turns text into unit-length dense vectors.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed many texts in one call, preserving input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}
