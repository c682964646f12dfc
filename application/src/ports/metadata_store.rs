//! Metadata store port
//!
//! The relational store that knows every author and source title in the
//! corpus, and can tell when that set changes.

use async_trait::async_trait;
use scholia_domain::MetadataField;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors raised by the metadata store
#[derive(Error, Debug, Clone)]
pub enum MetadataStoreError {
    #[error("Metadata store connection failed: {0}")]
    Connection(String),

    #[error("Metadata store query failed: {0}")]
    Query(String),
}

#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Distinct non-null values of a field.
    async fn list_distinct(&self, field: MetadataField) -> Result<Vec<String>, MetadataStoreError>;

    /// Channel that receives a unit message whenever the metadata changes.
    async fn subscribe_changes(&self) -> Result<mpsc::Receiver<()>, MetadataStoreError>;
}
