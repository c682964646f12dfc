//! Infrastructure layer for scholia
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod metadata;
pub mod openai;
pub mod qdrant;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileEmbeddingConfig, FileLlmConfig,
    FileLoggingConfig, FileMetadataConfig, FileModelsConfig, FileReplConfig, FileResearchConfig,
    FileVectorIndexConfig,
};
pub use logging::JsonlResearchLogger;
pub use metadata::SqliteMetadataStore;
pub use openai::{
    client::ApiClient, embedding::HttpEmbeddingModel, error::OpenAiError, gateway::OpenAiGateway,
};
pub use qdrant::QdrantIndex;
