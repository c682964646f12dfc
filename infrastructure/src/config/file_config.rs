//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application and
//! domain types once validated.

mod models;

pub use models::{FileModelEntry, FileModelsConfig};

use scholia_application::ResearchParams;
use scholia_domain::ModelConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("research.{0} cannot be 0")]
    ZeroBound(&'static str),

    #[error("models.{0}.model cannot be empty")]
    EmptyModelName(&'static str),

    #[error("{0} cannot be empty")]
    EmptyValue(&'static str),
}

/// Raw research loop configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResearchConfig {
    /// Evidence count that counts as sufficient
    pub max_sources: usize,
    /// Query budget per research cycle
    pub max_queries: usize,
    /// Planning rounds per research cycle
    pub max_iterations: usize,
    /// Nearest neighbours per query
    pub neighbors_per_query: usize,
    /// Queries per planning round
    pub max_queries_per_plan: usize,
    /// Concurrent external calls per fan-out
    pub worker_cap: usize,
    /// Deadline for each external call
    pub call_timeout_seconds: u64,
}

impl Default for FileResearchConfig {
    fn default() -> Self {
        let params = ResearchParams::default();
        Self {
            max_sources: params.max_sources,
            max_queries: params.max_queries,
            max_iterations: params.max_iterations,
            neighbors_per_query: params.neighbors_per_query,
            max_queries_per_plan: params.max_queries_per_plan,
            worker_cap: params.worker_cap,
            call_timeout_seconds: params.call_timeout.as_secs(),
        }
    }
}

/// Raw chat-completions endpoint configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

/// Raw embedding endpoint configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEmbeddingConfig {
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
}

impl Default for FileEmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

/// Raw vector index configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVectorIndexConfig {
    /// Qdrant REST endpoint
    pub url: String,
    pub collection: String,
    /// Environment variable holding the Qdrant API key, if any
    pub api_key_env: Option<String>,
}

impl Default for FileVectorIndexConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6333".to_string(),
            collection: "philosophy".to_string(),
            api_key_env: None,
        }
    }
}

/// Raw metadata store configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMetadataConfig {
    /// SQLite database holding the `filters` table
    pub database: PathBuf,
    /// Pooled connections
    pub pool_size: usize,
    /// Change-detection poll interval
    pub poll_interval_seconds: u64,
}

impl Default for FileMetadataConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("scholia.db"),
            pool_size: 2,
            poll_interval_seconds: 5,
        }
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for daily-rolling diagnostic logs
    pub directory: Option<PathBuf>,
    /// JSONL research trail
    pub research_log: Option<PathBuf>,
}

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show progress indicators
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<PathBuf>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub models: FileModelsConfig,
    pub research: FileResearchConfig,
    pub llm: FileLlmConfig,
    pub embedding: FileEmbeddingConfig,
    pub vector_index: FileVectorIndexConfig,
    pub metadata: FileMetadataConfig,
    pub logging: FileLoggingConfig,
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let research = &self.research;
        let bounds = [
            ("max_sources", research.max_sources as u64),
            ("max_queries", research.max_queries as u64),
            ("max_iterations", research.max_iterations as u64),
            ("neighbors_per_query", research.neighbors_per_query as u64),
            ("max_queries_per_plan", research.max_queries_per_plan as u64),
            ("worker_cap", research.worker_cap as u64),
            ("call_timeout_seconds", research.call_timeout_seconds),
        ];
        if let Some((name, _)) = bounds.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigValidationError::ZeroBound(name));
        }

        if let Some(node) = self.models.empty_model_names().first() {
            return Err(ConfigValidationError::EmptyModelName(node));
        }

        if self.embedding.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyValue("embedding.model"));
        }
        if self.vector_index.collection.trim().is_empty() {
            return Err(ConfigValidationError::EmptyValue("vector_index.collection"));
        }
        if self.metadata.pool_size == 0 {
            return Err(ConfigValidationError::EmptyValue("metadata.pool_size"));
        }

        Ok(())
    }

    pub fn to_research_params(&self) -> ResearchParams {
        let research = &self.research;
        ResearchParams::default()
            .with_max_sources(research.max_sources)
            .with_max_queries(research.max_queries)
            .with_max_iterations(research.max_iterations)
            .with_neighbors_per_query(research.neighbors_per_query)
            .with_max_queries_per_plan(research.max_queries_per_plan)
            .with_worker_cap(research.worker_cap)
            .with_call_timeout(Duration::from_secs(research.call_timeout_seconds))
    }

    pub fn to_model_config(&self) -> ModelConfig {
        self.models.to_model_config()
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.research.call_timeout_seconds)
    }
}
