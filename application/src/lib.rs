//! Application layer for scholia
//!
//! This crate contains use cases, port definitions, the metadata catalog,
//! and application configuration. It depends only on the domain layer.

pub mod catalog;
pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use catalog::MetadataCatalog;
pub use config::ResearchParams;
pub use ports::{
    embedding::{EmbeddingError, EmbeddingModel},
    llm_gateway::{GatewayError, LlmGateway, LlmSession},
    metadata_store::{MetadataStore, MetadataStoreError},
    progress::{NoProgress, ProgressNotifier},
    research_logger::{NoResearchLogger, ResearchEvent, ResearchLogger},
    vector_index::{IndexPoint, VectorIndex, VectorIndexError, VectorQuery},
};
pub use use_cases::assess::{Assessment, SufficiencyAssessor};
pub use use_cases::build_conversation::ConversationBuilder;
pub use use_cases::compose::ResponseComposer;
pub use use_cases::plan_queries::QueryPlanner;
pub use use_cases::retrieval::{
    BatchError, BatchOutcome, QueryOutcome, RetrievalEngine, RetrievalError,
};
pub use use_cases::run_research::{ResearchAgent, RunResearchError};
