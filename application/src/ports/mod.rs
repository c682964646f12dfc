//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod embedding;
pub mod llm_gateway;
pub mod metadata_store;
pub mod progress;
pub mod research_logger;
pub mod vector_index;
