//! Domain layer for scholia
//!
//! This crate contains the core research types and algorithms.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Research Loop
//!
//! A question is answered by iterating a small state machine:
//! plan queries, retrieve passages, assess sufficiency, and either loop
//! back to planning or compose the final cited answer.
//!
//! - [`ResearchState`] is the single record the loop mutates, only through
//!   [`StateUpdate`] merges.
//! - [`TransitionTable`] is the validated `(phase, outcome) -> phase` table.
//!
//! ## Catalog
//!
//! [`FilterResolver`] maps a planner's loose author / title filter onto the
//! exact entries of a [`CatalogSnapshot`].

pub mod catalog;
pub mod config;
pub mod conversation;
pub mod core;
pub mod prompt;
pub mod research;

// Re-export commonly used types
pub use catalog::{CatalogSnapshot, FilterResolver, FilterTerm, MetadataField, ResolvedFilter};
pub use config::{ModelConfig, ModelSpec, ReasoningEffort};
pub use conversation::{Conversation, Message, Role};
pub use core::{error::DomainError, model::Model};
pub use prompt::PromptTemplate;
pub use research::{
    Filter, Outcome, Query, QueryBatch, ResearchPhase, ResearchState, ResourceId,
    RetrievedResource, StateUpdate, Transition, TransitionTable, dedup_by_id, extract_json,
    parse_yes_no, strip_thinking,
};
