//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Missing transition from {phase} when {outcome}")]
    MissingTransition { phase: String, outcome: String },

    #[error("Duplicate transition from {phase} when {outcome}")]
    DuplicateTransition { phase: String, outcome: String },

    #[error("Terminal phase {0} must finish, not transition")]
    TerminalTransition(String),

    #[error("Only the terminal phase may finish, but {0} does")]
    PrematureFinish(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unparseable model output: {0}")]
    UnparseableOutput(String),
}
