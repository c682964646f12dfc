//! Error types for the OpenAI-compatible adapters

use scholia_application::{EmbeddingError, GatewayError};
use thiserror::Error;

/// Result type alias for HTTP API operations
pub type Result<T> = std::result::Result<T, OpenAiError>;

#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {error}\nRaw response: {raw}")]
    Parse { error: String, raw: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl OpenAiError {
    fn is_timeout(&self) -> bool {
        matches!(self, OpenAiError::Transport(e) if e.is_timeout())
    }
}

impl From<OpenAiError> for GatewayError {
    fn from(err: OpenAiError) -> Self {
        match err {
            e if e.is_timeout() => GatewayError::Timeout,
            OpenAiError::Client(msg) => GatewayError::ConnectionError(msg),
            OpenAiError::Transport(e) if e.is_connect() => {
                GatewayError::ConnectionError(e.to_string())
            }
            OpenAiError::Status { status: 404, body } => GatewayError::ModelNotAvailable(body),
            e @ (OpenAiError::Transport(_) | OpenAiError::Status { .. }) => {
                GatewayError::RequestFailed(e.to_string())
            }
            e @ (OpenAiError::Parse { .. } | OpenAiError::UnexpectedResponse(_)) => {
                GatewayError::InvalidResponse(e.to_string())
            }
        }
    }
}

impl From<OpenAiError> for EmbeddingError {
    fn from(err: OpenAiError) -> Self {
        match err {
            e if e.is_timeout() => EmbeddingError::Timeout,
            e @ (OpenAiError::Parse { .. } | OpenAiError::UnexpectedResponse(_)) => {
                EmbeddingError::InvalidResponse(e.to_string())
            }
            e => EmbeddingError::RequestFailed(e.to_string()),
        }
    }
}
