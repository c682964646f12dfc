//! LLM Gateway port
//!
//! Defines the interface for communicating with language-model providers.

use async_trait::async_trait;
use scholia_domain::{ModelSpec, extract_json};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to language models.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Create a new single-purpose session with a system prompt
    async fn create_session(
        &self,
        spec: &ModelSpec,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// An active LLM session
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Model and effort used by this session
    fn spec(&self) -> &ModelSpec;

    /// Send a message and get a free-form text response
    async fn send(&self, content: &str) -> Result<String, GatewayError>;

    /// Send a message and get a response conforming to `schema`.
    ///
    /// Default implementation inlines the schema into the prompt and pulls
    /// the first JSON value out of the text reply, so providers without
    /// native structured output still work.
    async fn send_structured(
        &self,
        content: &str,
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let prompt = format!(
            "{}\n\nRespond ONLY with JSON matching this schema:\n{}",
            content, schema
        );
        let text = self.send(&prompt).await?;
        extract_json(&text).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}
