//! OpenAI-compatible HTTP adapters
//!
//! Implements [`LlmGateway`](scholia_application::LlmGateway) over
//! `/chat/completions` and [`EmbeddingModel`](scholia_application::EmbeddingModel)
//! over `/embeddings`. Any endpoint that speaks the OpenAI wire format works.

pub mod client;
pub mod embedding;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod session;
