//! HTTP embedding client
//!
//! Vectors are L2-normalised before they leave the adapter so the index can
//! use dot-product similarity.

use crate::openai::client::ApiClient;
use crate::openai::error::OpenAiError;
use crate::openai::protocol::{EmbeddingRequest, EmbeddingResponse};
use async_trait::async_trait;
use scholia_application::{EmbeddingError, EmbeddingModel};
use std::time::Duration;
use tracing::debug;

pub struct HttpEmbeddingModel {
    client: ApiClient,
    model: String,
}

impl HttpEmbeddingModel {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key_env: &str,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = ApiClient::from_env(base_url, api_key_env, timeout)?;
        Ok(Self::with_client(client, model))
    }

    pub fn with_client(client: ApiClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, OpenAiError> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };
        let response: EmbeddingResponse = self.client.post("embeddings", &body).await?;
        let vectors = response.into_vectors();
        if vectors.len() != texts.len() {
            return Err(OpenAiError::UnexpectedResponse(format!(
                "{} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }
        debug!("Embedded {} texts with {}", texts.len(), self.model);
        Ok(vectors.into_iter().map(normalize).collect())
    }
}

#[async_trait]
impl EmbeddingModel for HttpEmbeddingModel {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.request(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| EmbeddingError::InvalidResponse("no embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.request(texts).await?)
    }
}

/// Scale `vector` to unit length. Zero vectors are returned unchanged.
pub fn normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
    vector
}
