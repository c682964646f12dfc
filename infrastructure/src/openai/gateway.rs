//! OpenAI-compatible LLM gateway

use crate::openai::client::ApiClient;
use crate::openai::session::OpenAiSession;
use async_trait::async_trait;
use scholia_application::{GatewayError, LlmGateway, LlmSession};
use scholia_domain::ModelSpec;
use std::time::Duration;
use tracing::info;

/// LLM gateway for any `/chat/completions` endpoint
pub struct OpenAiGateway {
    client: ApiClient,
}

impl OpenAiGateway {
    /// Connect to `base_url`, reading the API key from `api_key_env`.
    pub fn new(base_url: &str, api_key_env: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = ApiClient::from_env(base_url, api_key_env, timeout)?;
        info!("OpenAiGateway initialized for {}", client.base_url());
        Ok(Self { client })
    }

    pub fn with_client(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn create_session(
        &self,
        spec: &ModelSpec,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(OpenAiSession::new(
            self.client.clone(),
            spec.clone(),
            system_prompt.to_string(),
        )))
    }
}
