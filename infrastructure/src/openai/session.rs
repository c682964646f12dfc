//! One system prompt bound to one model

use crate::openai::client::ApiClient;
use crate::openai::error::OpenAiError;
use crate::openai::protocol::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use scholia_application::{GatewayError, LlmSession};
use scholia_domain::{ModelSpec, extract_json};
use tracing::debug;

pub struct OpenAiSession {
    client: ApiClient,
    spec: ModelSpec,
    system_prompt: String,
}

impl OpenAiSession {
    pub fn new(client: ApiClient, spec: ModelSpec, system_prompt: String) -> Self {
        Self {
            client,
            spec,
            system_prompt,
        }
    }

    /// Request for `content`, carrying the reasoning effort when the model takes one.
    fn request<'a>(&'a self, content: &'a str) -> ChatRequest<'a> {
        let request = ChatRequest::new(self.spec.model.as_str(), &self.system_prompt, content);
        if self.spec.model.supports_reasoning_effort() {
            request.with_reasoning_effort(self.spec.reasoning_effort.as_str())
        } else {
            request
        }
    }

    async fn complete(&self, request: &ChatRequest<'_>) -> Result<String, GatewayError> {
        let response: ChatResponse = self.client.post("chat/completions", request).await?;
        let content = response.into_content().ok_or_else(|| {
            OpenAiError::UnexpectedResponse("response carried no message content".to_string())
        })?;
        debug!("{} replied with {} bytes", self.spec.model, content.len());
        Ok(content)
    }
}

#[async_trait]
impl LlmSession for OpenAiSession {
    fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        self.complete(&self.request(content)).await
    }

    async fn send_structured(
        &self,
        content: &str,
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let request = self.request(content).with_json_schema(schema);
        let text = self.complete(&request).await?;
        extract_json(&text).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}
