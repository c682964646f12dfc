//! Response composer

use crate::config::ResearchParams;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::use_cases::shared;
use scholia_domain::{Conversation, ModelSpec, PromptTemplate};
use std::sync::Arc;

/// Writes the final cited answer. One call, no retry.
pub struct ResponseComposer<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    spec: ModelSpec,
    params: ResearchParams,
}

impl<G: LlmGateway + 'static> ResponseComposer<G> {
    pub fn new(gateway: Arc<G>, spec: ModelSpec, params: ResearchParams) -> Self {
        Self {
            gateway,
            spec,
            params,
        }
    }

    pub async fn compose(
        &self,
        conversation: &Conversation,
        summaries: &[String],
    ) -> Result<String, GatewayError> {
        let answer = shared::ask(
            self.gateway.as_ref(),
            &self.spec,
            &PromptTemplate::compose_system(conversation, summaries),
            conversation.last_user_message(),
            self.params.call_timeout,
        )
        .await?;
        Ok(answer.trim().to_string())
    }
}
