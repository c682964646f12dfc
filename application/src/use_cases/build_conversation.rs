//! Conversation builder
//!
//! Condenses the chat history into the [`Conversation`] a research cycle
//! works from: the latest user message plus a summary of what came before.

use crate::config::ResearchParams;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::use_cases::shared;
use scholia_domain::{Conversation, Message, ModelSpec, PromptTemplate};
use std::sync::Arc;
use tracing::debug;

pub struct ConversationBuilder<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    spec: ModelSpec,
    params: ResearchParams,
}

impl<G: LlmGateway + 'static> ConversationBuilder<G> {
    pub fn new(gateway: Arc<G>, spec: ModelSpec, params: ResearchParams) -> Self {
        Self {
            gateway,
            spec,
            params,
        }
    }

    /// Build the conversation. Skips the model entirely when there is no
    /// prior context to summarize.
    pub async fn build(&self, messages: &[Message]) -> Result<Conversation, GatewayError> {
        let last_user_message = Conversation::last_user_content(messages);
        let context = Conversation::prior_context(messages);

        if context.trim().is_empty() {
            debug!("No prior context, skipping conversation summary");
            return Ok(Conversation::new(last_user_message, Conversation::EMPTY_CONTEXT));
        }

        let summary = shared::ask(
            self.gateway.as_ref(),
            &self.spec,
            PromptTemplate::conversation_system(),
            &PromptTemplate::conversation_prompt(&context),
            self.params.call_timeout,
        )
        .await?;

        Ok(Conversation::new(last_user_message, summary))
    }
}
