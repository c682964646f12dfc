//! Sufficiency assessor
//!
//! Decides whether the evidence gathered so far can support an answer.
//! Reaching `max_sources` summaries counts as sufficient on its own, so a
//! classifier that never says yes cannot keep the loop alive.

use crate::config::ResearchParams;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::use_cases::shared;
use scholia_domain::{Conversation, ModelSpec, PromptTemplate, StateUpdate, parse_yes_no};
use std::sync::Arc;
use tracing::{debug, info};

/// Verdict of one assessment round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub satisfied: bool,
    /// Evidence-gap description; empty when satisfied.
    pub feedback: String,
}

impl Assessment {
    pub fn into_update(self) -> StateUpdate {
        StateUpdate::assessed(self.satisfied, self.feedback)
    }
}

pub struct SufficiencyAssessor<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    classify_spec: ModelSpec,
    feedback_spec: ModelSpec,
    params: ResearchParams,
}

impl<G: LlmGateway + 'static> SufficiencyAssessor<G> {
    pub fn new(
        gateway: Arc<G>,
        classify_spec: ModelSpec,
        feedback_spec: ModelSpec,
        params: ResearchParams,
    ) -> Self {
        Self {
            gateway,
            classify_spec,
            feedback_spec,
            params,
        }
    }

    pub async fn assess(
        &self,
        conversation: &Conversation,
        summaries: &[String],
    ) -> Result<Assessment, GatewayError> {
        if summaries.len() >= self.params.max_sources {
            info!(
                "Evidence cap reached ({} >= {}), treating research as sufficient",
                summaries.len(),
                self.params.max_sources
            );
            return Ok(Assessment {
                satisfied: true,
                feedback: String::new(),
            });
        }

        let deadline = self.params.call_timeout;
        let verdict = shared::ask(
            self.gateway.as_ref(),
            &self.classify_spec,
            PromptTemplate::classify_system(),
            &PromptTemplate::assess_prompt(conversation, summaries),
            deadline,
        )
        .await?;
        let satisfied = parse_yes_no(&verdict);
        debug!("Classifier said {:?} (satisfied: {})", verdict, satisfied);

        if satisfied {
            return Ok(Assessment {
                satisfied,
                feedback: String::new(),
            });
        }

        let feedback = shared::ask(
            self.gateway.as_ref(),
            &self.feedback_spec,
            PromptTemplate::feedback_system(),
            &PromptTemplate::feedback_prompt(conversation, summaries),
            deadline,
        )
        .await?;

        Ok(Assessment {
            satisfied: false,
            feedback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{MockGateway, Node};
    use scholia_domain::ModelConfig;

    fn assessor(gateway: MockGateway) -> SufficiencyAssessor<MockGateway> {
        let models = ModelConfig::default();
        SufficiencyAssessor::new(
            Arc::new(gateway),
            models.classify,
            models.feedback,
            ResearchParams::default(),
        )
    }

    fn conversation() -> Conversation {
        Conversation::new("Is justice the interest of the stronger?", Conversation::EMPTY_CONTEXT)
    }

    fn summaries(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("summary {i}")).collect()
    }

    #[tokio::test]
    async fn test_yes_is_satisfied_without_feedback_call() {
        let assessor = assessor(MockGateway::new().always(Node::Classify, "Yes."));

        let verdict = assessor.assess(&conversation(), &summaries(1)).await.unwrap();

        assert!(verdict.satisfied);
        assert_eq!(verdict.feedback, "");
        assert!(assessor.gateway.calls_to(Node::Feedback).is_empty());
    }

    #[tokio::test]
    async fn test_no_produces_feedback() {
        let assessor = assessor(
            MockGateway::new()
                .always(Node::Classify, "No")
                .always(Node::Feedback, "Thrasymachus' position is missing."),
        );

        let verdict = assessor.assess(&conversation(), &summaries(1)).await.unwrap();

        assert!(!verdict.satisfied);
        assert_eq!(verdict.feedback, "Thrasymachus' position is missing.");
        assert_eq!(
            verdict.into_update(),
            StateUpdate::assessed(false, "Thrasymachus' position is missing.")
        );
    }

    #[tokio::test]
    async fn test_cap_reached_is_satisfied_regardless_of_classifier() {
        let assessor = assessor(MockGateway::new().always(Node::Classify, "No"));

        let verdict = assessor.assess(&conversation(), &summaries(3)).await.unwrap();

        assert!(verdict.satisfied);
        assert!(verdict.feedback.is_empty());
    }

    #[tokio::test]
    async fn test_classifier_reasoning_is_ignored() {
        let assessor = assessor(
            MockGateway::new().always(Node::Classify, "<thinking>maybe no?</thinking>\nYes"),
        );

        let verdict = assessor.assess(&conversation(), &[]).await.unwrap();
        assert!(verdict.satisfied);
    }

    #[tokio::test]
    async fn test_prompts_carry_question_and_evidence() {
        let assessor = assessor(MockGateway::new());

        assessor.assess(&conversation(), &summaries(2)).await.unwrap();

        let calls = assessor.gateway.calls();
        assert_eq!(calls.len(), 2);
        for call in calls {
            assert!(call.prompt.contains("Is justice the interest of the stronger?"));
            assert!(call.prompt.contains("[2] summary 1"));
        }
    }

    #[tokio::test]
    async fn test_feedback_failure_propagates() {
        let assessor = assessor(MockGateway::new().then(Node::Feedback, Err(GatewayError::Timeout)));

        let err = assessor.assess(&conversation(), &[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Timeout));
    }
}
