//! Query planner
//!
//! Two passes per round: a free-form reasoning pass that decides how to
//! break the question down, then a schema-constrained pass that turns the
//! reasoning into concrete queries.

use crate::config::ResearchParams;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::use_cases::shared;
use scholia_domain::core::string::truncate;
use scholia_domain::{Conversation, ModelSpec, PromptTemplate, Query, QueryBatch};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct QueryPlanner<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    spec: ModelSpec,
    params: ResearchParams,
}

impl<G: LlmGateway + 'static> QueryPlanner<G> {
    pub fn new(gateway: Arc<G>, spec: ModelSpec, params: ResearchParams) -> Self {
        Self {
            gateway,
            spec,
            params,
        }
    }

    /// Plan the next batch of queries.
    ///
    /// At most `max_queries_per_plan` queries are returned, and never more
    /// than what is left of the `max_queries` budget. Blank queries are
    /// dropped. Semantic overlap with `queries_made` is discouraged through
    /// the prompt only.
    pub async fn plan(
        &self,
        conversation: &Conversation,
        feedback: &str,
        queries_made: &[Query],
    ) -> Result<Vec<Query>, GatewayError> {
        let budget = self
            .params
            .max_queries_per_plan
            .min(self.params.max_queries.saturating_sub(queries_made.len()));
        if budget == 0 {
            debug!("Query budget exhausted, planning nothing");
            return Ok(Vec::new());
        }

        let context = PromptTemplate::plan_context(conversation, feedback, queries_made);
        let deadline = self.params.call_timeout;

        let reasoning = shared::ask(
            self.gateway.as_ref(),
            &self.spec,
            PromptTemplate::plan_reasoning_system(),
            &context,
            deadline,
        )
        .await?;
        debug!("Planning reasoning: {}", truncate(&reasoning, 200));

        let value = shared::ask_structured(
            self.gateway.as_ref(),
            &self.spec,
            &PromptTemplate::plan_queries_system(&reasoning),
            &context,
            &QueryBatch::json_schema(),
            deadline,
        )
        .await?;

        let batch = QueryBatch::from_json(&value)
            .map_err(|e| GatewayError::InvalidResponse(format!("query batch: {e}")))?;

        let proposed = batch.queries.len();
        let queries: Vec<Query> = batch
            .queries
            .into_iter()
            .filter(|q| !q.text.trim().is_empty())
            .take(budget)
            .collect();

        if queries.len() < proposed {
            warn!(
                "Planner proposed {} queries, keeping {} (budget {})",
                proposed,
                queries.len(),
                budget
            );
        }
        info!("Planned {} queries", queries.len());
        Ok(queries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{MockGateway, Node};
    use scholia_domain::{Filter, ModelConfig};

    fn planner(gateway: MockGateway, params: ResearchParams) -> QueryPlanner<MockGateway> {
        QueryPlanner::new(Arc::new(gateway), ModelConfig::default().plan, params)
    }

    fn conversation() -> Conversation {
        Conversation::new("What did Aristotle say about virtue?", Conversation::EMPTY_CONTEXT)
    }

    #[tokio::test]
    async fn test_two_stage_plan_with_filters() {
        let gateway = MockGateway::new()
            .always(Node::PlanReasoning, "Focus on the doctrine of the mean.")
            .always(
                Node::PlanQueries,
                r#"{"queries": [
                    {"query": "doctrine of the mean", "filters": {"author": "Aristotle", "source_title": null}},
                    {"query": "virtue as habit", "filters": null}
                ]}"#,
            );
        let planner = planner(gateway, ResearchParams::default());

        let queries = planner.plan(&conversation(), "", &[]).await.unwrap();

        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].filters, Some(Filter::author("Aristotle")));
        let calls = planner.gateway.calls();
        assert_eq!(calls[0].node, Node::PlanReasoning);
        assert_eq!(calls[1].node, Node::PlanQueries);
        assert!(calls[1].system_prompt.contains("Focus on the doctrine of the mean."));
        assert_eq!(calls[1].spec, ModelConfig::default().plan);
    }

    #[tokio::test]
    async fn test_plan_capped_per_round() {
        let queries: Vec<String> = (0..8)
            .map(|i| format!(r#"{{"query": "topic {i}"}}"#))
            .collect();
        let gateway = MockGateway::new().always(
            Node::PlanQueries,
            &format!(r#"{{"queries": [{}]}}"#, queries.join(",")),
        );
        let planner = planner(gateway, ResearchParams::default());

        let planned = planner.plan(&conversation(), "", &[]).await.unwrap();
        assert_eq!(planned.len(), 5);
    }

    #[tokio::test]
    async fn test_plan_capped_by_remaining_budget() {
        let gateway = MockGateway::new().always(
            Node::PlanQueries,
            r#"[{"query": "a"}, {"query": "b"}, {"query": "c"}]"#,
        );
        let planner = planner(gateway, ResearchParams::default().with_max_queries(4));
        let made = vec![Query::new("x"), Query::new("y")];

        let planned = planner.plan(&conversation(), "", &made).await.unwrap();
        assert_eq!(planned.len(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_budget_skips_the_model() {
        let planner = planner(MockGateway::new(), ResearchParams::default().with_max_queries(1));

        let planned = planner
            .plan(&conversation(), "", &[Query::new("x")])
            .await
            .unwrap();
        assert!(planned.is_empty());
        assert!(planner.gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_blank_queries_dropped() {
        let gateway = MockGateway::new().always(
            Node::PlanQueries,
            r#"{"queries": [{"query": "  "}, {"query": "eudaimonia"}]}"#,
        );
        let planner = planner(gateway, ResearchParams::default());

        let planned = planner.plan(&conversation(), "", &[]).await.unwrap();
        assert_eq!(planned, vec![Query::new("eudaimonia")]);
    }

    #[tokio::test]
    async fn test_feedback_and_history_reach_both_passes() {
        let planner = planner(MockGateway::new(), ResearchParams::default());
        let made = vec![Query::new("virtue ethics")];

        planner
            .plan(&conversation(), "Need the Stoic view", &made)
            .await
            .unwrap();

        for call in planner.gateway.calls() {
            assert!(call.prompt.contains("Need the Stoic view"));
            assert!(call.prompt.contains("\"virtue ethics\""));
        }
    }

    #[tokio::test]
    async fn test_unparseable_plan_is_an_error() {
        let gateway = MockGateway::new().always(Node::PlanQueries, "I would search for virtue.");
        let planner = planner(gateway, ResearchParams::default());

        let err = planner.plan(&conversation(), "", &[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_gateway_error_propagates() {
        let gateway = MockGateway::new().then(
            Node::PlanReasoning,
            Err(GatewayError::ConnectionError("offline".to_string())),
        );
        let planner = planner(gateway, ResearchParams::default());

        let err = planner.plan(&conversation(), "", &[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::ConnectionError(_)));
    }
}
