//! Run Research use case
//!
//! Drives one research cycle through the [`TransitionTable`]:
//!
//! ```text
//! build conversation
//!   └─▶ PlanQueries ─▶ Retrieve ─▶ Assess ─┬─ sufficient ─▶ Compose ─▶ answer
//!            ▲                             │
//!            └──────── insufficient ───────┘
//! ```
//!
//! "Sufficient" is the assessor's folded verdict, or the query budget or
//! iteration limit running out, whichever comes first.

use crate::catalog::MetadataCatalog;
use crate::config::ResearchParams;
use crate::ports::embedding::EmbeddingModel;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::research_logger::{NoResearchLogger, ResearchEvent, ResearchLogger};
use crate::ports::vector_index::VectorIndex;
use crate::use_cases::assess::SufficiencyAssessor;
use crate::use_cases::build_conversation::ConversationBuilder;
use crate::use_cases::compose::ResponseComposer;
use crate::use_cases::plan_queries::QueryPlanner;
use crate::use_cases::retrieval::{BatchError, RetrievalEngine};
use crate::use_cases::shared::unless_cancelled;
use scholia_domain::{
    Message, ModelConfig, Outcome, ResearchPhase, ResearchState, StateUpdate, Transition,
    TransitionTable,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that end a research cycle without an answer
#[derive(Error, Debug)]
pub enum RunResearchError {
    #[error("No user message to research")]
    NoQuestion,

    #[error("A research cycle is already running on this agent")]
    AlreadyRunning,

    #[error("Research cancelled")]
    Cancelled,

    #[error("The model returned an empty response")]
    EmptyResponse,

    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),
}

impl From<BatchError> for RunResearchError {
    fn from(e: BatchError) -> Self {
        match e {
            BatchError::Cancelled => RunResearchError::Cancelled,
            BatchError::Summarization(e) => RunResearchError::GatewayError(e),
        }
    }
}

/// The research agent: one question in, one cited answer out.
///
/// At most one cycle runs per agent at a time; a concurrent call fails
/// fast with [`RunResearchError::AlreadyRunning`].
pub struct ResearchAgent<G: LlmGateway + 'static> {
    conversation_builder: ConversationBuilder<G>,
    planner: QueryPlanner<G>,
    engine: RetrievalEngine<G>,
    assessor: SufficiencyAssessor<G>,
    composer: ResponseComposer<G>,
    params: ResearchParams,
    transitions: TransitionTable,
    research_logger: Arc<dyn ResearchLogger>,
    cancellation_token: Option<CancellationToken>,
    active: Mutex<()>,
}

impl<G: LlmGateway + 'static> ResearchAgent<G> {
    pub fn new(
        gateway: Arc<G>,
        embedder: Arc<dyn EmbeddingModel>,
        index: Arc<dyn VectorIndex>,
        catalog: Arc<MetadataCatalog>,
        models: ModelConfig,
        params: ResearchParams,
    ) -> Self {
        Self {
            conversation_builder: ConversationBuilder::new(
                Arc::clone(&gateway),
                models.conversation,
                params.clone(),
            ),
            planner: QueryPlanner::new(Arc::clone(&gateway), models.plan, params.clone()),
            engine: RetrievalEngine::new(
                Arc::clone(&gateway),
                embedder,
                index,
                catalog,
                models.summarize,
                params.clone(),
            ),
            assessor: SufficiencyAssessor::new(
                Arc::clone(&gateway),
                models.classify,
                models.feedback,
                params.clone(),
            ),
            composer: ResponseComposer::new(gateway, models.compose, params.clone()),
            params,
            transitions: TransitionTable::research_loop(),
            research_logger: Arc::new(NoResearchLogger),
            cancellation_token: None,
            active: Mutex::new(()),
        }
    }

    pub fn with_research_logger(mut self, logger: Arc<dyn ResearchLogger>) -> Self {
        self.research_logger = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn params(&self) -> &ResearchParams {
        &self.params
    }

    /// Answer the last user message in `messages`.
    pub async fn run(&self, messages: &[Message]) -> Result<String, RunResearchError> {
        self.run_with_progress(messages, &NoProgress).await
    }

    pub async fn run_with_progress(
        &self,
        messages: &[Message],
        progress: &dyn ProgressNotifier,
    ) -> Result<String, RunResearchError> {
        let state = self.run_cycle(messages, progress).await?;
        Ok(state.response().to_string())
    }

    /// Run a full cycle and return the final state.
    pub async fn run_cycle(
        &self,
        messages: &[Message],
        progress: &dyn ProgressNotifier,
    ) -> Result<ResearchState, RunResearchError> {
        let _active = self
            .active
            .try_lock()
            .map_err(|_| RunResearchError::AlreadyRunning)?;
        let cancel = self.cancellation_token.clone().unwrap_or_default();

        let started = Instant::now();
        let conversation = self
            .cancellable(&cancel, self.conversation_builder.build(messages))
            .await??;
        if conversation.last_user_message().trim().is_empty() {
            return Err(RunResearchError::NoQuestion);
        }
        progress.on_conversation_ready(started.elapsed());
        self.research_logger.log(ResearchEvent::new(
            "conversation_created",
            serde_json::json!({
                "last_user_message": conversation.last_user_message(),
                "summarized_context": conversation.summarized_context(),
            }),
        ));

        let mut state = ResearchState::new(conversation);
        let mut phase = ResearchPhase::INITIAL;

        loop {
            let started = Instant::now();
            let iteration = state.iterations() + usize::from(phase == ResearchPhase::PlanQueries);
            info!("Iteration {}: {}", iteration, phase.as_str());

            let update = match phase {
                ResearchPhase::PlanQueries => {
                    progress.on_phase_start(&phase, iteration, 1);
                    self.plan_step(&state, &cancel).await?
                }
                ResearchPhase::Retrieve => {
                    progress.on_phase_start(&phase, iteration, state.queries().len());
                    self.retrieve_step(&state, progress, &cancel).await?
                }
                ResearchPhase::Assess => {
                    progress.on_phase_start(&phase, iteration, 1);
                    self.assess_step(&state, &cancel).await?
                }
                ResearchPhase::Compose => {
                    progress.on_phase_start(&phase, iteration, 1);
                    self.compose_step(&state, &cancel).await?
                }
            };
            state.apply(update);
            progress.on_phase_complete(&phase, started.elapsed());

            let outcome = self.route(phase, &state);
            match self.transitions.next(phase, outcome) {
                Transition::To(next) => {
                    debug!("{} -[{}]-> {}", phase.as_str(), outcome, next.as_str());
                    phase = next;
                }
                Transition::Finish => break,
            }
        }

        self.research_logger.log(ResearchEvent::new(
            "response_composed",
            serde_json::json!({
                "iterations": state.iterations(),
                "queries_made": state.queries_made().len(),
                "sources": state.resource_summaries().len(),
                "response_chars": state.response().len(),
            }),
        ));
        info!(
            "Research finished after {} iterations in {:.2}s",
            state.iterations(),
            started.elapsed().as_secs_f64()
        );
        Ok(state)
    }

    /// Outcome fed to the transition table. Only the assess edge is
    /// conditional, so the predicate is evaluated there alone.
    fn route(&self, phase: ResearchPhase, state: &ResearchState) -> Outcome {
        if phase == ResearchPhase::Assess {
            Outcome::from_satisfied(self.ready_to_compose(state))
        } else {
            Outcome::Unsatisfied
        }
    }

    /// Routing predicate for the assess edge. The assessor already folds in
    /// the evidence cap; the query budget and iteration limit are enforced
    /// here regardless of what it says.
    fn ready_to_compose(&self, state: &ResearchState) -> bool {
        if state.query_satisfied() {
            return true;
        }
        if state.queries_made().len() >= self.params.max_queries {
            warn!(
                "Query budget exhausted ({}), composing with current evidence",
                state.queries_made().len()
            );
            return true;
        }
        if state.iterations() >= self.params.max_iterations {
            warn!(
                "Iteration limit reached ({}), composing with current evidence",
                state.iterations()
            );
            return true;
        }
        false
    }

    async fn plan_step(
        &self,
        state: &ResearchState,
        cancel: &CancellationToken,
    ) -> Result<StateUpdate, RunResearchError> {
        let queries = self
            .cancellable(
                cancel,
                self.planner
                    .plan(state.conversation(), state.feedback(), state.queries_made()),
            )
            .await??;

        self.research_logger.log(ResearchEvent::new(
            "queries_planned",
            serde_json::json!({
                "iteration": state.iterations() + 1,
                "queries": queries,
                "total_made": state.queries_made().len() + queries.len(),
            }),
        ));
        Ok(StateUpdate::planned(queries))
    }

    async fn retrieve_step(
        &self,
        state: &ResearchState,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<StateUpdate, RunResearchError> {
        let batch = self
            .engine
            .batch_query(state.queries(), progress, cancel)
            .await?;

        self.research_logger.log(ResearchEvent::new(
            "batch_retrieved",
            serde_json::json!({
                "iteration": state.iterations(),
                "resources": batch.resource_count(),
                "failures": batch
                    .failures()
                    .map(|(query, error)| serde_json::json!({
                        "query": query.text,
                        "error": error.to_string(),
                    }))
                    .collect::<Vec<_>>(),
            }),
        ));

        let update = self
            .engine
            .summarize_and_accumulate(batch.into_resources(), progress, cancel)
            .await?;

        self.research_logger.log(ResearchEvent::new(
            "resources_summarized",
            serde_json::json!({
                "iteration": state.iterations(),
                "new": update.append_summaries.len(),
                "total": state.resource_summaries().len() + update.append_summaries.len(),
            }),
        ));
        Ok(update)
    }

    async fn assess_step(
        &self,
        state: &ResearchState,
        cancel: &CancellationToken,
    ) -> Result<StateUpdate, RunResearchError> {
        let assessment = self
            .cancellable(
                cancel,
                self.assessor
                    .assess(state.conversation(), state.resource_summaries()),
            )
            .await??;

        self.research_logger.log(ResearchEvent::new(
            "assessment",
            serde_json::json!({
                "iteration": state.iterations(),
                "satisfied": assessment.satisfied,
                "feedback": assessment.feedback,
            }),
        ));
        Ok(assessment.into_update())
    }

    async fn compose_step(
        &self,
        state: &ResearchState,
        cancel: &CancellationToken,
    ) -> Result<StateUpdate, RunResearchError> {
        let response = self
            .cancellable(
                cancel,
                self.composer
                    .compose(state.conversation(), state.resource_summaries()),
            )
            .await??;

        if response.is_empty() {
            return Err(RunResearchError::EmptyResponse);
        }
        Ok(StateUpdate::composed(response))
    }

    async fn cancellable<T>(
        &self,
        cancel: &CancellationToken,
        future: impl Future<Output = T>,
    ) -> Result<T, RunResearchError> {
        unless_cancelled(cancel, future)
            .await
            .ok_or(RunResearchError::Cancelled)
    }
}
