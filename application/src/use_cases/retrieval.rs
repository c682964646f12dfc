//! Retrieval engine
//!
//! Runs one batch of planned queries against the vector index, then turns
//! the retrieved passages into evidence summaries.
//!
//! Retrieval first tries a single batched index call. When that fails, and
//! always for summarization, work fans out over a [`JoinSet`] bounded by a
//! semaphore of `min(batch size, worker_cap)` permits, collected in
//! completion order.

use crate::catalog::MetadataCatalog;
use crate::config::ResearchParams;
use crate::ports::embedding::{EmbeddingError, EmbeddingModel};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::ProgressNotifier;
use crate::ports::vector_index::{IndexPoint, VectorIndex, VectorIndexError, VectorQuery};
use crate::use_cases::shared::{self, unless_cancelled};
use scholia_domain::{
    FilterResolver, ModelSpec, PromptTemplate, Query, ResearchPhase, ResolvedFilter,
    RetrievedResource, StateUpdate, dedup_by_id,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Why a single query produced no resources.
#[derive(Error, Debug, Clone)]
pub enum RetrievalError {
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Vector index failed: {0}")]
    Index(#[from] VectorIndexError),

    #[error("Timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Worker failed: {0}")]
    Worker(String),
}

/// Failure of a whole fan-out.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Cancelled")]
    Cancelled,

    #[error("Summarization failed: {0}")]
    Summarization(#[from] GatewayError),
}

/// Result of one query inside a batch.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub query: Query,
    /// De-duplicated by id, in index rank order.
    pub result: Result<Vec<RetrievedResource>, RetrievalError>,
}

/// Per-query outcomes of one batch, in completion order.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    outcomes: Vec<QueryOutcome>,
}

impl BatchOutcome {
    pub fn outcomes(&self) -> &[QueryOutcome] {
        &self.outcomes
    }

    /// Every retrieved resource, query slices concatenated.
    pub fn resources(&self) -> impl Iterator<Item = &RetrievedResource> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .flatten()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Query, &RetrievalError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.query, e)))
    }

    pub fn resource_count(&self) -> usize {
        self.resources().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn into_resources(self) -> Vec<RetrievedResource> {
        self.outcomes
            .into_iter()
            .filter_map(|o| o.result.ok())
            .flatten()
            .collect()
    }
}

pub struct RetrievalEngine<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    embedder: Arc<dyn EmbeddingModel>,
    index: Arc<dyn VectorIndex>,
    catalog: Arc<MetadataCatalog>,
    summarize_spec: ModelSpec,
    params: ResearchParams,
}

impl<G: LlmGateway + 'static> RetrievalEngine<G> {
    pub fn new(
        gateway: Arc<G>,
        embedder: Arc<dyn EmbeddingModel>,
        index: Arc<dyn VectorIndex>,
        catalog: Arc<MetadataCatalog>,
        summarize_spec: ModelSpec,
        params: ResearchParams,
    ) -> Self {
        Self {
            gateway,
            embedder,
            index,
            catalog,
            summarize_spec,
            params,
        }
    }

    /// Retrieve nearest passages for every query.
    ///
    /// When every query text was embedded, the whole batch goes to the index
    /// in one call. If that call fails, each query is searched concurrently
    /// on its own. A failing query is recorded in the outcome and never
    /// aborts the batch. Only cancellation does.
    pub async fn batch_query(
        &self,
        queries: &[Query],
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<BatchOutcome, BatchError> {
        if queries.is_empty() {
            debug!("Empty query batch, nothing to retrieve");
            return Ok(BatchOutcome::default());
        }

        let vectors = match unless_cancelled(cancel, self.embed_all(queries)).await {
            Some(vectors) => vectors,
            None => return Err(BatchError::Cancelled),
        };

        // One snapshot for the whole batch; a concurrent refresh only
        // affects the next batch.
        let catalog = self.catalog.snapshot();
        let filters: Vec<Option<ResolvedFilter>> = queries
            .iter()
            .map(|query| {
                let filter = FilterResolver::resolve(query.effective_filters(), &catalog);
                if let Some(filter) = &filter {
                    debug!("Resolved filter for {}: {:?}", query, filter.must);
                }
                filter
            })
            .collect();

        let batched = match unless_cancelled(cancel, self.search_all(queries, &vectors, &filters))
            .await
        {
            Some(batched) => batched,
            None => return Err(BatchError::Cancelled),
        };
        if let Some(batch) = batched {
            for outcome in batch.outcomes() {
                Self::report(outcome, progress);
            }
            return Ok(batch);
        }

        self.search_each(queries, vectors, filters, progress, cancel)
            .await
    }

    /// One index round trip for the whole batch.
    ///
    /// `None` when a query has no vector yet or the call fails.
    async fn search_all(
        &self,
        queries: &[Query],
        vectors: &[Option<Vec<f32>>],
        filters: &[Option<ResolvedFilter>],
    ) -> Option<BatchOutcome> {
        let requests = vectors
            .iter()
            .zip(filters)
            .map(|(vector, filter)| {
                Some(VectorQuery {
                    vector: vector.clone()?,
                    limit: self.params.neighbors_per_query,
                    filter: filter.clone(),
                })
            })
            .collect::<Option<Vec<_>>>()?;

        let searched =
            tokio::time::timeout(self.params.call_timeout, self.index.search_batch(&requests));
        match searched.await {
            Ok(Ok(results)) if results.len() == queries.len() => {
                let outcomes = queries
                    .iter()
                    .cloned()
                    .zip(results)
                    .map(|(query, points)| QueryOutcome {
                        query,
                        result: Ok(Self::into_resources(points)),
                    })
                    .collect();
                Some(BatchOutcome { outcomes })
            }
            Ok(Ok(results)) => {
                warn!(
                    "Batch search returned {} result lists for {} queries, searching one by one",
                    results.len(),
                    queries.len()
                );
                None
            }
            Ok(Err(e)) => {
                warn!("Batch search failed, searching one by one: {}", e);
                None
            }
            Err(_) => {
                warn!("Batch search timed out, searching one by one");
                None
            }
        }
    }

    /// Search every query in its own task so one failure stays with its query.
    async fn search_each(
        &self,
        queries: &[Query],
        vectors: Vec<Option<Vec<f32>>>,
        filters: Vec<Option<ResolvedFilter>>,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<BatchOutcome, BatchError> {
        let deadline = self.params.call_timeout;
        let limit = self.params.neighbors_per_query;
        let semaphore = Arc::new(Semaphore::new(self.params.concurrency_for(queries.len())));
        let mut join_set = JoinSet::new();
        let mut pending: HashMap<task::Id, Query> = HashMap::new();

        for ((query, vector), filter) in queries.iter().cloned().zip(vectors).zip(filters) {
            let embedder = Arc::clone(&self.embedder);
            let index = Arc::clone(&self.index);
            let semaphore = Arc::clone(&semaphore);
            let submitted = query.clone();

            let handle = join_set.spawn(async move {
                match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        Self::retrieve_one(
                            embedder.as_ref(),
                            index.as_ref(),
                            &query,
                            vector,
                            filter,
                            limit,
                            deadline,
                        )
                        .await
                    }
                    Err(e) => Err(RetrievalError::Worker(e.to_string())),
                }
            });
            pending.insert(handle.id(), submitted);
        }

        let mut batch = BatchOutcome::default();
        loop {
            let Some(joined) = unless_cancelled(cancel, join_set.join_next_with_id()).await else {
                join_set.abort_all();
                return Err(BatchError::Cancelled);
            };
            let Some(joined) = joined else {
                break;
            };

            let (id, result) = match joined {
                Ok((id, result)) => (id, result),
                Err(e) => {
                    warn!("Retrieval worker failed: {}", e);
                    (e.id(), Err(RetrievalError::Worker(e.to_string())))
                }
            };
            let Some(query) = pending.remove(&id) else {
                warn!("Retrieval worker {} has no query", id);
                continue;
            };

            let outcome = QueryOutcome { query, result };
            Self::report(&outcome, progress);
            batch.outcomes.push(outcome);
        }

        Ok(batch)
    }

    fn report(outcome: &QueryOutcome, progress: &dyn ProgressNotifier) {
        let label = outcome.query.to_string();
        match &outcome.result {
            Ok(resources) => {
                info!("Query {} returned {} resources", label, resources.len());
                progress.on_task_complete(&ResearchPhase::Retrieve, &label, true);
            }
            Err(e) => {
                warn!("Query {} failed: {}", label, e);
                progress.on_task_complete(&ResearchPhase::Retrieve, &label, false);
            }
        }
    }

    fn into_resources(points: Vec<IndexPoint>) -> Vec<RetrievedResource> {
        dedup_by_id(points.into_iter().map(IndexPoint::into_resource).collect())
    }

    /// Summarize a batch of resources and return them as a state update
    /// appending to the running summary list.
    ///
    /// Resources whose id already appeared earlier in the batch are
    /// dropped first. A failing summarization call fails the whole step.
    pub async fn summarize_and_accumulate(
        &self,
        resources: Vec<RetrievedResource>,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<StateUpdate, BatchError> {
        let total = resources.len();
        let resources = dedup_by_id(resources);
        if resources.len() < total {
            debug!(
                "Dropped {} duplicate resources before summarizing",
                total - resources.len()
            );
        }
        if resources.is_empty() {
            return Ok(StateUpdate::summarized(Vec::new()));
        }

        progress.on_tasks_added(&ResearchPhase::Retrieve, resources.len());

        let deadline = self.params.call_timeout;
        let semaphore = Arc::new(Semaphore::new(
            self.params.concurrency_for(resources.len()),
        ));
        let mut join_set = JoinSet::new();

        for resource in resources {
            let gateway = Arc::clone(&self.gateway);
            let spec = self.summarize_spec.clone();
            let semaphore = Arc::clone(&semaphore);

            join_set.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        shared::ask(
                            gateway.as_ref(),
                            &spec,
                            PromptTemplate::summarize_system(),
                            &PromptTemplate::summarize_prompt(&resource.render()),
                            deadline,
                        )
                        .await
                    }
                    Err(e) => Err(GatewayError::Other(e.to_string())),
                };
                (resource.id, result)
            });
        }

        let mut summaries = Vec::new();
        loop {
            let Some(joined) = unless_cancelled(cancel, join_set.join_next()).await else {
                join_set.abort_all();
                return Err(BatchError::Cancelled);
            };
            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok((id, Ok(summary))) => {
                    progress.on_task_complete(&ResearchPhase::Retrieve, id.as_str(), true);
                    if summary.trim().is_empty() {
                        warn!("Empty summary for resource {}, skipping", id);
                    } else {
                        summaries.push(summary);
                    }
                }
                Ok((id, Err(e))) => {
                    warn!("Summarizing resource {} failed: {}", id, e);
                    progress.on_task_complete(&ResearchPhase::Retrieve, id.as_str(), false);
                    join_set.abort_all();
                    return Err(BatchError::Summarization(e));
                }
                Err(e) => {
                    warn!("Summarization worker failed: {}", e);
                    join_set.abort_all();
                    return Err(BatchError::Summarization(GatewayError::Other(format!(
                        "worker failed: {e}"
                    ))));
                }
            }
        }

        info!("Summarized {} resources", summaries.len());
        Ok(StateUpdate::summarized(summaries))
    }

    /// Embed every query text in one call; on failure each worker embeds
    /// its own text so a single bad query cannot sink the batch.
    async fn embed_all(&self, queries: &[Query]) -> Vec<Option<Vec<f32>>> {
        let texts: Vec<String> = queries.iter().map(|q| q.text.clone()).collect();
        let batch = tokio::time::timeout(self.params.call_timeout, self.embedder.embed_batch(&texts));

        match batch.await {
            Ok(Ok(vectors)) if vectors.len() == texts.len() => {
                vectors.into_iter().map(Some).collect()
            }
            Ok(Ok(vectors)) => {
                warn!(
                    "Batch embedding returned {} vectors for {} texts, embedding one by one",
                    vectors.len(),
                    texts.len()
                );
                vec![None; texts.len()]
            }
            Ok(Err(e)) => {
                warn!("Batch embedding failed, embedding one by one: {}", e);
                vec![None; texts.len()]
            }
            Err(_) => {
                warn!("Batch embedding timed out, embedding one by one");
                vec![None; texts.len()]
            }
        }
    }

    async fn retrieve_one(
        embedder: &dyn EmbeddingModel,
        index: &dyn VectorIndex,
        query: &Query,
        vector: Option<Vec<f32>>,
        filter: Option<ResolvedFilter>,
        limit: usize,
        deadline: Duration,
    ) -> Result<Vec<RetrievedResource>, RetrievalError> {
        let vector = match vector {
            Some(vector) => vector,
            None => tokio::time::timeout(deadline, embedder.embed(&query.text))
                .await
                .map_err(|_| RetrievalError::Timeout(deadline))??,
        };

        let request = VectorQuery {
            vector,
            limit,
            filter,
        };
        let points = tokio::time::timeout(deadline, index.search(&request))
            .await
            .map_err(|_| RetrievalError::Timeout(deadline))??;

        Ok(Self::into_resources(points))
    }
}
