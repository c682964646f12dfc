//! Research parameters: loop control for one research cycle.
//!
//! [`ResearchParams`] groups the static bounds that keep the research loop
//! finite and the retrieval fan-out polite. These are application-layer
//! concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Loop bounds and fan-out limits.
///
/// | Field | Enforced by |
/// |-------|-------------|
/// | `max_sources` | SufficiencyAssessor (folded into `satisfied`) |
/// | `max_queries` | QueryPlanner budget, orchestrator safety valve |
/// | `max_iterations` | orchestrator safety valve |
/// | `neighbors_per_query`, `worker_cap` | RetrievalEngine |
/// | `call_timeout` | every external call |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchParams {
    /// Evidence count at which research counts as sufficient.
    pub max_sources: usize,
    /// Upper bound on `queries_made` for one cycle.
    pub max_queries: usize,
    /// Upper bound on planning rounds for one cycle.
    pub max_iterations: usize,
    /// Nearest neighbours requested per query.
    pub neighbors_per_query: usize,
    /// Most queries a single planning round may issue.
    pub max_queries_per_plan: usize,
    /// Most external calls in flight inside one fan-out.
    pub worker_cap: usize,
    /// Deadline for each external call.
    pub call_timeout: Duration,
}

impl Default for ResearchParams {
    fn default() -> Self {
        Self {
            max_sources: 3,
            max_queries: 10,
            max_iterations: 5,
            neighbors_per_query: 2,
            max_queries_per_plan: 5,
            worker_cap: 5,
            call_timeout: Duration::from_secs(120),
        }
    }
}

impl ResearchParams {
    // ==================== Builder Methods ====================

    pub fn with_max_sources(mut self, max: usize) -> Self {
        self.max_sources = max;
        self
    }

    pub fn with_max_queries(mut self, max: usize) -> Self {
        self.max_queries = max;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_neighbors_per_query(mut self, limit: usize) -> Self {
        self.neighbors_per_query = limit;
        self
    }

    pub fn with_max_queries_per_plan(mut self, max: usize) -> Self {
        self.max_queries_per_plan = max;
        self
    }

    pub fn with_worker_cap(mut self, cap: usize) -> Self {
        self.worker_cap = cap;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Concurrency for a fan-out of `tasks` units, never zero.
    pub fn concurrency_for(&self, tasks: usize) -> usize {
        tasks.min(self.worker_cap).max(1)
    }
}
