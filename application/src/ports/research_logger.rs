//! Port for structured research logging.
//!
//! Defines the [`ResearchLogger`] trait for recording research-loop events
//! (planned queries, retrieval batches, assessments, final answers) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the research
//! trail in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured research event for logging.
pub struct ResearchEvent {
    /// Event type identifier (e.g., "queries_planned", "assessment").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ResearchEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging research events to a structured log.
///
/// `log` is synchronous and non-fallible; logging failures must never
/// disturb a research cycle.
pub trait ResearchLogger: Send + Sync {
    fn log(&self, event: ResearchEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoResearchLogger;

impl ResearchLogger for NoResearchLogger {
    fn log(&self, _event: ResearchEvent) {}
}
