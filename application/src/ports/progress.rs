//! Progress notification port
//!
//! Defines the interface for reporting progress during a research cycle.

use scholia_domain::ResearchPhase;
use std::time::Duration;

/// Callback for progress updates during a research cycle
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinners, plain lines, nothing).
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts; `total_tasks` is the fan-out width (1 for single calls)
    fn on_phase_start(&self, phase: &ResearchPhase, iteration: usize, total_tasks: usize);

    /// Called when a running phase takes on `count` more units of work
    fn on_tasks_added(&self, _phase: &ResearchPhase, _count: usize) {}

    /// Called when one unit of work inside a phase finishes
    fn on_task_complete(&self, phase: &ResearchPhase, label: &str, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &ResearchPhase, elapsed: Duration);

    /// Called once when conversation summarization finishes
    fn on_conversation_ready(&self, _elapsed: Duration) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &ResearchPhase, _iteration: usize, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: &ResearchPhase, _label: &str, _success: bool) {}
    fn on_phase_complete(&self, _phase: &ResearchPhase, _elapsed: Duration) {}
}
