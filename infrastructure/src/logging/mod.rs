//! Logging infrastructure: structured research logging.
//!
//! Provides [`JsonlResearchLogger`], a JSONL file writer that implements
//! the [`ResearchLogger`](scholia_application::ResearchLogger) port.

mod research_log;

pub use research_log::JsonlResearchLogger;
