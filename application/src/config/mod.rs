//! Application-level configuration.
//!
//! - [`ResearchParams`]: research loop bounds, fan-out width and timeouts

pub mod research_params;

pub use research_params::ResearchParams;
