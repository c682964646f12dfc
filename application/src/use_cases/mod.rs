//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod assess;
pub mod build_conversation;
pub mod compose;
pub mod plan_queries;
pub mod retrieval;
pub mod run_research;
pub(crate) mod shared;

#[cfg(test)]
pub(crate) mod test_support;
