//! Research domain
//!
//! Types that flow through the iterative retrieval loop: queries, retrieved
//! passages, the loop state, its phases and transition table, and parsing of
//! model replies.

pub mod machine;
pub mod parsing;
pub mod query;
pub mod resource;
pub mod state;

pub use machine::{Outcome, RESEARCH_LOOP_EDGES, ResearchPhase, Transition, TransitionTable};
pub use parsing::{extract_json, parse_yes_no, strip_thinking};
pub use query::{Filter, Query, QueryBatch};
pub use resource::{ResourceId, RetrievedResource, dedup_by_id};
pub use state::{ResearchState, StateUpdate};
