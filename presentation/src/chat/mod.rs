//! Interactive chat module
//!
//! Provides a line-editor based interactive chat interface over the research agent.

mod repl;
mod session;

pub use repl::ChatRepl;
pub use session::{ChatSession, ReplCommand, SYSTEM_MESSAGE};
