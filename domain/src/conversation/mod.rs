//! Conversation domain
//!
//! The raw chat transcript ([`Message`]) and the condensed [`Conversation`]
//! the research loop works from.

pub mod entities;

pub use entities::{Conversation, Message, Role};
