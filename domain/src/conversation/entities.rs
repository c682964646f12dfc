//! Conversation domain entities

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Condensed view of a chat: the question being answered plus a summary
/// of everything said before it.
///
/// Built once at the start of a research cycle and never mutated after.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    last_user_message: String,
    summarized_context: String,
}

impl Conversation {
    /// Summary used when there were no prior turns.
    pub const EMPTY_CONTEXT: &'static str = "Conversation is empty.";

    pub fn new(last_user_message: impl Into<String>, summarized_context: impl Into<String>) -> Self {
        Self {
            last_user_message: last_user_message.into(),
            summarized_context: summarized_context.into(),
        }
    }

    pub fn last_user_message(&self) -> &str {
        &self.last_user_message
    }

    pub fn summarized_context(&self) -> &str {
        &self.summarized_context
    }

    /// Content of the last `User` message, or an empty string.
    pub fn last_user_content(messages: &[Message]) -> String {
        messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }

    /// Prior turns to summarize: every non-empty message strictly between
    /// the first (system) message and the last (current) one.
    pub fn prior_context(messages: &[Message]) -> String {
        if messages.len() < 3 {
            return String::new();
        }
        messages[1..messages.len() - 1]
            .iter()
            .map(|m| m.content.as_str())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
