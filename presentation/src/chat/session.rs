//! Conversation history and command parsing for the chat loop.

use scholia_domain::{Message, Role};

/// Opening system message of every chat.
pub const SYSTEM_MESSAGE: &str = "You are a helpful philosophical research assistant.";

/// Messages exchanged so far, starting with the system message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    messages: Vec<Message>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::system(SYSTEM_MESSAGE)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push_user(&mut self, content: &str) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: &str) {
        self.messages.push(Message::assistant(content));
    }

    /// Drop the trailing user message after a failed turn.
    pub fn discard_pending_user(&mut self) {
        if self.messages.len() > 1 && self.messages.last().is_some_and(|m| m.role == Role::User) {
            self.messages.pop();
        }
    }

    /// Back to just the system message.
    pub fn clear(&mut self) {
        self.messages.truncate(1);
    }

    /// Number of completed user turns.
    pub fn turns(&self) -> usize {
        self.messages.iter().filter(|m| m.role == Role::User).count()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// What a line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    Clear,
    Unknown(String),
    Ask(String),
    Empty,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "" => ReplCommand::Empty,
            "exit" | "quit" | "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/clear" => ReplCommand::Clear,
            _ if line.starts_with('/') => ReplCommand::Unknown(line.to_string()),
            _ => ReplCommand::Ask(line.to_string()),
        }
    }
}
