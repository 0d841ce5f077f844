//! Bounded chat history for stateful generators.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One chat message as sent to a chat backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// System message followed by the most recent user/assistant turns.
///
/// The window never holds more than `1 + 2 * max_turns` messages once
/// trimmed; index 0 is always the system message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationWindow {
    messages: Vec<ChatMessage>,
    max_turns: usize,
}

impl ConversationWindow {
    pub fn new(system_prompt: impl Into<String>, max_turns: usize) -> Self {
        Self {
            messages: vec![ChatMessage::new(ChatRole::System, system_prompt)],
            max_turns,
        }
    }

    /// Upper bound on the trimmed length.
    pub fn capacity(&self) -> usize {
        1 + 2 * self.max_turns
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push(&mut self, role: ChatRole, content: impl Into<String>) {
        self.messages.push(ChatMessage::new(role, content));
    }

    /// Drop the oldest turns until the window fits, keeping the system message.
    pub fn trim(&mut self) {
        let capacity = self.capacity();
        if self.messages.len() > capacity {
            let excess = self.messages.len() - capacity;
            self.messages.drain(1..1 + excess);
        }
    }

    /// Forget every turn, keeping the system message.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }
}
