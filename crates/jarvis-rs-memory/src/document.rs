//! Persisted memory document model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Speaker of a conversation record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InteractionRole {
    /// Text the user said or typed.
    User,
    /// Response returned by the assistant.
    Assistant,
}

impl fmt::Display for InteractionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionRole::User => f.write_str("user"),
            InteractionRole::Assistant => f.write_str("assistant"),
        }
    }
}

/// One turn of the conversation log. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InteractionRecord {
    pub role: InteractionRole,
    pub message: String,
}

impl InteractionRecord {
    /// Build a user turn.
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            role: InteractionRole::User,
            message: message.into(),
        }
    }

    /// Build an assistant turn.
    pub fn assistant(message: impl Into<String>) -> Self {
        Self {
            role: InteractionRole::Assistant,
            message: message.into(),
        }
    }
}

/// Role tag carried by every note so notes share the record shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NoteRole {
    #[default]
    #[serde(rename = "note")]
    Note,
}

/// A user-authored memory, distinct from conversation turns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteRecord {
    pub role: NoteRole,
    pub message: String,
}

impl NoteRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            role: NoteRole::Note,
            message: message.into(),
        }
    }
}

/// Root persisted object. Field order is the on-disk order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MemoryDocument {
    pub conversation: Vec<InteractionRecord>,
    pub notes: Vec<NoteRecord>,
}

impl MemoryDocument {
    /// Empty document written on first run.
    pub fn new() -> Self {
        Self::default()
    }
}
