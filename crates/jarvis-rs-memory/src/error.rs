//! Error types for memory operations.

use std::path::PathBuf;

/// Errors returned by document stores and the memory service.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The stored document could not be decoded in any known layout.
    #[error("malformed memory document at {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}
