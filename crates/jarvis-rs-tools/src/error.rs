//! Command error types.

/// Errors returned by command executors and process runners.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Program could not be resolved on PATH.
    #[error("program not found: {0}")]
    ProgramNotFound(String),
    /// Process ran but reported failure.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
    /// Launcher argv is unusable.
    #[error("invalid command: {0}")]
    InvalidCommand(String),
}
