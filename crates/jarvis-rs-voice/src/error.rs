//! Voice adapter error types.

use jarvis_rs_tools::CommandError;

/// Errors returned by input and output adapters.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Input stream reached its end.
    #[error("input closed")]
    Closed,
    /// Text-to-speech program failed.
    #[error("speech command failed: {0}")]
    Command(#[from] CommandError),
    /// No text-to-speech program is available.
    #[error("no speech program found (tried: {0})")]
    NoSpeechProgram(String),
}
