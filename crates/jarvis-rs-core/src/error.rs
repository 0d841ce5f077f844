//! Error types for the core crate.

use crate::generator::GeneratorError;
use jarvis_rs_memory::MemoryError;
use jarvis_rs_voice::VoiceError;
use thiserror::Error;

/// Errors returned by the dispatcher and the assistant loop.
#[derive(Debug, Error)]
pub enum JarvisError {
    /// Memory store error.
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),
    /// Response generation error.
    #[error("generator error: {0}")]
    Generator(#[from] GeneratorError),
    /// Input or output adapter error.
    #[error("voice error: {0}")]
    Voice(#[from] VoiceError),
}
