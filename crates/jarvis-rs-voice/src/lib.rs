//! Input and output adapters for the assistant loop.

pub mod console;
pub mod error;
pub mod speech;

use async_trait::async_trait;

pub use console::{ConsoleInput, ConsoleOutput};
pub use error::VoiceError;
pub use speech::{DEFAULT_SPEECH_RATE, SpeechOutput};

/// Source of user utterances.
#[async_trait]
pub trait VoiceInput: Send {
    /// Next utterance. An empty string means nothing was heard.
    async fn listen(&mut self) -> Result<String, VoiceError>;
}

/// Sink for assistant responses.
#[async_trait]
pub trait VoiceOutput: Send {
    async fn speak(&mut self, text: &str) -> Result<(), VoiceError>;
}
