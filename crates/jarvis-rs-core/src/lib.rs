//! Request routing and conversational state for the assistant.
//!
//! [`Brain`] routes one utterance to a command, a note operation, or a
//! [`ResponseGenerator`], and logs the exchange through the memory service.
//! [`Assistant`] drives the listen/respond loop on top of it.

pub mod assistant;
pub mod brain;
pub mod error;
pub mod generator;

pub use assistant::{Assistant, GENERATOR_UNAVAILABLE_REPLY, SHUTDOWN_REPLY};
pub use brain::{Brain, Route};
pub use error::JarvisError;
pub use generator::{
    ChatGenerator, ChatMessage, ChatRole, ChatTransport, ConversationWindow, FailoverGenerator,
    GeneratorError, OllamaGenerator, OpenAiTransport, ResponseGenerator, build_generator,
    normalize_reply,
};
