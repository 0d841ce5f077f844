use async_trait::async_trait;
use jarvis_rs_core::{ChatMessage, ChatTransport, GeneratorError, ResponseGenerator};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Returns the same reply for every prompt and records the prompts.
#[derive(Debug, Clone)]
pub struct FixedGenerator {
    reply: String,
    prompts: Arc<Mutex<Vec<String>>>,
    resets: Arc<Mutex<usize>>,
}

impl FixedGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Arc::default(),
            resets: Arc::default(),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn resets(&self) -> usize {
        *self.resets.lock()
    }
}

#[async_trait]
impl ResponseGenerator for FixedGenerator {
    async fn generate(&mut self, prompt: &str) -> Result<String, GeneratorError> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn reset(&mut self) {
        *self.resets.lock() += 1;
    }
}

/// Replies with `echo: <prompt>`.
#[derive(Debug, Clone, Default)]
pub struct EchoGenerator;

#[async_trait]
impl ResponseGenerator for EchoGenerator {
    async fn generate(&mut self, prompt: &str) -> Result<String, GeneratorError> {
        Ok(format!("echo: {prompt}"))
    }
}

/// Fails every call and counts attempts.
#[derive(Debug, Clone)]
pub struct FailingGenerator {
    message: String,
    calls: Arc<Mutex<usize>>,
}

impl FailingGenerator {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

impl Default for FailingGenerator {
    fn default() -> Self {
        Self::new("backend unavailable")
    }
}

#[async_trait]
impl ResponseGenerator for FailingGenerator {
    async fn generate(&mut self, _prompt: &str) -> Result<String, GeneratorError> {
        *self.calls.lock() += 1;
        Err(GeneratorError::Failed(self.message.clone()))
    }
}

/// Chat transport that records every request and plays back scripted replies.
///
/// Once the script runs out the default reply is returned.
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    default_reply: String,
    script: Arc<Mutex<VecDeque<Result<String, String>>>>,
    requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl RecordingTransport {
    pub fn new(default_reply: impl Into<String>) -> Self {
        Self {
            default_reply: default_reply.into(),
            script: Arc::default(),
            requests: Arc::default(),
        }
    }

    /// Queue a successful reply.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.script.lock().push_back(Ok(reply.into()));
    }

    /// Queue a failure.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.script.lock().push_back(Err(message.into()));
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GeneratorError> {
        self.requests.lock().push(messages.to_vec());
        match self.script.lock().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(GeneratorError::Failed(message)),
            None => Ok(self.default_reply.clone()),
        }
    }
}
