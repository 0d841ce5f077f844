//! Stateful chat generation over a pluggable transport.

use super::window::{ChatMessage, ChatRole, ConversationWindow};
use super::{GeneratorError, ResponseGenerator, normalize_reply};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

/// Sends a full message list to a chat backend and returns the raw reply.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GeneratorError>;
}

/// Generator that keeps a rolling [`ConversationWindow`].
///
/// The window is trimmed before the request and again after the reply is
/// appended. A failed request restores the window to its state before the
/// call, so turns after the system message keep alternating.
pub struct ChatGenerator<T> {
    transport: T,
    window: ConversationWindow,
}

impl<T: ChatTransport> ChatGenerator<T> {
    pub fn new(transport: T, system_prompt: impl Into<String>, max_turns: usize) -> Self {
        Self {
            transport,
            window: ConversationWindow::new(system_prompt, max_turns),
        }
    }

    pub fn window(&self) -> &ConversationWindow {
        &self.window
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[async_trait]
impl<T: ChatTransport> ResponseGenerator for ChatGenerator<T> {
    async fn generate(&mut self, prompt: &str) -> Result<String, GeneratorError> {
        let checkpoint = self.window.clone();
        self.window.push(ChatRole::User, prompt);
        self.window.trim();
        let raw = match self.transport.complete(self.window.messages()).await {
            Ok(raw) => raw,
            Err(err) => {
                debug!("chat request failed, window restored (window_len={})", checkpoint.len());
                self.window = checkpoint;
                return Err(err);
            }
        };
        let reply = normalize_reply(&raw);
        self.window.push(ChatRole::Assistant, reply.clone());
        self.window.trim();
        debug!(
            "chat reply appended (window_len={}, reply_len={})",
            self.window.len(),
            reply.len()
        );
        Ok(reply)
    }

    fn reset(&mut self) {
        self.window.reset();
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` transport.
#[derive(Clone)]
pub struct OpenAiTransport {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiTransport {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl std::fmt::Debug for OpenAiTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiTransport")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatTransport for OpenAiTransport {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GeneratorError> {
        debug!(
            "chat completion request (model={}, messages={})",
            self.model,
            messages.len()
        );
        let request = CompletionRequest {
            model: &self.model,
            messages,
        };
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GeneratorError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let parsed: CompletionResponse = serde_json::from_str(&body)
            .map_err(|err| GeneratorError::InvalidResponse(err.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GeneratorError::InvalidResponse("no message content".to_string()))
    }
}
