//! Response generators: stateless, windowed chat, and failover.

mod chat;
mod failover;
mod ollama;
mod window;

pub use chat::{ChatGenerator, ChatTransport, OpenAiTransport};
pub use failover::FailoverGenerator;
pub use ollama::OllamaGenerator;
pub use window::{ChatMessage, ChatRole, ConversationWindow};

use async_trait::async_trait;
use jarvis_rs_config::{GeneratorBackend, GeneratorBackendConfig, GeneratorConfig};
use log::info;
use std::time::Duration;

/// Errors returned by response generators and their transports.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Transport-level HTTP failure, including timeouts.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// Backend answered with a non-success status.
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// Backend answered with a body we could not use.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// Required API key is not available.
    #[error("missing api key (env={0})")]
    MissingApiKey(String),
    /// Any other generation failure.
    #[error("generation failed: {0}")]
    Failed(String),
}

/// Produces a reply for a prompt.
#[async_trait]
pub trait ResponseGenerator: Send {
    /// Generate a reply for `prompt`.
    async fn generate(&mut self, prompt: &str) -> Result<String, GeneratorError>;

    /// Forget any conversational state.
    fn reset(&mut self) {}
}

#[async_trait]
impl<G: ResponseGenerator + ?Sized> ResponseGenerator for Box<G> {
    async fn generate(&mut self, prompt: &str) -> Result<String, GeneratorError> {
        (**self).generate(prompt).await
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// Trim every line, drop blank lines, and join with `\n`.
pub fn normalize_reply(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn http_client(timeout_secs: u64) -> Result<reqwest::Client, GeneratorError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Build the configured generator, wrapping it with the fallback if one is set.
///
/// `api_key` looks up a key by environment variable name; it is only consulted
/// for backends that need one.
pub fn build_generator(
    config: &GeneratorConfig,
    system_prompt: &str,
    api_key: impl Fn(&str) -> Option<String>,
) -> Result<Box<dyn ResponseGenerator>, GeneratorError> {
    let primary = build_backend(&config.primary(), config.max_turns, system_prompt, &api_key)?;
    let Some(fallback_config) = &config.fallback else {
        return Ok(primary);
    };
    let fallback = build_backend(fallback_config, config.max_turns, system_prompt, &api_key)?;
    info!(
        "generator failover enabled (primary={:?}, fallback={:?})",
        config.backend, fallback_config.backend
    );
    Ok(Box::new(FailoverGenerator::new(primary, fallback)))
}

fn build_backend(
    backend: &GeneratorBackendConfig,
    max_turns: usize,
    system_prompt: &str,
    api_key: &impl Fn(&str) -> Option<String>,
) -> Result<Box<dyn ResponseGenerator>, GeneratorError> {
    let client = http_client(backend.timeout_secs)?;
    let model = backend.resolved_model();
    let base_url = backend.resolved_base_url();
    info!(
        "building generator (backend={:?}, model={}, base_url={})",
        backend.backend, model, base_url
    );
    match backend.backend {
        GeneratorBackend::Ollama => Ok(Box::new(
            OllamaGenerator::new(client, base_url, model).with_system_prompt(system_prompt),
        )),
        GeneratorBackend::OpenAi => {
            let key = api_key(&backend.api_key_env)
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| GeneratorError::MissingApiKey(backend.api_key_env.clone()))?;
            let transport = OpenAiTransport::new(client, base_url, model, key);
            Ok(Box::new(ChatGenerator::new(
                transport,
                system_prompt,
                max_turns,
            )))
        }
    }
}
