//! Stateless generation against an Ollama server.

use super::{GeneratorError, ResponseGenerator};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Sends each prompt on its own to `{base_url}/api/generate`.
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
    system_prompt: Option<String>,
}

impl OllamaGenerator {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        self.system_prompt = (!prompt.trim().is_empty()).then_some(prompt);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

#[async_trait]
impl ResponseGenerator for OllamaGenerator {
    async fn generate(&mut self, prompt: &str) -> Result<String, GeneratorError> {
        debug!(
            "ollama generate (model={}, prompt_len={})",
            self.model,
            prompt.len()
        );
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            system: self.system_prompt.as_deref(),
            stream: false,
        };
        let response = self
            .client
            .post(self.endpoint())
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
        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|err| GeneratorError::InvalidResponse(err.to_string()))?;
        debug!(
            "ollama reply received (model={}, len={})",
            self.model,
            parsed.response.len()
        );
        Ok(parsed.response)
    }
}
