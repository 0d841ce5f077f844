//! Configuration schema for the assistant.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Root config for the assistant. Built once at startup and shared read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    /// Name the assistant announces itself with.
    #[serde(default = "default_name")]
    pub name: String,
    /// Location of the persisted memory document.
    #[serde(default = "default_memory_file")]
    pub memory_file: PathBuf,
    /// Utterances that end the interactive loop.
    #[serde(default = "default_exit_keywords")]
    pub exit_keywords: BTreeSet<String>,
    /// Prefix that routes an utterance to the command classifier.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    /// Prefix that stores the remainder of an utterance as a note.
    #[serde(default = "default_remember_prefix")]
    pub remember_prefix: String,
    /// Exact utterance that lists saved notes.
    #[serde(default = "default_list_memory_command")]
    pub list_memory_command: String,
    /// System message seeded into generation backends.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Try unprefixed utterances against the command classifier first.
    #[serde(default = "default_bare_commands")]
    pub bare_commands: bool,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            schema: None,
            name: default_name(),
            memory_file: default_memory_file(),
            exit_keywords: default_exit_keywords(),
            command_prefix: default_command_prefix(),
            remember_prefix: default_remember_prefix(),
            list_memory_command: default_list_memory_command(),
            system_prompt: default_system_prompt(),
            bare_commands: default_bare_commands(),
            generator: GeneratorConfig::default(),
            commands: CommandsConfig::default(),
            voice: VoiceConfig::default(),
        }
    }
}

impl AssistantConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> AssistantConfigBuilder {
        AssistantConfigBuilder::new()
    }

    /// Whether the utterance matches one of the exit keywords, ignoring case.
    pub fn is_exit_keyword(&self, text: &str) -> bool {
        let lowered = text.trim().to_lowercase();
        self.exit_keywords
            .iter()
            .any(|keyword| keyword.trim().to_lowercase() == lowered)
    }

    /// Keyword announced in the greeting.
    pub fn primary_exit_keyword(&self) -> Option<&str> {
        self.exit_keywords.iter().next().map(String::as_str)
    }
}

/// Builder for assembling an `AssistantConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct AssistantConfigBuilder {
    config: AssistantConfig,
}

impl AssistantConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: AssistantConfig::default(),
        }
    }

    /// Replace the assistant name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Replace the memory document path.
    pub fn memory_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.memory_file = path.into();
        self
    }

    /// Replace the exit keyword set.
    pub fn exit_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.exit_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the command prefix.
    pub fn command_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.command_prefix = prefix.into();
        self
    }

    /// Replace the remember prefix.
    pub fn remember_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.remember_prefix = prefix.into();
        self
    }

    /// Replace the list-memory trigger.
    pub fn list_memory_command(mut self, command: impl Into<String>) -> Self {
        self.config.list_memory_command = command.into();
        self
    }

    /// Replace the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    /// Toggle the bare command short-circuit.
    pub fn bare_commands(mut self, enabled: bool) -> Self {
        self.config.bare_commands = enabled;
        self
    }

    /// Replace the generator configuration.
    pub fn generator(mut self, generator: GeneratorConfig) -> Self {
        self.config.generator = generator;
        self
    }

    /// Replace the command executor configuration.
    pub fn commands(mut self, commands: CommandsConfig) -> Self {
        self.config.commands = commands;
        self
    }

    /// Replace the voice configuration.
    pub fn voice(mut self, voice: VoiceConfig) -> Self {
        self.config.voice = voice;
        self
    }

    /// Finalize and return the built `AssistantConfig`.
    pub fn build(self) -> AssistantConfig {
        self.config
    }
}

fn default_name() -> String {
    "Jarvis".to_string()
}

fn default_memory_file() -> PathBuf {
    PathBuf::from("jarvis").join("memory.json")
}

fn default_exit_keywords() -> BTreeSet<String> {
    ["exit", "quit", "stop", "shutdown"]
        .iter()
        .map(|keyword| keyword.to_string())
        .collect()
}

fn default_command_prefix() -> String {
    "run ".to_string()
}

fn default_remember_prefix() -> String {
    "remember ".to_string()
}

fn default_list_memory_command() -> String {
    "show memory".to_string()
}

fn default_system_prompt() -> String {
    "You are a concise and helpful personal AI assistant. Keep responses practical.".to_string()
}

fn default_bare_commands() -> bool {
    true
}

/// Generation backend families.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorBackend {
    /// Local Ollama server, one prompt per request, no retained context.
    #[default]
    Ollama,
    /// OpenAI-compatible chat completions with a rolling window.
    #[serde(rename = "openai")]
    OpenAi,
}

impl GeneratorBackend {
    /// Model used when none is configured.
    pub fn default_model(self) -> &'static str {
        match self {
            GeneratorBackend::Ollama => "llama3",
            GeneratorBackend::OpenAi => "gpt-4o-mini",
        }
    }

    /// Endpoint root used when none is configured.
    pub fn default_base_url(self) -> &'static str {
        match self {
            GeneratorBackend::Ollama => "http://localhost:11434",
            GeneratorBackend::OpenAi => "https://api.openai.com/v1",
        }
    }
}

/// Connection settings for a single generation backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratorBackendConfig {
    #[serde(default)]
    pub backend: GeneratorBackend,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Environment variable holding the API key for hosted backends.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeneratorBackendConfig {
    fn default() -> Self {
        Self {
            backend: GeneratorBackend::default(),
            model: None,
            base_url: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeneratorBackendConfig {
    /// Configured model or the backend default.
    pub fn resolved_model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.backend.default_model().to_string())
    }

    /// Configured base url or the backend default, without a trailing slash.
    pub fn resolved_base_url(&self) -> String {
        let base = self
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.backend.default_base_url());
        base.trim_end_matches('/').to_string()
    }
}

/// Generation settings: the primary backend plus an optional fallback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub backend: GeneratorBackend,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Prior user/assistant exchanges kept by stateful backends.
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
    /// Backend consulted when the primary fails.
    #[serde(default)]
    pub fallback: Option<GeneratorBackendConfig>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: GeneratorBackend::default(),
            model: None,
            base_url: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_turns: default_max_turns(),
            fallback: None,
        }
    }
}

impl GeneratorConfig {
    /// Connection settings of the primary backend.
    pub fn primary(&self) -> GeneratorBackendConfig {
        GeneratorBackendConfig {
            backend: self.backend,
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            api_key_env: self.api_key_env.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_turns() -> usize {
    6
}

/// Command executor settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandsConfig {
    /// Page opened by the open-browser action.
    #[serde(default = "default_browser_url")]
    pub browser_url: String,
    /// Launcher argv for the browser; the url is appended.
    #[serde(default)]
    pub browser: Option<Vec<String>>,
    /// Launcher argv for the text editor.
    #[serde(default)]
    pub editor: Option<Vec<String>>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            browser_url: default_browser_url(),
            browser: None,
            editor: None,
        }
    }
}

fn default_browser_url() -> String {
    "https://www.google.com".to_string()
}

/// Where spoken responses go.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VoiceOutputMode {
    /// Print responses to stdout.
    #[default]
    Console,
    /// Speak responses through a host text-to-speech program.
    Speech,
}

/// Voice adapter settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoiceConfig {
    #[serde(default)]
    pub output: VoiceOutputMode,
    /// Speaking rate in words per minute.
    #[serde(default = "default_rate")]
    pub rate: u32,
    /// Override for the text-to-speech program.
    #[serde(default)]
    pub speech_program: Option<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            output: VoiceOutputMode::default(),
            rate: default_rate(),
            speech_program: None,
        }
    }
}

fn default_rate() -> u32 {
    180
}

#[cfg(test)]
mod tests {
    use super::{AssistantConfig, GeneratorBackend, GeneratorBackendConfig};
    use pretty_assertions::assert_eq;

    #[test]
    fn exit_keywords_match_case_insensitively() {
        let config = AssistantConfig::default();
        assert!(config.is_exit_keyword("  QUIT "));
        assert!(config.is_exit_keyword("shutdown"));
        assert!(!config.is_exit_keyword("quit now"));
    }

    #[test]
    fn backend_defaults_resolve_per_family() {
        let ollama = GeneratorBackendConfig::default();
        assert_eq!(ollama.resolved_model(), "llama3");
        assert_eq!(ollama.resolved_base_url(), "http://localhost:11434");

        let openai = GeneratorBackendConfig {
            backend: GeneratorBackend::OpenAi,
            base_url: Some("https://proxy.local/v1/".to_string()),
            ..GeneratorBackendConfig::default()
        };
        assert_eq!(openai.resolved_model(), "gpt-4o-mini");
        assert_eq!(openai.resolved_base_url(), "https://proxy.local/v1");
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = AssistantConfig::builder()
            .name("Friday")
            .command_prefix("do ")
            .exit_keywords(["bye"])
            .build();
        assert_eq!(config.name, "Friday");
        assert_eq!(config.command_prefix, "do ");
        assert_eq!(config.primary_exit_keyword(), Some("bye"));
        assert_eq!(config.remember_prefix, "remember ");
    }
}
