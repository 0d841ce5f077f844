//! Utterance routing.

use crate::error::JarvisError;
use crate::generator::ResponseGenerator;
use jarvis_rs_config::AssistantConfig;
use jarvis_rs_memory::MemoryService;
use jarvis_rs_tools::{Action, CommandExecutor, classify};
use log::{debug, info, warn};

const UNRECOGNIZED_COMMAND: &str = "Command not recognized.";
const NO_NOTES: &str = "No saved memory yet.";

/// Handler category chosen for an utterance, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// Text after the command prefix.
    Command(&'a str),
    /// Text after the remember prefix.
    Remember(&'a str),
    ListMemory,
    Generate,
}

impl Route<'_> {
    fn name(&self) -> &'static str {
        match self {
            Route::Command(_) => "command",
            Route::Remember(_) => "remember",
            Route::ListMemory => "list_memory",
            Route::Generate => "generate",
        }
    }
}

/// Routes utterances to commands, notes, or the generator and logs each
/// exchange.
pub struct Brain {
    config: AssistantConfig,
    memory: MemoryService,
    executor: Box<dyn CommandExecutor>,
    generator: Box<dyn ResponseGenerator>,
}

impl Brain {
    pub fn new(
        config: AssistantConfig,
        memory: MemoryService,
        executor: impl CommandExecutor + 'static,
        generator: impl ResponseGenerator + 'static,
    ) -> Self {
        Self {
            config,
            memory,
            executor: Box::new(executor),
            generator: Box::new(generator),
        }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn memory(&self) -> &MemoryService {
        &self.memory
    }

    /// Pick the handler for an already trimmed utterance.
    ///
    /// Prefixes match case-insensitively; the returned remainder keeps the
    /// original casing.
    pub fn route<'a>(&self, trimmed: &'a str) -> Route<'a> {
        let lowered = trimmed.to_lowercase();
        if let Some(rest) = strip_prefix_folded(trimmed, &lowered, &self.config.command_prefix) {
            return Route::Command(rest);
        }
        if let Some(rest) = strip_prefix_folded(trimmed, &lowered, &self.config.remember_prefix) {
            return Route::Remember(rest);
        }
        if lowered == self.config.list_memory_command.to_lowercase() {
            return Route::ListMemory;
        }
        Route::Generate
    }

    /// Handle one utterance and log the exchange.
    pub async fn handle(&mut self, text: &str) -> Result<String, JarvisError> {
        let trimmed = text.trim();
        let route = self.route(trimmed);
        debug!(
            "routing utterance (route={}, len={})",
            route.name(),
            trimmed.len()
        );
        let response = match route {
            Route::Command(rest) => match classify(rest) {
                Some(action) => execute(self.executor.as_ref(), action).await,
                None => UNRECOGNIZED_COMMAND.to_string(),
            },
            Route::Remember(rest) => {
                self.memory.add_note(rest)?;
                format!("Saved to memory: {}", rest.trim())
            }
            Route::ListMemory => {
                let notes = self.memory.list_notes();
                if notes.is_empty() {
                    NO_NOTES.to_string()
                } else {
                    format!("Memory: {}", notes.join("; "))
                }
            }
            Route::Generate => self.generator.generate(trimmed).await?,
        };
        self.memory.add_interaction(trimmed, &response)?;
        info!(
            "handled utterance (route={}, response_len={})",
            route.name(),
            response.len()
        );
        Ok(response)
    }

    /// Execute an unprefixed utterance if it is a known command.
    ///
    /// Returns `None`, and logs nothing, when the text is not a command.
    pub async fn try_direct_command(
        &mut self,
        text: &str,
    ) -> Result<Option<String>, JarvisError> {
        let trimmed = text.trim();
        let Some(action) = classify(trimmed) else {
            return Ok(None);
        };
        let response = execute(self.executor.as_ref(), action).await;
        self.memory.add_interaction(trimmed, &response)?;
        info!(
            "handled direct command (action={}, response_len={})",
            action,
            response.len()
        );
        Ok(Some(response))
    }

    /// Forget the generator's conversational state.
    pub fn reset_conversation(&mut self) {
        self.generator.reset();
    }
}

/// Run an action, turning executor failures into a reply.
async fn execute(executor: &dyn CommandExecutor, action: Action) -> String {
    match executor.execute(action).await {
        Ok(response) => response,
        Err(err) => {
            warn!("command failed (action={action}, err={err})");
            format!("Command failed: {err}")
        }
    }
}

/// Strip `prefix` from `original` when `lowered` starts with it, ignoring case.
///
/// The cut is made after as many characters as the lowercased prefix has.
fn strip_prefix_folded<'a>(original: &'a str, lowered: &str, prefix: &str) -> Option<&'a str> {
    let prefix = prefix.to_lowercase();
    if !lowered.starts_with(&prefix) {
        return None;
    }
    let count = prefix.chars().count();
    let cut = original
        .char_indices()
        .nth(count)
        .map_or(original.len(), |(idx, _)| idx);
    Some(&original[cut..])
}
