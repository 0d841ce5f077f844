//! Listen/respond loop.

use crate::brain::Brain;
use crate::error::JarvisError;
use jarvis_rs_voice::{VoiceError, VoiceInput, VoiceOutput};
use log::{debug, info, warn};

/// Spoken before the loop ends on an exit keyword.
pub const SHUTDOWN_REPLY: &str = "Shutting down.";
/// Spoken in place of a reply when generation fails.
pub const GENERATOR_UNAVAILABLE_REPLY: &str = "Sorry, I could not reach the language model.";

/// Drives a [`Brain`] from an input adapter to an output adapter.
pub struct Assistant {
    brain: Brain,
}

impl Assistant {
    pub fn new(brain: Brain) -> Self {
        Self { brain }
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    pub fn into_brain(self) -> Brain {
        self.brain
    }

    /// Greeting spoken when the loop starts.
    pub fn greeting(&self) -> String {
        let config = self.brain.config();
        let keyword = config.primary_exit_keyword().unwrap_or("exit");
        format!("{} is online. Say '{keyword}' to stop.", config.name)
    }

    /// Answer one utterance, trying bare commands first when enabled.
    pub async fn respond(&mut self, text: &str) -> Result<String, JarvisError> {
        if self.brain.config().bare_commands
            && let Some(response) = self.brain.try_direct_command(text).await?
        {
            return Ok(response);
        }
        self.brain.handle(text).await
    }

    /// Run until an exit keyword or the end of input.
    ///
    /// Generator failures are answered with [`GENERATOR_UNAVAILABLE_REPLY`];
    /// memory and adapter failures end the loop.
    pub async fn run<I, O>(&mut self, input: &mut I, output: &mut O) -> Result<(), JarvisError>
    where
        I: VoiceInput + ?Sized,
        O: VoiceOutput + ?Sized,
    {
        output.speak(&self.greeting()).await?;
        loop {
            let heard = match input.listen().await {
                Ok(text) => text,
                Err(VoiceError::Closed) => {
                    info!("input closed, stopping assistant");
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            };
            let text = heard.trim();
            if text.is_empty() {
                debug!("skipping empty input");
                continue;
            }
            if self.brain.config().is_exit_keyword(text) {
                info!("exit keyword received (keyword={text})");
                output.speak(SHUTDOWN_REPLY).await?;
                return Ok(());
            }
            let response = match self.respond(text).await {
                Ok(response) => response,
                Err(JarvisError::Generator(err)) => {
                    warn!("generator failed (err={err})");
                    GENERATOR_UNAVAILABLE_REPLY.to_string()
                }
                Err(err) => return Err(err),
            };
            output.speak(&response).await?;
        }
    }
}
