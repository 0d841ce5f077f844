//! Primary/fallback generator pair.

use super::{GeneratorError, ResponseGenerator};
use async_trait::async_trait;
use log::warn;

/// Asks `fallback` whenever `primary` fails.
pub struct FailoverGenerator<P, F> {
    primary: P,
    fallback: F,
}

impl<P: ResponseGenerator, F: ResponseGenerator> FailoverGenerator<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl<P: ResponseGenerator, F: ResponseGenerator> ResponseGenerator for FailoverGenerator<P, F> {
    async fn generate(&mut self, prompt: &str) -> Result<String, GeneratorError> {
        match self.primary.generate(prompt).await {
            Ok(reply) => Ok(reply),
            Err(err) => {
                warn!("primary generator failed, using fallback (err={err})");
                self.fallback.generate(prompt).await
            }
        }
    }

    fn reset(&mut self) {
        self.primary.reset();
        self.fallback.reset();
    }
}
