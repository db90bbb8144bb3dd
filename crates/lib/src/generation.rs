//! # Content Generation
//!
//! Wraps an [`AiProvider`] with the rules that decide whether a completion is
//! usable: at least one choice, and a first choice that is not blank. The call
//! is bounded by a deadline; nothing is retried.

use crate::{errors::GenerationError, providers::ai::AiProvider};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// How much of the generated content is echoed to the log.
const LOGGED_CONTENT_CHARS: usize = 500;

#[derive(Clone, Debug)]
pub struct ContentGenerator {
    provider: Box<dyn AiProvider>,
    timeout: Duration,
}

impl ContentGenerator {
    pub fn new(provider: Box<dyn AiProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Runs one completion for `prompt` and returns the trimmed text of the
    /// first choice.
    #[instrument(skip_all, fields(prompt_chars = prompt.chars().count()))]
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let choices = match tokio::time::timeout(self.timeout, self.provider.complete(prompt)).await
        {
            Ok(Ok(choices)) => choices,
            Ok(Err(e)) => {
                error!("Completion request failed: {e}");
                return Err(e.into());
            }
            Err(_) => {
                error!(timeout = ?self.timeout, "Completion request timed out.");
                return Err(GenerationError::Timeout(self.timeout));
            }
        };

        let content = select_content(choices).inspect_err(|e| error!("{e}"))?;

        info!(chars = content.chars().count(), "Generated content.");
        debug!(
            "Generated content: {}...",
            content.chars().take(LOGGED_CONTENT_CHARS).collect::<String>()
        );
        Ok(content)
    }
}

/// Picks the usable content out of the provider's choices.
pub fn select_content(choices: Vec<String>) -> Result<String, GenerationError> {
    let first = choices.into_iter().next().ok_or(GenerationError::NoChoices)?;
    let trimmed = first.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyContent);
    }
    Ok(trimmed.to_string())
}
