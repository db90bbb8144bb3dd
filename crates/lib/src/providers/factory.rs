//! # AI Provider Factory
//!
//! Builds the configured AI provider once at startup so the server and tests
//! share the same construction rules.

use crate::{
    errors::PromptError,
    providers::ai::{
        gemini::{gemini_api_url, GeminiProvider},
        openai::{OpenAiProvider, OPENAI_CHAT_COMPLETIONS_URL},
        AiProvider,
    },
};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::info;

/// The provider families the service knows how to talk to.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// OpenAI or any server speaking the chat completions protocol.
    #[default]
    Openai,
    Gemini,
}

/// Instantiates a provider.
///
/// `api_url` overrides the public endpoint of the chosen family, which is how
/// OpenAI-compatible servers and test doubles are reached.
pub fn create_provider(
    kind: ProviderKind,
    api_url: Option<&str>,
    api_key: &SecretString,
    model: &str,
) -> Result<Box<dyn AiProvider>, PromptError> {
    let provider: Box<dyn AiProvider> = match kind {
        ProviderKind::Openai => {
            let url = api_url.unwrap_or(OPENAI_CHAT_COMPLETIONS_URL).to_string();
            info!(%url, %model, "Configuring OpenAI-compatible provider.");
            Box::new(OpenAiProvider::new(url, api_key.clone(), model.to_string())?)
        }
        ProviderKind::Gemini => {
            let url = api_url
                .map(str::to_string)
                .unwrap_or_else(|| gemini_api_url(model));
            info!(%url, "Configuring Gemini provider.");
            Box::new(GeminiProvider::new(url, api_key.clone())?)
        }
    };
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_is_rejected() {
        let err = create_provider(ProviderKind::Openai, None, &SecretString::from("  "), "gpt-4")
            .unwrap_err();
        assert!(matches!(err, PromptError::MissingApiKey));
    }

    #[test]
    fn test_gemini_url_derived_from_model() {
        let provider = create_provider(
            ProviderKind::Gemini,
            None,
            &SecretString::from("k"),
            "gemini-2.0-flash",
        )
        .unwrap();
        assert!(format!("{provider:?}").contains("models/gemini-2.0-flash:generateContent"));
    }
}
