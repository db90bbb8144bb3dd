use std::time::Duration;
use thiserror::Error;

/// Errors raised while talking to an AI provider.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error (status {status}): {body}")]
    AiApi { status: u16, body: String },
    #[error("API key is missing")]
    MissingApiKey,
}

/// Reasons a completion did not yield usable content.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("The completion response contained no choices")]
    NoChoices,
    #[error("The first completion choice was empty")]
    EmptyContent,
    #[error("The completion request did not finish within {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Provider(#[from] PromptError),
}
