pub mod gemini;
pub mod openai;

use crate::errors::PromptError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with a chat-completion style AI provider.
///
/// Implementations send the prompt as a single user message and hand back the
/// text of every returned choice, in the order the provider returned them. They
/// do not judge whether the content is usable; that is the job of
/// [`crate::ContentGenerator`].
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    async fn complete(&self, prompt: &str) -> Result<Vec<String>, PromptError>;
}

dyn_clone::clone_trait_object!(AiProvider);
