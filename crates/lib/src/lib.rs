//! # synopdf
//!
//! Core building blocks for turning the text of an uploaded document into a
//! summarizing narrative: the prompt scaffold, the AI provider abstraction and
//! the content generator that enforces what counts as a usable completion.

pub mod errors;
pub mod generation;
pub mod prompts;
pub mod providers;
pub mod types;

pub use errors::{GenerationError, PromptError};
pub use generation::ContentGenerator;
pub use prompts::build_prompt;
pub use types::GenerationRequest;
