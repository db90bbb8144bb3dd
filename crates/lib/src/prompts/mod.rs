//! # Prompt Templates
//!
//! Prompt scaffolds sent to the AI provider, grouped by the task they serve.

pub mod presentation;

pub use presentation::{build_prompt, truncate_to_chars};
