use crate::prompts::build_prompt;
use serde::Deserialize;

/// The user-supplied inputs for one summary, next to the extracted text.
///
/// Every field except `extracted_text` may be empty.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct GenerationRequest {
    pub extracted_text: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub additional_instructions: String,
}

impl GenerationRequest {
    /// Renders the request into the prompt sent to the model.
    pub fn to_prompt(&self) -> String {
        build_prompt(
            &self.extracted_text,
            &self.keywords,
            &self.additional_instructions,
            &self.question,
        )
    }
}
