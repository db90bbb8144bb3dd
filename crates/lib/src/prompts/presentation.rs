//! # Presentation Summary Prompt
//!
//! The scaffold that asks the model for a flowing German prose summary of a
//! presentation. The audience of the generated document reads German, so the
//! instructions are German too.

use tracing::warn;

/// Opening request: what kind of text the model should write.
pub const PRESENTATION_INTRO: &str = "Ich benötige einen Fließtext, der die wesentlichen Inhalte \
    einer detaillierten und gründlichen Präsentation zusammenfasst.";

/// Lead-in for the keyword list. The keywords follow verbatim.
pub const PRESENTATION_KEYWORDS_LEAD: &str = "Der Fließtext soll die Hauptpunkte der Präsentation \
    mit klaren Formulierungen zusammenfassen und einen Schwerpunkt auf die folgenden \
    Schlüsselwörter legen:";

/// Lead-in for the caller's additional instructions.
pub const PRESENTATION_INSTRUCTIONS_LEAD: &str = "Zusätzliche Anweisungen:";

/// Lead-in for the extracted document text.
pub const PRESENTATION_TEXT_LEAD: &str = "Der Text der Präsentation lautet:";

/// Structure the summary should follow.
pub const PRESENTATION_STRUCTURE: &str = "Bitte beginnen Sie mit einer kurzen Einführung, \
    die einen Überblick über die Hauptthemen der Präsentation bietet, gefolgt von einer \
    kompakten Zusammenfassung der einzelnen Abschnitte. Schließen Sie den Fließtext mit den \
    wichtigsten Erkenntnissen und Schlussfolgerungen ab.";

/// Builds the prompt for a presentation summary.
///
/// The keywords, the additional instructions and the extracted text are embedded
/// verbatim. A non-empty `question` is appended after a single space and is
/// always the last thing in the prompt. The function is pure: equal inputs give
/// equal prompts.
pub fn build_prompt(
    extracted_text: &str,
    keywords: &str,
    additional_instructions: &str,
    question: &str,
) -> String {
    let mut prompt = format!(
        "{PRESENTATION_INTRO} {PRESENTATION_KEYWORDS_LEAD} {keywords}. \
         {PRESENTATION_INSTRUCTIONS_LEAD} {additional_instructions} \
         {PRESENTATION_TEXT_LEAD} {extracted_text}\n\n\
         {PRESENTATION_STRUCTURE}"
    );

    if !question.is_empty() {
        prompt.push(' ');
        prompt.push_str(question);
    }

    prompt
}

/// Cuts `text` down to at most `max_chars` characters, never splitting a char.
///
/// `None` leaves the text untouched.
pub fn truncate_to_chars(text: &str, max_chars: Option<usize>) -> &str {
    let Some(max_chars) = max_chars else {
        return text;
    };
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            warn!(
                original_chars = text.chars().count(),
                max_chars, "Extracted text exceeds the input limit, truncating."
            );
            &text[..byte_idx]
        }
        None => text,
    }
}
