use crate::decode::FontDecoder;
use pdf::{
    content::{Op, TextDrawAdjusted},
    file::FileOptions,
    primitive::Name,
};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to read PDF file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse PDF content: {0}")]
    PdfParse(String),
    #[error("PDF extraction task failed: {0}")]
    Task(String),
}

/// Extracts text from all pages of a PDF held in memory.
///
/// Pages are visited in order. Strings are decoded through the font selected
/// with `Tf` (its ToUnicode map, else its encoding), defaulting to
/// StandardEncoding when no font is known. Every text object (`BT`..`ET`),
/// `T*` and vertical `Td`/`TD` move ends its line, so separate blocks do not
/// run together. A document that parses but carries no text yields an empty
/// string.
pub fn extract_text_from_bytes(pdf_data: &[u8]) -> Result<String, ExtractionError> {
    let file = FileOptions::cached()
        .load(pdf_data)
        .map_err(|e| ExtractionError::PdfParse(e.to_string()))?;
    let resolver = file.resolver();
    let mut full_text = String::new();

    for page_num in 0..file.num_pages() {
        let page = file
            .get_page(page_num)
            .map_err(|e| ExtractionError::PdfParse(e.to_string()))?;
        let Some(content) = &page.contents else {
            warn!("Page {} has no content stream.", page_num);
            continue;
        };
        let operations = content
            .operations(&resolver)
            .map_err(|e| ExtractionError::PdfParse(e.to_string()))?;
        let resources = page.resources().ok();
        let fallback = FontDecoder::default();
        let mut decoders: HashMap<Name, FontDecoder> = HashMap::new();
        let mut current: Option<Name> = None;

        for op in operations.iter() {
            let decoder = current
                .as_ref()
                .and_then(|name| decoders.get(name))
                .unwrap_or(&fallback);
            match op {
                Op::TextFont { name, .. } => {
                    if !decoders.contains_key(name) {
                        let font = resources
                            .and_then(|r| r.fonts.get(name))
                            .map(|lazy| lazy.load(&resolver));
                        let decoder = match font {
                            Some(Ok(font)) => FontDecoder::from_font(&font, &resolver),
                            Some(Err(e)) => {
                                warn!(font = %name, "Failed to load font: {e}");
                                FontDecoder::default()
                            }
                            None => {
                                warn!(font = %name, "Font missing from page resources.");
                                FontDecoder::default()
                            }
                        };
                        decoders.insert(name.clone(), decoder);
                    }
                    current = Some(name.clone());
                }
                Op::TextDraw { text } => decoder.decode_into(text.as_bytes(), &mut full_text),
                Op::TextDrawAdjusted { array } => {
                    for item in array.iter() {
                        if let TextDrawAdjusted::Text(text) = item {
                            decoder.decode_into(text.as_bytes(), &mut full_text);
                        }
                    }
                }
                Op::MoveTextPosition { translation } if translation.y != 0.0 => {
                    end_line(&mut full_text)
                }
                Op::TextNewline | Op::EndText => end_line(&mut full_text),
                _ => {}
            }
        }
        end_line(&mut full_text);
    }
    Ok(full_text)
}

fn end_line(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

/// Reads the PDF at `path` and extracts its text.
///
/// Failures are logged here and returned, so callers can tell an unreadable
/// file apart from a document without text.
#[instrument]
pub fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    let data = std::fs::read(path).map_err(|source| ExtractionError::Io {
        path: path.to_path_buf(),
        source,
    });
    let text = data.and_then(|data| extract_text_from_bytes(&data));
    match &text {
        Ok(text) => info!(chars = text.chars().count(), "Extracted text from PDF."),
        Err(e) => error!("Error extracting text from PDF: {e}"),
    }
    text
}

/// Runs [`extract_text`] on the blocking thread pool.
pub async fn extract_text_blocking(path: PathBuf) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_text(&path))
        .await
        .map_err(|e| {
            error!("PDF extraction task panicked or was cancelled: {e}");
            ExtractionError::Task(e.to_string())
        })?
}
