//! # Presentation Handler
//!
//! `POST /generate_presentation` takes a PDF plus optional form fields and
//! answers with a newly rendered PDF. The stages run strictly in order:
//! upload, extraction, form data, generation, rendering, response. The first
//! failing stage decides the error the client sees.

use crate::{errors::AppError, state::AppState, upload::UploadError};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use axum_extra::extract::Multipart;
use synopdf::{prompts::truncate_to_chars, GenerationRequest};
use synopdf_pdf::{extract_text_blocking, render_blocking};
use tracing::{info, warn};

/// The raw multipart submission.
#[derive(Debug, Default)]
struct PresentationForm {
    pdf_file: Option<(String, Vec<u8>)>,
    keywords: String,
    question: String,
    additional_instructions: String,
    form_error: Option<String>,
}

/// Drains the multipart stream.
///
/// A broken stream is an upload failure. A text field that cannot be decoded
/// is remembered as a form data failure, which is only reported once the
/// earlier stages have succeeded.
async fn read_form(mut multipart: Multipart) -> Result<PresentationForm, UploadError> {
    let mut form = PresentationForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "pdf_file" => {
                let file_name = field.file_name().unwrap_or("upload.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| UploadError::Multipart(e.to_string()))?;
                form.pdf_file = Some((file_name, data.to_vec()));
            }
            "keywords" | "question" | "additional_instructions" => {
                let value = match field.text().await {
                    Ok(value) => value,
                    Err(e) => {
                        form.form_error.get_or_insert(format!("field '{name}': {e}"));
                        continue;
                    }
                };
                match name.as_str() {
                    "keywords" => form.keywords = value,
                    "question" => form.question = value,
                    _ => form.additional_instructions = value,
                }
            }
            other => warn!(field = other, "Ignoring unknown form field."),
        }
    }

    Ok(form)
}

/// The handler for the `/generate_presentation` endpoint.
pub async fn generate_presentation_handler(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    // --- Upload ---
    let form = read_form(multipart).await?;
    let (file_name, data) = form.pdf_file.ok_or(UploadError::MissingFile)?;
    let upload = app_state.uploads.save(&file_name, &data).await?;
    drop(data);

    // --- Extraction ---
    let extracted = extract_text_blocking(upload.path().to_path_buf()).await;
    upload.remove().await;
    let extracted = extracted?;
    info!(chars = extracted.chars().count(), "Text extracted from upload.");

    // --- Form data ---
    if let Some(e) = form.form_error {
        return Err(AppError::FormData(e));
    }
    let request = GenerationRequest {
        extracted_text: truncate_to_chars(&extracted, app_state.config.max_input_chars)
            .to_string(),
        keywords: form.keywords,
        question: form.question,
        additional_instructions: form.additional_instructions,
    };

    // --- Generation ---
    let content = app_state.generator.generate(&request.to_prompt()).await?;

    // --- Rendering ---
    let rendered = render_blocking(content, app_state.page_layout).await?;
    info!(
        pages = rendered.pages,
        paragraphs = rendered.paragraphs,
        bytes = rendered.bytes.len(),
        "Presentation PDF rendered."
    );

    // --- Response ---
    pdf_response(rendered.bytes, &app_state.config.output_filename)
}

fn pdf_response(bytes: Vec<u8>, filename: &str) -> Result<Response, AppError> {
    let disposition = HeaderValue::from_str(&content_disposition(filename))
        .map_err(|e| AppError::Response(e.to_string()))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(bytes))
        .map_err(|e| AppError::Response(e.to_string()))
}

/// Builds an attachment disposition carrying both an ASCII fallback name and
/// the exact UTF-8 name (RFC 6266 / RFC 5987).
pub fn content_disposition(filename: &str) -> String {
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii_fallback(filename),
        urlencoding::encode(filename)
    )
}

fn ascii_fallback(filename: &str) -> String {
    let mut out = String::with_capacity(filename.len());
    for c in filename.chars() {
        match c {
            'ß' => out.push_str("ss"),
            'ä' => out.push_str("ae"),
            'ö' => out.push_str("oe"),
            'ü' => out.push_str("ue"),
            'Ä' => out.push_str("Ae"),
            'Ö' => out.push_str("Oe"),
            'Ü' => out.push_str("Ue"),
            '"' | '\\' => out.push('_'),
            c if c.is_ascii_graphic() || c == ' ' => out.push(c),
            _ => out.push('_'),
        }
    }
    out
}
