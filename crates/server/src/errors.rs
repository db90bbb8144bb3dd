use crate::upload::UploadError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use synopdf::GenerationError;
use synopdf_pdf::{ExtractionError, RenderError};
use tracing::error;

/// A custom error type for the server application.
///
/// Each variant names the pipeline stage that failed. The client only sees the
/// stage message; the underlying cause is logged.
#[derive(Debug)]
pub enum AppError {
    Upload(UploadError),
    Extraction(ExtractionError),
    FormData(String),
    Generation(GenerationError),
    Render(RenderError),
    Response(String),
    /// The whole request outlived `server_timeout_secs`.
    RequestTimeout,
}

impl AppError {
    pub fn stage_message(&self) -> &'static str {
        match self {
            AppError::Upload(_) => "Error handling PDF file upload.",
            AppError::Extraction(_) => "Error extracting text from PDF.",
            AppError::FormData(_) => "Error extracting form data.",
            AppError::Generation(_) => "Error generating presentation content.",
            AppError::Render(_) => "Error generating PDF.",
            AppError::Response(_) => "Error sending PDF response.",
            AppError::RequestTimeout => "Error generating presentation content.",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Upload(UploadError::Io { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upload(_) | AppError::FormData(_) => StatusCode::BAD_REQUEST,
            AppError::Extraction(ExtractionError::PdfParse(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Extraction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Generation(GenerationError::Timeout(_)) | AppError::RequestTimeout => {
                StatusCode::GATEWAY_TIMEOUT
            }
            AppError::Generation(_) => StatusCode::BAD_GATEWAY,
            AppError::Render(_) | AppError::Response(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::Upload(err)
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        AppError::Extraction(err)
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::Generation(err)
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Render(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.stage_message();
        match &self {
            AppError::Upload(e) => error!(%status, "{message} {e}"),
            AppError::Extraction(e) => error!(%status, "{message} {e}"),
            AppError::FormData(e) => error!(%status, "{message} {e}"),
            AppError::Generation(e) => error!(%status, "{message} {e}"),
            AppError::Render(e) => error!(%status, "{message} {e}"),
            AppError::Response(e) => error!(%status, "{message} {e}"),
            AppError::RequestTimeout => error!(%status, "{message} Request deadline exceeded."),
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}
