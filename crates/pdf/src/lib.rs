//! # synopdf-pdf: PDF in, PDF out
//!
//! Reading text out of uploaded PDFs and laying generated prose out as a new
//! PDF document. Both directions are CPU-bound; the `*_blocking` helpers move
//! the work onto tokio's blocking pool.

mod decode;
pub mod extract;
pub mod markup;
mod metrics;
pub mod render;

pub use extract::{extract_text, extract_text_blocking, extract_text_from_bytes, ExtractionError};
pub use markup::{escape_markup, FontStyle, Inline, MarkupError, Paragraph};
pub use render::{render, render_blocking, render_paragraphs, PageLayout, RenderError, RenderedPdf};
