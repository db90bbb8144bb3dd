//! # Document Rendering
//!
//! Lays paragraphs out top to bottom on fixed-size pages and encodes them with
//! `printpdf`. Lines are word-wrapped to the content width and flow onto a new
//! page when the bottom margin is reached.

use crate::{
    markup::{escape_markup, FontStyle, Inline, MarkupError, Paragraph},
    metrics::{advance, text_width},
};
use printpdf::{
    BuiltinFont, FontId, Layer, Mm, Op, ParsedFont, PdfDocument, PdfPage,
    PdfSaveOptions, Pt, TextItem, TextMatrix, TextRenderingMode,
};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

const DOCUMENT_TITLE: &str = "Fließtext";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid paragraph markup on line {line}: {source}")]
    Markup { line: usize, source: MarkupError },
    #[error("Failed to load font {0}")]
    Font(&'static str),
    #[error("PDF rendering task failed: {0}")]
    Task(String),
}

/// Page geometry and the single paragraph style, all in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub font_size: f32,
    pub leading: f32,
}

impl Default for PageLayout {
    /// US Letter, one inch margins, 10pt text on 12pt leading.
    fn default() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margin: 72.0,
            font_size: 10.0,
            leading: 12.0,
        }
    }
}

impl PageLayout {
    fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn top_baseline(&self) -> f32 {
        self.height - self.margin - self.font_size
    }
}

/// The encoded document plus a few facts about its layout.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
    pub paragraphs: usize,
    pub lines: usize,
}

/// Renders plain `content`, one paragraph per `\n`-separated line.
///
/// Every line is escaped before it is read as markup, so the text shows up
/// exactly as given.
#[instrument(skip_all, fields(content_chars = content.chars().count()))]
pub fn render(content: &str, layout: &PageLayout) -> Result<RenderedPdf, RenderError> {
    let paragraphs = content
        .split('\n')
        .enumerate()
        .map(|(idx, line)| {
            Paragraph::from_markup(&escape_markup(line))
                .map_err(|source| RenderError::Markup {
                    line: idx + 1,
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|e| error!("Error generating PDF: {e}"))?;

    render_paragraphs(&paragraphs, layout).inspect_err(|e| error!("Error generating PDF: {e}"))
}

/// Runs [`render`] on the blocking thread pool.
pub async fn render_blocking(
    content: String,
    layout: PageLayout,
) -> Result<RenderedPdf, RenderError> {
    tokio::task::spawn_blocking(move || render(&content, &layout))
        .await
        .map_err(|e| {
            error!("PDF rendering task panicked or was cancelled: {e}");
            RenderError::Task(e.to_string())
        })?
}

/// Lays out already-built paragraphs and encodes the document.
pub fn render_paragraphs(
    paragraphs: &[Paragraph],
    layout: &PageLayout,
) -> Result<RenderedPdf, RenderError> {
    let mut doc = PdfDocument::new(DOCUMENT_TITLE);
    let layer_id = doc.add_layer(&Layer::new("Text"));
    let fonts = Fonts::load(&mut doc)?;

    let lines: Vec<LaidLine> = paragraphs
        .iter()
        .flat_map(|p| wrap_paragraph(p, layout))
        .collect();

    let begin_page = || {
        vec![Op::BeginLayer {
            layer_id: layer_id.clone(),
        }]
    };

    let mut pages: Vec<Vec<Op>> = vec![begin_page()];
    let mut baseline = layout.top_baseline();
    for line in &lines {
        if baseline < layout.margin {
            pages.push(begin_page());
            baseline = layout.top_baseline();
        }
        if let Some(ops) = pages.last_mut() {
            write_line(ops, line, layout, baseline, &fonts);
        }
        baseline -= layout.leading;
    }

    let page_count = pages.len();
    for mut ops in pages {
        ops.push(Op::EndLayer {
            layer_id: layer_id.clone(),
        });
        doc.pages
            .push(PdfPage::new(pt_to_mm(layout.width), pt_to_mm(layout.height), ops));
    }

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        warn!("PDF generation warnings: {warnings:?}");
    }

    info!(
        pages = page_count,
        paragraphs = paragraphs.len(),
        bytes = bytes.len(),
        "Rendered PDF."
    );
    Ok(RenderedPdf {
        bytes,
        pages: page_count,
        paragraphs: paragraphs.len(),
        lines: lines.len(),
    })
}

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn write_line(
    ops: &mut Vec<Op>,
    line: &LaidLine,
    layout: &PageLayout,
    baseline: f32,
    fonts: &Fonts,
) {
    if line.runs.is_empty() {
        return;
    }
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextMatrix {
        matrix: TextMatrix::Translate(Pt(layout.margin), Pt(baseline)),
    });
    ops.push(Op::SetTextRenderingMode {
        mode: TextRenderingMode::Fill,
    });
    for (text, style) in &line.runs {
        let font = fonts.get(*style);
        ops.push(Op::SetFontSize {
            size: Pt(layout.font_size),
            font: font.clone(),
        });
        ops.push(Op::WriteText {
            items: vec![TextItem::Text(text.clone())],
            font,
        });
    }
    ops.push(Op::EndTextSection);
}

/// One embedded font per style.
struct Fonts {
    regular: FontId,
    bold: FontId,
    italic: FontId,
    bold_italic: FontId,
}

impl Fonts {
    fn load(doc: &mut PdfDocument) -> Result<Self, RenderError> {
        Ok(Self {
            regular: load_builtin(doc, BuiltinFont::Helvetica, "Helvetica")?,
            bold: load_builtin(doc, BuiltinFont::HelveticaBold, "Helvetica-Bold")?,
            italic: load_builtin(doc, BuiltinFont::HelveticaOblique, "Helvetica-Oblique")?,
            bold_italic: load_builtin(
                doc,
                BuiltinFont::HelveticaBoldOblique,
                "Helvetica-BoldOblique",
            )?,
        })
    }

    fn get(&self, style: FontStyle) -> FontId {
        match style {
            FontStyle::Regular => self.regular.clone(),
            FontStyle::Bold => self.bold.clone(),
            FontStyle::Italic => self.italic.clone(),
            FontStyle::BoldItalic => self.bold_italic.clone(),
        }
    }
}

fn load_builtin(
    doc: &mut PdfDocument,
    builtin: BuiltinFont,
    name: &'static str,
) -> Result<FontId, RenderError> {
    let font_bytes = builtin.get_subset_font().bytes;
    let font = ParsedFont::from_bytes(&font_bytes, 0, &mut Vec::new())
        .ok_or(RenderError::Font(name))?;
    Ok(doc.add_font(&font))
}

// --- Line wrapping ---

/// A wrapped output line: styled runs drawn left to right.
#[derive(Debug, Default, Clone, PartialEq)]
struct LaidLine {
    runs: Vec<(String, FontStyle)>,
}

impl LaidLine {
    fn push(&mut self, text: &str, style: FontStyle) {
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some((last, last_style)) if *last_style == style => last.push_str(text),
            _ => self.runs.push((text.to_string(), style)),
        }
    }
}

/// Breaks a paragraph into lines that fit the content width.
///
/// Always returns at least one line, so an empty paragraph still takes up
/// vertical space.
fn wrap_paragraph(paragraph: &Paragraph, layout: &PageLayout) -> Vec<LaidLine> {
    let max_width = layout.content_width();
    let size = layout.font_size;
    let mut lines = Vec::new();
    let mut line = LaidLine::default();
    let mut width = 0.0_f32;

    for inline in &paragraph.inlines {
        let (text, style) = match inline {
            Inline::Text { text, style } => (text, *style),
            Inline::LineBreak => {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
                continue;
            }
        };

        for (i, word) in text.split(' ').enumerate() {
            // Words keep the space that separated them from the previous word.
            let sep = if i > 0 && width > 0.0 { " " } else { "" };
            let word_width = text_width(word, style, size);
            let sep_width = text_width(sep, style, size);

            if width + sep_width + word_width <= max_width {
                line.push(sep, style);
                line.push(word, style);
                width += sep_width + word_width;
                continue;
            }

            if width > 0.0 {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
            }

            // A single word wider than the line is hard-split.
            let mut chunk = String::new();
            for c in word.chars() {
                let c_width = f32::from(advance(c, style)) * size / 1000.0;
                if width + c_width > max_width && !chunk.is_empty() {
                    line.push(&chunk, style);
                    lines.push(std::mem::take(&mut line));
                    chunk.clear();
                    width = 0.0;
                }
                chunk.push(c);
                width += c_width;
            }
            line.push(&chunk, style);
        }
    }

    if !line.runs.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> PageLayout {
        PageLayout::default()
    }

    fn line_text(line: &LaidLine) -> String {
        line.runs.iter().map(|(t, _)| t.as_str()).collect()
    }

    #[test]
    fn test_short_paragraph_is_one_line() {
        let lines = wrap_paragraph(&Paragraph::plain("Hallo Welt"), &layout());
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "Hallo Welt");
    }

    #[test]
    fn test_empty_paragraph_takes_a_line() {
        let lines = wrap_paragraph(&Paragraph::plain(""), &layout());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].runs.is_empty());
    }

    #[test]
    fn test_long_paragraph_wraps_within_width() {
        let text = "Wort ".repeat(200);
        let layout = layout();
        let lines = wrap_paragraph(&Paragraph::plain(text.trim_end()), &layout);

        assert!(lines.len() > 1);
        for line in &lines {
            let text = line_text(line);
            let width = text_width(&text, FontStyle::Regular, layout.font_size);
            assert!(width <= layout.content_width());
            assert!(!text.starts_with(' '));
        }
        let rejoined: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(rejoined.join(" "), text.trim_end());
    }

    #[test]
    fn test_overlong_word_is_split() {
        let word = "x".repeat(300);
        let lines = wrap_paragraph(&Paragraph::plain(&word), &layout());
        assert!(lines.len() > 1);
        assert_eq!(lines.iter().map(line_text).collect::<String>(), word);
    }

    #[test]
    fn test_wide_capitals_wrap_by_glyph_width() {
        let layout = layout();
        let word = "W".repeat(85);
        let lines = wrap_paragraph(&Paragraph::plain(&word), &layout);

        // 468pt of content width holds 49 capital Ws at 10pt.
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[0]).chars().count(), 49);
        for line in &lines {
            let width = text_width(&line_text(line), FontStyle::Regular, layout.font_size);
            assert!(width <= layout.content_width());
        }
    }

    #[test]
    fn test_narrow_letters_share_a_line() {
        let lines = wrap_paragraph(&Paragraph::plain(&"i".repeat(200)), &layout());
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_bold_capitals_measured_as_bold() {
        let layout = layout();
        let words = "M ".repeat(60);
        let p = Paragraph::from_markup(&format!("<b>{}</b>", words.trim_end())).unwrap();
        let lines = wrap_paragraph(&p, &layout);
        assert!(lines.len() > 1);
        for line in &lines {
            let width = text_width(&line_text(line), FontStyle::Bold, layout.font_size);
            assert!(width <= layout.content_width());
        }
    }

    #[test]
    fn test_styles_stay_on_their_runs() {
        let p = Paragraph::from_markup("ein <b>fettes</b> Wort<br/>neu").unwrap();
        let lines = wrap_paragraph(&p, &layout());
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0].runs,
            vec![
                ("ein ".to_string(), FontStyle::Regular),
                ("fettes".to_string(), FontStyle::Bold),
                (" Wort".to_string(), FontStyle::Regular),
            ]
        );
        assert_eq!(line_text(&lines[1]), "neu");
    }
}
