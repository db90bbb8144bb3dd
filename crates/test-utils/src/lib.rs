use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use synopdf::errors::PromptError;
use synopdf::providers::ai::AiProvider;

// --- Mock AI Provider ---

/// What the mock hands back on every call.
#[derive(Clone, Debug)]
pub enum MockReply {
    Choices(Vec<String>),
    Error(u16, String),
}

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    reply: Arc<Mutex<MockReply>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAiProvider {
    /// A provider that answers every prompt with a single choice.
    pub fn new(response: &str) -> Self {
        Self::with_reply(MockReply::Choices(vec![response.to_string()]))
    }

    pub fn with_reply(reply: MockReply) -> Self {
        Self {
            reply: Arc::new(Mutex::new(reply)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replaces the programmed reply.
    pub fn set_reply(&self, reply: MockReply) {
        *self.reply.lock().unwrap() = reply;
    }

    /// Retrieves the recorded prompts for assertion.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new("Generierter Fließtext.")
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn complete(&self, prompt: &str) -> Result<Vec<String>, PromptError> {
        self.calls.lock().unwrap().push(prompt.to_string());

        match self.reply.lock().unwrap().clone() {
            MockReply::Choices(choices) => Ok(choices),
            MockReply::Error(status, body) => Err(PromptError::AiApi { status, body }),
        }
    }
}

// --- Test-Specific Helpers ---
pub mod helpers {
    use anyhow::Result;
    use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

    /// Generates a single-page PDF showing `text` in Helvetica.
    pub fn generate_test_pdf(text: &str) -> Result<Vec<u8>> {
        generate_multi_page_pdf(&[text])
    }

    /// Generates a PDF with one page per entry of `pages`, in order.
    ///
    /// Text is shown in the standard Helvetica font with `WinAnsiEncoding`.
    /// Characters outside that code page are written as `?`.
    pub fn generate_multi_page_pdf(pages: &[&str]) -> Result<Vec<u8>> {
        if pages.is_empty() {
            anyhow::bail!("a PDF needs at least one page");
        }
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let font_id = Ref::new(3);
        let font_name = Name(b"F1");

        // Each page takes two ids: the page object and its content stream.
        let page_ids: Vec<(Ref, Ref)> = (0..pages.len() as i32)
            .map(|i| (Ref::new(4 + 2 * i), Ref::new(5 + 2 * i)))
            .collect();

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().map(|(page_id, _)| *page_id))
            .count(pages.len() as i32);
        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        for ((page_id, content_id), text) in page_ids.iter().zip(pages) {
            let mut page = pdf.page(*page_id);
            page.media_box(Rect::new(0.0, 0.0, 595.0, 842.0));
            page.parent(page_tree_id);
            page.contents(*content_id);
            page.resources().fonts().pair(font_name, font_id);
            page.finish();

            let mut content = Content::new();
            content.begin_text();
            content.set_font(font_name, 14.0);
            content.next_line(108.0, 734.0);
            content.show(Str(&win_ansi_bytes(text)));
            content.end_text();
            pdf.stream(*content_id, &content.finish());
        }

        Ok(pdf.finish())
    }

    /// Generates a single-page PDF with all `lines` in one text object, each
    /// placed below the previous one with a `Td` move.
    pub fn generate_lines_pdf(lines: &[&str]) -> Result<Vec<u8>> {
        let mut pdf = Pdf::new();
        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let font_id = Ref::new(3);
        let page_id = Ref::new(4);
        let content_id = Ref::new(5);
        let font_name = Name(b"F1");

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id).kids([page_id]).count(1);
        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, 595.0, 842.0));
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources().fonts().pair(font_name, font_id);
        page.finish();

        let mut content = Content::new();
        content.begin_text();
        content.set_font(font_name, 12.0);
        content.next_line(72.0, 770.0);
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                content.next_line(0.0, -16.0);
            }
            content.show(Str(&win_ansi_bytes(line)));
        }
        content.end_text();
        pdf.stream(content_id, &content.finish());

        Ok(pdf.finish())
    }

    /// Encodes `text` as Windows-1252 bytes.
    pub fn win_ansi_bytes(text: &str) -> Vec<u8> {
        const SPECIALS: &str = "€\0‚ƒ„…†‡ˆ‰Š‹Œ\0Ž\0\0‘’“”•–—˜™š›œ\0žŸ";
        text.chars()
            .map(|c| match u32::from(c) {
                0x20..=0x7e | 0xa0..=0xff => c as u8,
                _ => SPECIALS
                    .chars()
                    .position(|s| s == c && s != '\0')
                    .map_or(b'?', |i| 0x80 + i as u8),
            })
            .collect()
    }
}
