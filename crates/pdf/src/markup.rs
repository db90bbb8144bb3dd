//! # Inline Paragraph Markup
//!
//! Paragraphs are written in a small HTML-like markup: `<b>`/`<strong>`,
//! `<i>`/`<em>`, `<br/>` and the entities `&amp; &lt; &gt; &quot; &apos;` plus
//! numeric `&#NN;`/`&#xNN;` references. Anything else is rejected.
//!
//! Text that comes from users or from the model must go through
//! [`escape_markup`] first, otherwise a stray `<` or `&` would be read as markup.

use std::borrow::Cow;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MarkupError {
    #[error("Unknown tag <{0}>")]
    UnknownTag(String),
    #[error("Closing tag </{found}> does not match the open tag")]
    UnbalancedTag { found: String },
    #[error("Tag <{0}> is never closed")]
    UnclosedTag(String),
    #[error("Unknown entity &{0};")]
    UnknownEntity(String),
    #[error("Unterminated {0} at end of paragraph")]
    UnexpectedEnd(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => FontStyle::Regular,
            (true, false) => FontStyle::Bold,
            (false, true) => FontStyle::Italic,
            (true, true) => FontStyle::BoldItalic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text { text: String, style: FontStyle },
    LineBreak,
}

/// One block of styled text, laid out as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub inlines: Vec<Inline>,
}

/// Escapes the characters that are significant to the paragraph markup.
pub fn escape_markup(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tag {
    Bold,
    Italic,
}

impl Paragraph {
    /// A paragraph that shows `text` literally, in the regular style.
    pub fn plain(text: &str) -> Self {
        let inlines = if text.is_empty() {
            Vec::new()
        } else {
            vec![Inline::Text {
                text: text.to_string(),
                style: FontStyle::Regular,
            }]
        };
        Self { inlines }
    }

    /// Interprets `markup` into styled runs.
    pub fn from_markup(markup: &str) -> Result<Self, MarkupError> {
        let mut builder = RunBuilder::default();
        let mut open: Vec<(Tag, String)> = Vec::new();
        let mut rest = markup;

        while let Some(c) = rest.chars().next() {
            match c {
                '<' => {
                    let end = rest.find('>').ok_or(MarkupError::UnexpectedEnd("tag"))?;
                    let raw = rest[1..end].trim();
                    rest = &rest[end + 1..];
                    let name = raw.trim_end_matches('/').trim().to_ascii_lowercase();

                    if let Some(closing) = name.strip_prefix('/') {
                        let closing = closing.trim();
                        let tag = parse_style_tag(closing)
                            .ok_or_else(|| MarkupError::UnknownTag(raw.to_string()))?;
                        match open.pop() {
                            Some((top, _)) if top == tag => {}
                            _ => {
                                return Err(MarkupError::UnbalancedTag {
                                    found: closing.to_string(),
                                })
                            }
                        }
                    } else if name == "br" {
                        builder.line_break();
                    } else {
                        let tag = parse_style_tag(&name)
                            .ok_or_else(|| MarkupError::UnknownTag(raw.to_string()))?;
                        open.push((tag, name));
                    }
                    let bold = open.iter().any(|(t, _)| *t == Tag::Bold);
                    let italic = open.iter().any(|(t, _)| *t == Tag::Italic);
                    builder.set_style(FontStyle::from_flags(bold, italic));
                }
                '&' => {
                    let end = rest.find(';').ok_or(MarkupError::UnexpectedEnd("entity"))?;
                    let entity = &rest[1..end];
                    builder.push(decode_entity(entity)?);
                    rest = &rest[end + 1..];
                }
                _ => {
                    builder.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }

        if let Some((_, name)) = open.pop() {
            return Err(MarkupError::UnclosedTag(name));
        }
        Ok(builder.finish())
    }

    /// The paragraph's text with styling dropped and line breaks as `\n`.
    pub fn plain_text(&self) -> String {
        self.inlines
            .iter()
            .map(|inline| match inline {
                Inline::Text { text, .. } => text.as_str(),
                Inline::LineBreak => "\n",
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inlines.is_empty()
    }
}

fn parse_style_tag(name: &str) -> Option<Tag> {
    match name {
        "b" | "strong" => Some(Tag::Bold),
        "i" | "em" => Some(Tag::Italic),
        _ => None,
    }
}

fn decode_entity(entity: &str) -> Result<char, MarkupError> {
    let unknown = || MarkupError::UnknownEntity(entity.to_string());
    match entity {
        "amp" => Ok('&'),
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "quot" => Ok('"'),
        "apos" => Ok('\''),
        "nbsp" => Ok('\u{a0}'),
        _ => {
            let digits = entity.strip_prefix('#').ok_or_else(unknown)?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16),
                None => digits.parse(),
            }
            .map_err(|_| unknown())?;
            char::from_u32(code).ok_or_else(unknown)
        }
    }
}

/// Accumulates characters into runs, starting a new run on style changes.
#[derive(Default)]
struct RunBuilder {
    inlines: Vec<Inline>,
    current: String,
    style: FontStyle,
}

impl RunBuilder {
    fn push(&mut self, c: char) {
        self.current.push(c);
    }

    fn set_style(&mut self, style: FontStyle) {
        if style != self.style {
            self.flush();
            self.style = style;
        }
    }

    fn line_break(&mut self) {
        self.flush();
        self.inlines.push(Inline::LineBreak);
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.inlines.push(Inline::Text {
                text: std::mem::take(&mut self.current),
                style: self.style,
            });
        }
    }

    fn finish(mut self) -> Paragraph {
        self.flush();
        Paragraph {
            inlines: self.inlines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(t: &str, style: FontStyle) -> Inline {
        Inline::Text {
            text: t.to_string(),
            style,
        }
    }

    #[test]
    fn test_escaped_text_renders_literally() {
        for raw in [
            "if a < b && c > d",
            "<script>alert('x')</script>",
            "AT&T \"quoted\"",
            "&amp; already looks escaped",
            "plain",
            "",
        ] {
            let paragraph = Paragraph::from_markup(&escape_markup(raw)).unwrap();
            assert_eq!(paragraph, Paragraph::plain(raw), "input: {raw}");
        }
    }

    #[test]
    fn test_escape_borrows_when_nothing_to_do() {
        assert!(matches!(escape_markup("Hallo Welt"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_styles_and_breaks() {
        let p =
            Paragraph::from_markup("Das <b>Fazit</b>: <i>gut <b>sehr</b></i><br/>Ende").unwrap();
        assert_eq!(
            p.inlines,
            vec![
                text("Das ", FontStyle::Regular),
                text("Fazit", FontStyle::Bold),
                text(": ", FontStyle::Regular),
                text("gut ", FontStyle::Italic),
                text("sehr", FontStyle::BoldItalic),
                Inline::LineBreak,
                text("Ende", FontStyle::Regular),
            ]
        );
        assert_eq!(p.plain_text(), "Das Fazit: gut sehr\nEnde");
    }

    #[test]
    fn test_numeric_entities() {
        let p = Paragraph::from_markup("Stra&#223;e &#x263A;").unwrap();
        assert_eq!(p.plain_text(), "Straße ☺");
    }

    #[test]
    fn test_raw_markup_errors() {
        assert_eq!(
            Paragraph::from_markup("a < b"),
            Err(MarkupError::UnexpectedEnd("tag"))
        );
        assert_eq!(
            Paragraph::from_markup("<script>x</script>"),
            Err(MarkupError::UnknownTag("script".to_string()))
        );
        assert_eq!(
            Paragraph::from_markup("Q&A; time"),
            Err(MarkupError::UnknownEntity("A".to_string()))
        );
        assert_eq!(
            Paragraph::from_markup("<b>x</i>"),
            Err(MarkupError::UnbalancedTag {
                found: "i".to_string()
            })
        );
        assert_eq!(
            Paragraph::from_markup("<b>x"),
            Err(MarkupError::UnclosedTag("b".to_string()))
        );
    }
}
