//! # Document Rendering Tests
//!
//! Renders generated prose and reads the result back with the `pdf` crate to
//! make sure a valid, correctly paginated document comes out.

use pdf::file::FileOptions;
use synopdf_pdf::{render, render_blocking, render_paragraphs, PageLayout, Paragraph};

fn page_count(bytes: &[u8]) -> u32 {
    FileOptions::cached()
        .load(bytes)
        .expect("rendered output should parse as PDF")
        .num_pages()
}

#[test]
fn test_render_one_paragraph_per_line() {
    let content = "Einleitung\n\nHauptteil mit Details.\nFazit";
    let rendered = render(content, &PageLayout::default()).unwrap();

    let non_empty_lines = content.lines().filter(|l| !l.trim().is_empty()).count();
    assert!(rendered.paragraphs >= non_empty_lines);
    assert_eq!(rendered.paragraphs, 4);
    assert_eq!(rendered.pages, 1);
    assert!(rendered.bytes.starts_with(b"%PDF"));
    assert_eq!(page_count(&rendered.bytes), 1);
}

#[test]
fn test_markup_characters_do_not_break_rendering() {
    let content = "Umsatz <stieg> um 5% & mehr\n<b>nicht fett</b>\nQ&A; <br>";
    let rendered = render(content, &PageLayout::default()).unwrap();
    assert_eq!(rendered.paragraphs, 3);
    assert!(!rendered.bytes.is_empty());
}

#[test]
fn test_long_content_flows_onto_more_pages() {
    let layout = PageLayout::default();
    // 12pt leading on 648pt of usable height gives 54 lines per page.
    let content = (0..130)
        .map(|i| format!("Absatz {i}"))
        .collect::<Vec<_>>()
        .join("\n");

    let rendered = render(&content, &layout).unwrap();

    assert_eq!(rendered.lines, 130);
    assert_eq!(rendered.pages, 3);
    assert_eq!(page_count(&rendered.bytes), 3);
}

#[test]
fn test_all_capitals_line_wraps() {
    let rendered = render(&"W".repeat(85), &PageLayout::default()).unwrap();
    assert_eq!(rendered.paragraphs, 1);
    assert_eq!(rendered.lines, 2);
}

#[test]
fn test_deliberate_markup_paragraphs() {
    let paragraphs = vec![
        Paragraph::from_markup("<b>Zusammenfassung</b>").unwrap(),
        Paragraph::plain("Text mit <spitzen Klammern>"),
    ];
    let rendered = render_paragraphs(&paragraphs, &PageLayout::default()).unwrap();
    assert_eq!(rendered.paragraphs, 2);
    assert_eq!(rendered.pages, 1);
}

#[tokio::test]
async fn test_render_on_blocking_pool() {
    let rendered = render_blocking("Hallo\nWelt".to_string(), PageLayout::default())
        .await
        .unwrap();
    assert_eq!(rendered.paragraphs, 2);
}
