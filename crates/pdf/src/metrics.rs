//! Glyph advance widths of the standard Helvetica faces, in 1/1000 em, from
//! the Adobe Core 14 AFM files. The oblique faces share the upright widths.

use crate::markup::FontStyle;

/// Printable ASCII, 0x20..=0x7E.
const REGULAR_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0x30
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 0x50
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 0x60
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 0x70
];

const BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0x30
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 0x50
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 0x60
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 0x70
];

/// Latin-1 supplement, 0xA0..=0xFF.
const REGULAR_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // 0xF0
];

const BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556, // 0xF0
];

/// Advance used for characters outside the tables above.
const FALLBACK: u16 = 556;

fn is_bold(style: FontStyle) -> bool {
    matches!(style, FontStyle::Bold | FontStyle::BoldItalic)
}

/// Advance of `c` in 1/1000 em.
pub(crate) fn advance(c: char, style: FontStyle) -> u16 {
    let bold = is_bold(style);
    match u32::from(c) {
        code @ 0x20..=0x7e => {
            let table = if bold { &BOLD_ASCII } else { &REGULAR_ASCII };
            table[(code - 0x20) as usize]
        }
        code @ 0xa0..=0xff => {
            let table = if bold { &BOLD_LATIN1 } else { &REGULAR_LATIN1 };
            table[(code - 0xa0) as usize]
        }
        _ => match (c, bold) {
            ('‘' | '’' | '‚', false) => 222,
            ('‘' | '’' | '‚', true) => 278,
            ('“' | '”' | '„', false) => 333,
            ('“' | '”' | '„', true) => 500,
            ('–', _) => 556,
            ('—' | '…' | '‰', _) => 1000,
            ('•', _) => 350,
            ('€', _) => 556,
            _ => FALLBACK,
        },
    }
}

/// Width of `text` in points at `font_size`.
pub(crate) fn text_width(text: &str, style: FontStyle, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(advance(c, style))).sum();
    units as f32 * font_size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_advances() {
        assert_eq!(advance('W', FontStyle::Regular), 944);
        assert_eq!(advance('i', FontStyle::Regular), 222);
        assert_eq!(advance(' ', FontStyle::Bold), 278);
        assert_eq!(advance('m', FontStyle::Bold), 889);
        assert_eq!(advance('ß', FontStyle::Italic), 611);
        assert_eq!(advance('ü', FontStyle::BoldItalic), 611);
        assert_eq!(advance('Ä', FontStyle::Regular), 667);
    }

    #[test]
    fn test_text_width_scales_with_size() {
        assert!((text_width("Wi", FontStyle::Regular, 10.0) - 11.66).abs() < 1e-3);
        assert!((text_width("Wi", FontStyle::Regular, 20.0) - 23.32).abs() < 1e-3);
    }
}
