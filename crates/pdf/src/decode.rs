//! # Font-Aware Text Decoding
//!
//! Text-showing operators carry character codes, not Unicode. What a code
//! means depends on the font selected with `Tf`: its `/ToUnicode` CMap when
//! present, otherwise its `/Encoding` (a base encoding plus `/Differences`).

use pdf::{
    encoding::BaseEncoding,
    font::{Font, ToUnicodeMap},
    object::Resolve,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Decodes the strings shown with one font.
#[derive(Debug, Default)]
pub(crate) struct FontDecoder {
    to_unicode: Option<ToUnicodeMap>,
    two_byte: bool,
    base: SimpleEncoding,
    differences: HashMap<u8, char>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum SimpleEncoding {
    #[default]
    Standard,
    WinAnsi,
    MacRoman,
}

impl FontDecoder {
    pub(crate) fn from_font(font: &Font, resolve: &impl Resolve) -> Self {
        let to_unicode = match font.to_unicode(resolve) {
            Some(Ok(map)) => Some(map),
            Some(Err(e)) => {
                warn!(font = ?font.name, "Ignoring unreadable ToUnicode map: {e}");
                None
            }
            None => None,
        };

        let mut decoder = Self {
            to_unicode,
            two_byte: font.is_cid(),
            ..Self::default()
        };

        if let Some(encoding) = font.encoding() {
            match encoding.base {
                BaseEncoding::WinAnsiEncoding => decoder.base = SimpleEncoding::WinAnsi,
                BaseEncoding::MacRomanEncoding => decoder.base = SimpleEncoding::MacRoman,
                BaseEncoding::IdentityH => decoder.two_byte = true,
                _ => {}
            }
            for (code, glyph) in &encoding.differences {
                let Ok(code) = u8::try_from(*code) else {
                    continue;
                };
                match glyph_to_char(glyph) {
                    Some(c) => {
                        decoder.differences.insert(code, c);
                    }
                    None => debug!(glyph = %glyph.as_str(), "Unknown glyph name in /Differences."),
                }
            }
        }
        decoder
    }

    /// Appends the Unicode text for `bytes` to `out`. Codes without a known
    /// mapping are dropped.
    pub(crate) fn decode_into(&self, bytes: &[u8], out: &mut String) {
        if self.two_byte {
            let Some(map) = &self.to_unicode else {
                debug!("Skipping two-byte text without a ToUnicode map.");
                return;
            };
            for pair in bytes.chunks_exact(2) {
                if let Some(text) = map.get(u16::from_be_bytes([pair[0], pair[1]])) {
                    out.push_str(text);
                }
            }
            return;
        }

        for &code in bytes {
            if let Some(text) = self.to_unicode.as_ref().and_then(|m| m.get(code as u16)) {
                out.push_str(text);
            } else if let Some(c) = self.differences.get(&code) {
                out.push(*c);
            } else if let Some(c) = self.base.decode(code) {
                out.push(c);
            }
        }
    }
}

impl SimpleEncoding {
    fn decode(self, code: u8) -> Option<char> {
        match (self, code) {
            (_, 0x00..=0x1f) => None,
            (SimpleEncoding::Standard, 0x27) => Some('\u{2019}'),
            (SimpleEncoding::Standard, 0x60) => Some('\u{2018}'),
            (_, 0x20..=0x7e) => Some(code as char),
            (SimpleEncoding::WinAnsi, 0x80..=0x9f) => {
                WIN_ANSI_80.chars().nth(usize::from(code - 0x80)).filter(|c| *c != '\0')
            }
            (SimpleEncoding::WinAnsi, 0xa0) => Some(' '),
            (SimpleEncoding::WinAnsi, 0xa1..=0xff) => Some(char::from(code)),
            (SimpleEncoding::MacRoman, 0x80..=0xff) => {
                MAC_ROMAN_80.chars().nth(usize::from(code - 0x80))
            }
            (SimpleEncoding::Standard, 0xa1..=0xff) => STANDARD_HIGH
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(_, ch)| *ch),
            _ => None,
        }
    }
}

/// Windows-1252 0x80..=0x9F; `\0` marks unassigned codes.
const WIN_ANSI_80: &str = "€\0‚ƒ„…†‡ˆ‰Š‹Œ\0Ž\0\0‘’“”•–—˜™š›œ\0žŸ";

const MAC_ROMAN_80: &str = concat!(
    "ÄÅÇÉÑÖÜáàâäãåçéè",
    "êëíìîïñóòôöõúùûü",
    "†°¢£§•¶ß®©™´¨≠ÆØ",
    "∞±≤≥¥µ∂∑∏π∫ªºΩæø",
    "¿¡¬√ƒ≈∆«»…\u{a0}ÀÃÕŒœ",
    "–—“”‘’÷◊ÿŸ⁄€‹›ﬁﬂ",
    "‡·‚„‰ÂÊÁËÈÍÎÏÌÓÔ",
    "\u{f8ff}ÒÚÛÙıˆ˜¯˘˙˚¸˝˛ˇ",
);

/// The upper half of Adobe StandardEncoding.
const STANDARD_HIGH: &[(u8, char)] = &[
    (0xa1, '¡'), (0xa2, '¢'), (0xa3, '£'), (0xa4, '⁄'), (0xa5, '¥'), (0xa6, 'ƒ'),
    (0xa7, '§'), (0xa8, '¤'), (0xa9, '\''), (0xaa, '“'), (0xab, '«'), (0xac, '‹'),
    (0xad, '›'), (0xae, 'ﬁ'), (0xaf, 'ﬂ'), (0xb1, '–'), (0xb2, '†'), (0xb3, '‡'),
    (0xb4, '·'), (0xb6, '¶'), (0xb7, '•'), (0xb8, '‚'), (0xb9, '„'), (0xba, '”'),
    (0xbb, '»'), (0xbc, '…'), (0xbd, '‰'), (0xbf, '¿'), (0xc1, '`'), (0xc2, '´'),
    (0xc3, 'ˆ'), (0xc4, '˜'), (0xc5, '¯'), (0xc6, '˘'), (0xc7, '˙'), (0xc8, '¨'),
    (0xca, '˚'), (0xcb, '¸'), (0xcd, '˝'), (0xce, '˛'), (0xcf, 'ˇ'), (0xd0, '—'),
    (0xe1, 'Æ'), (0xe3, 'ª'), (0xe8, 'Ł'), (0xe9, 'Ø'), (0xea, 'Œ'), (0xeb, 'º'),
    (0xf1, 'æ'), (0xf5, 'ı'), (0xf8, 'ł'), (0xf9, 'ø'), (0xfa, 'œ'), (0xfb, 'ß'),
];

/// Maps an Adobe glyph name to its character. Covers `uniXXXX`/`uXXXX`
/// names, single letters and the Latin-1 and WinAnsi repertoire.
fn glyph_to_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Some(c);
        }
    }
    if let Some(hex) = name.strip_prefix("uni").filter(|h| h.len() == 4) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(hex) = name.strip_prefix('u').filter(|h| (4..=6).contains(&h.len())) {
        if let Some(c) = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
            return Some(c);
        }
    }
    GLYPH_NAMES
        .iter()
        .find(|(glyph, _)| *glyph == name)
        .map(|(_, c)| *c)
}

const GLYPH_NAMES: &[(&str, char)] = &[
    ("space", ' '), ("exclam", '!'), ("quotedbl", '"'), ("numbersign", '#'),
    ("dollar", '$'), ("percent", '%'), ("ampersand", '&'), ("quotesingle", '\''),
    ("parenleft", '('), ("parenright", ')'), ("asterisk", '*'), ("plus", '+'),
    ("comma", ','), ("hyphen", '-'), ("period", '.'), ("slash", '/'),
    ("zero", '0'), ("one", '1'), ("two", '2'), ("three", '3'), ("four", '4'),
    ("five", '5'), ("six", '6'), ("seven", '7'), ("eight", '8'), ("nine", '9'),
    ("colon", ':'), ("semicolon", ';'), ("less", '<'), ("equal", '='),
    ("greater", '>'), ("question", '?'), ("at", '@'), ("bracketleft", '['),
    ("backslash", '\\'), ("bracketright", ']'), ("asciicircum", '^'),
    ("underscore", '_'), ("grave", '`'), ("braceleft", '{'), ("bar", '|'),
    ("braceright", '}'), ("asciitilde", '~'), ("quoteleft", '‘'), ("quoteright", '’'),
    ("quotesinglbase", '‚'), ("quotedblleft", '“'), ("quotedblright", '”'),
    ("quotedblbase", '„'), ("guilsinglleft", '‹'), ("guilsinglright", '›'),
    ("guillemotleft", '«'), ("guillemotright", '»'), ("endash", '–'), ("emdash", '—'),
    ("bullet", '•'), ("ellipsis", '…'), ("dagger", '†'), ("daggerdbl", '‡'),
    ("perthousand", '‰'), ("trademark", '™'), ("Euro", '€'), ("florin", 'ƒ'),
    ("circumflex", 'ˆ'), ("tilde", '˜'), ("fi", 'ﬁ'), ("fl", 'ﬂ'),
    ("nbspace", '\u{a0}'), ("exclamdown", '¡'), ("cent", '¢'), ("sterling", '£'),
    ("currency", '¤'), ("yen", '¥'), ("brokenbar", '¦'), ("section", '§'),
    ("dieresis", '¨'), ("copyright", '©'), ("ordfeminine", 'ª'), ("logicalnot", '¬'),
    ("sfthyphen", '\u{ad}'), ("registered", '®'), ("macron", '¯'), ("degree", '°'),
    ("plusminus", '±'), ("twosuperior", '²'), ("threesuperior", '³'), ("acute", '´'),
    ("mu", 'µ'), ("paragraph", '¶'), ("periodcentered", '·'), ("cedilla", '¸'),
    ("onesuperior", '¹'), ("ordmasculine", 'º'), ("onequarter", '¼'), ("onehalf", '½'),
    ("threequarters", '¾'), ("questiondown", '¿'), ("multiply", '×'), ("divide", '÷'),
    ("Agrave", 'À'), ("Aacute", 'Á'), ("Acircumflex", 'Â'), ("Atilde", 'Ã'),
    ("Adieresis", 'Ä'), ("Aring", 'Å'), ("AE", 'Æ'), ("Ccedilla", 'Ç'),
    ("Egrave", 'È'), ("Eacute", 'É'), ("Ecircumflex", 'Ê'), ("Edieresis", 'Ë'),
    ("Igrave", 'Ì'), ("Iacute", 'Í'), ("Icircumflex", 'Î'), ("Idieresis", 'Ï'),
    ("Eth", 'Ð'), ("Ntilde", 'Ñ'), ("Ograve", 'Ò'), ("Oacute", 'Ó'),
    ("Ocircumflex", 'Ô'), ("Otilde", 'Õ'), ("Odieresis", 'Ö'), ("Oslash", 'Ø'),
    ("Ugrave", 'Ù'), ("Uacute", 'Ú'), ("Ucircumflex", 'Û'), ("Udieresis", 'Ü'),
    ("Yacute", 'Ý'), ("Thorn", 'Þ'), ("germandbls", 'ß'), ("agrave", 'à'),
    ("aacute", 'á'), ("acircumflex", 'â'), ("atilde", 'ã'), ("adieresis", 'ä'),
    ("aring", 'å'), ("ae", 'æ'), ("ccedilla", 'ç'), ("egrave", 'è'), ("eacute", 'é'),
    ("ecircumflex", 'ê'), ("edieresis", 'ë'), ("igrave", 'ì'), ("iacute", 'í'),
    ("icircumflex", 'î'), ("idieresis", 'ï'), ("eth", 'ð'), ("ntilde", 'ñ'),
    ("ograve", 'ò'), ("oacute", 'ó'), ("ocircumflex", 'ô'), ("otilde", 'õ'),
    ("odieresis", 'ö'), ("oslash", 'ø'), ("ugrave", 'ù'), ("uacute", 'ú'),
    ("ucircumflex", 'û'), ("udieresis", 'ü'), ("yacute", 'ý'), ("thorn", 'þ'),
    ("ydieresis", 'ÿ'), ("Ydieresis", 'Ÿ'), ("OE", 'Œ'), ("oe", 'œ'),
    ("Scaron", 'Š'), ("scaron", 'š'), ("Zcaron", 'Ž'), ("zcaron", 'ž'),
    ("Lslash", 'Ł'), ("lslash", 'ł'), ("dotlessi", 'ı'),
];
