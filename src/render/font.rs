//! Standard Type1 fonts: WinAnsi encoding and glyph widths.
//!
//! Documents use the built-in Helvetica faces, so nothing is embedded and
//! text must be measured with the published AFM widths.

use unicode_normalization::UnicodeNormalization;

/// Font faces used in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    /// PostScript name of the base font.
    pub fn base_font(self) -> &'static str {
        match self {
            FontFace::Regular => "Helvetica",
            FontFace::Bold => "Helvetica-Bold",
        }
    }

    /// Resource name used in content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
        }
    }

    fn widths(self) -> &'static [u16; 224] {
        match self {
            FontFace::Regular => &HELVETICA_WIDTHS,
            FontFace::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of one encoded byte, in 1/1000 em.
    fn glyph_width(self, byte: u8) -> u16 {
        // Control codes never leave the encoder
        byte.checked_sub(0x20).map_or(0, |i| self.widths()[usize::from(i)])
    }

    /// Width of WinAnsi-encoded text at `size` points.
    pub fn measure(self, encoded: &[u8], size: f32) -> f32 {
        let units: u32 = encoded.iter().map(|&b| u32::from(self.glyph_width(b))).sum();
        units as f32 * size / 1000.0
    }

    /// Width of `text` at `size` points.
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        self.measure(&encode_win_ansi(text), size)
    }
}

/// Encode text for a WinAnsiEncoding font.
///
/// Text is NFC-normalized first so that decomposed accents map onto Latin-1
/// letters. Characters the encoding cannot represent become `?`; control
/// characters become spaces.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.nfc()
        .map(|c| match c {
            '\u{0}'..='\u{1F}' | '\u{7F}' => b' ',
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => c as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        })
        .collect()
}

// AFM advance widths for WinAnsi codes 0x20..=0xFF. Codes with no glyph
// (0x7F, 0x81, 0x8D, 0x8F, 0x90, 0x9D) are zero.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 224] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 224] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, 0,
    556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_ascii_and_latin1() {
        assert_eq!(encode_win_ansi("Ada"), b"Ada");
        assert_eq!(encode_win_ansi("café"), b"caf\xE9");
        // e + combining acute composes to é
        assert_eq!(encode_win_ansi("cafe\u{301}"), b"caf\xE9");
    }

    #[test]
    fn test_encode_specials() {
        assert_eq!(encode_win_ansi("€5 – “ok”"), b"\x805 \x96 \x93ok\x94");
        assert_eq!(encode_win_ansi("東京"), b"??");
        assert_eq!(encode_win_ansi("a\tb"), b"a b");
    }

    #[test]
    fn test_measure() {
        // "Age" = 667 + 556 + 556 at 10 pt
        assert!((FontFace::Regular.text_width("Age", 10.0) - 17.79).abs() < 1e-3);
        // bold "Age" = 722 + 611 + 556
        assert!((FontFace::Bold.text_width("Age", 10.0) - 18.89).abs() < 1e-3);
        assert_eq!(FontFace::Regular.text_width("", 10.0), 0.0);
    }

    #[test]
    fn test_width_tables_complete() {
        assert_eq!(HELVETICA_WIDTHS[usize::from(b'~' - 0x20)], 584);
        assert_eq!(HELVETICA_BOLD_WIDTHS[usize::from(b'~' - 0x20)], 584);
        assert_eq!(HELVETICA_WIDTHS[usize::from(b'W' - 0x20)], 944);
        assert_eq!(HELVETICA_WIDTHS[0xFF - 0x20], 500);
        assert_eq!(HELVETICA_BOLD_WIDTHS[0xFF - 0x20], 556);
    }

    #[test]
    fn test_measure_latin1() {
        // AFM: Ö 778, Æ 1000, æ 889, Ç 722, Ì 278
        assert_eq!(FontFace::Regular.glyph_width(0xD6), 778);
        assert_eq!(FontFace::Regular.glyph_width(0xC6), 1000);
        assert_eq!(FontFace::Regular.glyph_width(0xE6), 889);
        assert_eq!(FontFace::Regular.glyph_width(0xC7), 722);
        assert_eq!(FontFace::Regular.glyph_width(0xCC), 278);
        assert!((FontFace::Regular.text_width("ÖÆæÇÌ", 10.0) - 36.67).abs() < 1e-3);

        // bold: Ä 722, ü 611, ß 611, € 556, – 556
        assert!((FontFace::Bold.text_width("Äüß€–", 10.0) - 30.56).abs() < 1e-3);
    }
}
