use super::UnsupportedCharPolicy;
use crate::error::{PhiloError, Result};

/// Points per millimetre.
pub const PT_PER_MM: f64 = 72.0 / 25.4;

const FIRST_CODE: u8 = 32;

/// Base-14 Type1 fonts. No font program is embedded, so text is limited to
/// the single-byte WinAnsi (Windows-1252) set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    pub const ALL: [Font; 2] = [Font::Helvetica, Font::HelveticaBold];

    /// Name of the font in the page resource dictionary.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Advance width of a WinAnsi byte, in thousandths of the font size.
    pub fn glyph_width(&self, byte: u8) -> u16 {
        let widths = match self {
            Font::Helvetica => &HELVETICA_WIDTHS,
            Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        byte.checked_sub(FIRST_CODE)
            .map(|i| widths[i as usize])
            .unwrap_or(0)
    }

    /// Width of an encoded string in millimetres at `size_pt`.
    pub fn string_width(&self, text: &[u8], size_pt: f64) -> f64 {
        let units: u32 = text.iter().map(|b| u32::from(self.glyph_width(*b))).sum();
        f64::from(units) * size_pt / 1000.0 / PT_PER_MM
    }
}

/// Maps a character to its WinAnsi byte, if it has one.
pub fn win_ansi_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => {
            let byte = match ch {
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
                '\u{2018}' => 0x91,
                '\u{2019}' => 0x92,
                '\u{201C}' => 0x93,
                '\u{201D}' => 0x94,
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
                _ => return None,
            };
            Some(byte)
        }
    }
}

/// Encodes `text` as WinAnsi bytes, keeping `\n` as the line separator.
///
/// Tabs become a single space and carriage returns are dropped. Any other
/// character without a WinAnsi code is rejected or replaced with `?`
/// according to `policy`; `location` names the text in the error message.
pub fn encode(text: &str, policy: UnsupportedCharPolicy, location: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    for (line_no, line) in text.split('\n').enumerate() {
        if line_no > 0 {
            out.push(b'\n');
        }
        for (col, ch) in line.chars().enumerate() {
            match ch {
                '\r' => {}
                '\t' => out.push(b' '),
                _ => match (win_ansi_byte(ch), policy) {
                    (Some(byte), _) => out.push(byte),
                    (None, UnsupportedCharPolicy::Substitute) => out.push(b'?'),
                    (None, UnsupportedCharPolicy::Reject) => {
                        return Err(PhiloError::ExportRender(format!(
                            "character {:?} (U+{:04X}) in {} at line {}, column {} cannot be encoded in the PDF font",
                            ch,
                            ch as u32,
                            location,
                            line_no + 1,
                            col + 1
                        )));
                    }
                },
            }
        }
    }
    Ok(out)
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 224] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 350,
    556, 350, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 350, 611, 350,
    350, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 350, 500, 667,
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
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, 350,
    556, 350, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 350, 611, 350,
    350, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 350, 500, 667,
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
    fn test_ascii_and_latin1_pass_through() {
        let bytes = encode("Café über", UnsupportedCharPolicy::Reject, "test").unwrap();
        assert_eq!(bytes, vec![b'C', b'a', b'f', 0xE9, b' ', 0xFC, b'b', b'e', b'r']);
    }

    #[test]
    fn test_typographic_punctuation_maps_to_win_ansi() {
        let bytes =
            encode("\u{201C}Being\u{201D} — time…", UnsupportedCharPolicy::Reject, "test").unwrap();
        assert_eq!(bytes[0], 0x93);
        assert_eq!(bytes[6], 0x94);
        assert!(bytes.contains(&0x97));
        assert_eq!(*bytes.last().unwrap(), 0x85);
    }

    #[test]
    fn test_reject_reports_character_and_position() {
        let err = encode("line one\nthe 道", UnsupportedCharPolicy::Reject, "entry 1 output")
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("U+9053"), "{}", msg);
        assert!(msg.contains("entry 1 output at line 2, column 5"), "{}", msg);
    }

    #[test]
    fn test_substitute_replaces_with_question_mark() {
        let bytes = encode("a🙂b", UnsupportedCharPolicy::Substitute, "test").unwrap();
        assert_eq!(bytes, b"a?b".to_vec());
    }

    #[test]
    fn test_control_whitespace() {
        let bytes = encode("a\tb\r\nc", UnsupportedCharPolicy::Reject, "test").unwrap();
        assert_eq!(bytes, b"a b\nc".to_vec());
    }

    #[test]
    fn test_string_width() {
        // "Hello" in Helvetica: 722 + 556 + 222 + 222 + 556 = 2278 units
        let width = Font::Helvetica.string_width(b"Hello", 12.0);
        let expected = 2278.0 * 12.0 / 1000.0 / PT_PER_MM;
        assert!((width - expected).abs() < 1e-9);
        assert!(Font::HelveticaBold.string_width(b"Hello", 12.0) > width);
    }
}
