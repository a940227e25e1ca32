//! WinAnsi (windows-1252) transcoding for the PDF core fonts.
//!
//! The standard 14 fonts only address 256 glyphs, so every string drawn in
//! the report goes through here. Characters without a WinAnsi code point
//! become `?`.

/// Code points 0x80..=0x9F, where windows-1252 departs from Latin-1.
/// Zero marks the five undefined slots.
const HIGH_CONTROL: [u32; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160, 0x2039,
    0x0152, 0, 0x017D, 0, 0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, 0x02DC,
    0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178,
];

/// Byte for `c`, if the encoding has one.
pub fn encode_char(c: char) -> Option<u8> {
    let cp = c as u32;
    match cp {
        0x20..=0x7E | 0xA0..=0xFF => Some(cp as u8),
        _ => HIGH_CONTROL
            .iter()
            .position(|&mapped| mapped != 0 && mapped == cp)
            .map(|i| 0x80 + i as u8),
    }
}

/// Rewrite `text` so every char is encodable.
///
/// Newlines survive, tabs become spaces, carriage returns and other control
/// characters are dropped, anything else unmappable becomes `?`.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\n' => Some('\n'),
            '\t' => Some(' '),
            c if c.is_control() => None,
            c if encode_char(c).is_some() => Some(c),
            _ => Some('?'),
        })
        .collect()
}

/// Encode `text` to WinAnsi bytes.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| encode_char(c).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        assert_eq!(encode("Rust 1.0!"), b"Rust 1.0!".to_vec());
    }

    #[test]
    fn latin1_maps_to_same_byte() {
        assert_eq!(encode("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_char('\u{A0}'), Some(0xA0));
    }

    #[test]
    fn windows_specific_punctuation() {
        assert_eq!(encode_char('€'), Some(0x80));
        assert_eq!(encode_char('…'), Some(0x85));
        assert_eq!(encode_char('\u{2019}'), Some(0x92));
        assert_eq!(encode_char('\u{2014}'), Some(0x97));
        assert_eq!(encode_char('Ÿ'), Some(0x9F));
    }

    #[test]
    fn unmappable_becomes_question_mark() {
        assert_eq!(encode_char('日'), None);
        assert_eq!(encode("日本"), b"??".to_vec());
        assert_eq!(normalize("a日b"), "a?b");
    }

    #[test]
    fn normalize_handles_whitespace_controls() {
        assert_eq!(normalize("a\tb\r\nc"), "a b\nc");
    }
}
