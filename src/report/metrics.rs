//! Glyph advance widths for the Helvetica core fonts.
//!
//! Widths are in 1/1000 em for the printable ASCII range. The upper half of
//! WinAnsi falls back to an average width; that only affects wrapping
//! precision for accented text, never what gets drawn.

use super::document::FontStyle;

/// Helvetica (and Helvetica-Oblique), chars 0x20..=0x7E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold, chars 0x20..=0x7E.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

const FALLBACK_WIDTH: u16 = 556;

/// Advance width of `c` in 1/1000 em.
pub fn char_width(style: FontStyle, c: char) -> u16 {
    let table = match style {
        FontStyle::Bold => &HELVETICA_BOLD,
        FontStyle::Regular | FontStyle::Italic => &HELVETICA,
    };
    match c as u32 {
        cp @ 0x20..=0x7E => table[(cp - 0x20) as usize],
        0xA0 => table[0],
        _ => FALLBACK_WIDTH,
    }
}

/// Width of `text` in 1/1000 em.
pub fn text_width(style: FontStyle, text: &str) -> u32 {
    text.chars().map(|c| u32::from(char_width(style, c))).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_widths() {
        assert_eq!(char_width(FontStyle::Regular, ' '), 278);
        assert_eq!(char_width(FontStyle::Regular, 'W'), 944);
        assert_eq!(char_width(FontStyle::Regular, 'i'), 222);
        assert_eq!(char_width(FontStyle::Bold, 'i'), 278);
        assert_eq!(char_width(FontStyle::Italic, 'm'), 833);
    }

    #[test]
    fn upper_half_uses_fallback() {
        assert_eq!(char_width(FontStyle::Regular, 'é'), FALLBACK_WIDTH);
    }

    #[test]
    fn text_width_sums_glyphs() {
        assert_eq!(text_width(FontStyle::Regular, "ii"), 444);
        assert_eq!(text_width(FontStyle::Bold, ""), 0);
    }
}
