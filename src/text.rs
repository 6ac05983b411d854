//! Bitmap font metrics and greedy text wrapping.
//!
//! The UI font is a fixed atlas with per-glyph advance widths; widths are
//! in texture pixels. [`wrap`] breaks text against those widths the same
//! way the HUD renderer lays it out, so wrapped output is what actually
//! fits on screen.

/// Advance width of each ASCII glyph, in atlas pixels.
///
/// Indices below 32 (control characters) are zero-width; so is 127 (DEL).
pub const GLYPH_WIDTHS: [u8; 128] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 0x00-0x0f
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 0x10-0x1f
    4, 2, 4, 7, 6, 9, 7, 2, 3, 3, 4, 6, 3, 5, 2, 7, // ' '..'/'
    6, 3, 6, 6, 6, 6, 6, 6, 6, 6, 2, 3, 5, 6, 5, 7, // '0'..'?'
    8, 6, 6, 6, 6, 6, 6, 6, 6, 4, 6, 6, 5, 8, 8, 6, // '@'..'O'
    6, 7, 6, 6, 6, 6, 8, 10, 8, 6, 6, 3, 6, 3, 6, 6, // 'P'..'_'
    4, 7, 6, 6, 6, 6, 5, 6, 6, 2, 5, 5, 2, 9, 6, 6, // '`'..'o'
    6, 6, 6, 6, 5, 6, 6, 6, 6, 6, 6, 4, 2, 5, 7, 0, // 'p'..DEL
];

/// Advance width of a single glyph, in atlas pixels.
///
/// Characters outside ASCII render as `?` and report its width.
#[must_use]
pub fn glyph_width(c: char) -> u32 {
    if c.is_ascii() {
        u32::from(GLYPH_WIDTHS[c as usize])
    } else {
        u32::from(GLYPH_WIDTHS[b'?' as usize])
    }
}

/// Total advance width of a string, in atlas pixels.
#[must_use]
pub fn line_width(text: &str) -> u32 {
    text.chars().map(glyph_width).sum()
}

/// Greedily wrap `input` so no line exceeds `max_width` pixels.
///
/// Paragraphs (split on `\r` / `\n`, blank lines dropped) wrap
/// independently; runs of spaces collapse to single separators. A word
/// wider than `max_width` is emitted on its own line rather than split.
/// Every paragraph ends with a newline in the output. Returns the wrapped
/// text and the number of lines it holds.
#[must_use]
pub fn wrap(input: &str, max_width: u32) -> (String, usize) {
    let space_width = glyph_width(' ');
    let mut output = String::with_capacity(input.len() + 1);
    let mut lines = 0;
    for paragraph in input.split(['\r', '\n']).filter(|p| !p.is_empty()) {
        let mut width = 0;
        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let word_width = line_width(word);
            if width > 0 {
                if width + word_width > max_width {
                    width = 0;
                    lines += 1;
                    output.push('\n');
                } else {
                    output.push(' ');
                }
            }
            output.push_str(word);
            width += word_width + space_width;
        }
        lines += 1;
        output.push('\n');
    }
    (output, lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_widths_spot_check() {
        assert_eq!(glyph_width(' '), 4);
        assert_eq!(glyph_width('i'), 2);
        assert_eq!(glyph_width('W'), 10);
        assert_eq!(glyph_width('?'), 7);
    }

    #[test]
    fn control_chars_are_zero_width() {
        assert_eq!(glyph_width('\t'), 0);
        assert_eq!(glyph_width('\x07'), 0);
        assert_eq!(glyph_width('\x7f'), 0);
    }

    #[test]
    fn non_ascii_falls_back_to_question_mark() {
        assert_eq!(glyph_width('é'), glyph_width('?'));
        assert_eq!(glyph_width('\u{3042}'), 7);
    }

    #[test]
    fn line_width_sums_glyphs() {
        // h=6 e=6 l=2 l=2 o=6
        assert_eq!(line_width("hello"), 22);
        assert_eq!(line_width(""), 0);
    }

    #[test]
    fn wrap_breaks_when_line_overflows() {
        // "hello" is 22px wide, "world" 26px; 22 + space(4) + 26 > 30.
        let (text, lines) = wrap("hello world", 30);
        assert_eq!(text, "hello\nworld\n");
        assert_eq!(lines, 2);
    }

    #[test]
    fn wrap_keeps_words_that_fit() {
        // 22 + 4 + 26 = 52 exactly; the break test is strictly greater.
        let (text, lines) = wrap("hello world", 52);
        assert_eq!(text, "hello world\n");
        assert_eq!(lines, 1);
    }

    #[test]
    fn wrap_empty_input_has_no_lines() {
        let (text, lines) = wrap("", 100);
        assert_eq!(text, "");
        assert_eq!(lines, 0);
    }

    #[test]
    fn wrap_drops_blank_lines() {
        let (text, lines) = wrap("a\n\n\nb", 100);
        assert_eq!(text, "a\nb\n");
        assert_eq!(lines, 2);
    }

    #[test]
    fn wrap_collapses_space_runs() {
        let (text, lines) = wrap("a    b", 100);
        assert_eq!(text, "a b\n");
        assert_eq!(lines, 1);
    }

    #[test]
    fn wrap_space_only_line_is_kept_empty() {
        let (text, lines) = wrap("   ", 100);
        assert_eq!(text, "\n");
        assert_eq!(lines, 1);
    }

    #[test]
    fn wrap_oversized_word_gets_own_line() {
        let (text, lines) = wrap("a incomprehensibilities b", 20);
        assert_eq!(text, "a\nincomprehensibilities\nb\n");
        assert_eq!(lines, 3);
    }

    #[test]
    fn wrap_counts_lines_across_paragraphs() {
        let (text, lines) = wrap("one two\nthree", 24);
        // "one"=18, "two"=17: 18+4+17 > 24 so the first paragraph splits.
        assert_eq!(text, "one\ntwo\nthree\n");
        assert_eq!(lines, 3);
    }
}
