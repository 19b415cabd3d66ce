//! Terminal cell widths.

use unicode_width::UnicodeWidthChar;

/// Cells `c` occupies on screen. Control characters are drawn as a single blank;
/// zero-width characters are not drawn at all.
pub fn char_width(c: char) -> usize {
    if c.is_control() {
        1
    } else {
        c.width().unwrap_or(0)
    }
}

pub fn text_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Longest prefix of `text` that fits in `cells` columns.
pub fn truncate_to_width(text: &str, cells: usize) -> &str {
    let mut used = 0;
    for (i, c) in text.char_indices() {
        used += char_width(c);
        if used > cells {
            return &text[..i];
        }
    }
    text
}
