//! Terminal column width engine.
//!
//! A single authoritative function `char_width` returns the number of
//! terminal cells a character occupies when printed at visual column `col`.
//! Every truncation, slicing and wrapping decision in the workspace flows
//! through it so all panes agree on where a column boundary falls.
//!
//! Width Rules (evaluated in order):
//! 1. `'\t'` advances to the next 8-column tab stop: `8 - (col % 8)`.
//! 2. Zero-width combining marks (and other code points `unicode_width`
//!    reports as zero-width) consume no cells.
//! 3. East-Asian Wide / Fullwidth code points consume two cells.
//! 4. Everything else, including control characters and unassigned code
//!    points, consumes one cell.
//!
//! Invariants:
//! - Total over every `char`; never panics, never returns > 8.
//! - `column(i + 1) = column(i) + char_width(ch_i, column(i))`.
//! - Tabs are the only column-dependent width.

use unicode_width::UnicodeWidthChar;

/// Distance between tab stops in terminal columns.
pub const TAB_STOP: usize = 8;

// Combining mark ranges checked before the table lookup (hot for accented
// Latin text, and independent of `unicode_width` version drift).
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
        || ('\u{1AB0}'..='\u{1AFF}').contains(&c)
        || ('\u{1DC0}'..='\u{1DFF}').contains(&c)
        || ('\u{20D0}'..='\u{20FF}').contains(&c)
        || ('\u{FE20}'..='\u{FE2F}').contains(&c)
}

/// Return the terminal column width of `ch` printed at visual column `col`.
#[inline]
pub fn char_width(ch: char, col: usize) -> usize {
    if ch == '\t' {
        return TAB_STOP - (col % TAB_STOP);
    }
    if ch.is_ascii() {
        return 1;
    }
    if is_combining_mark(ch) {
        return 0;
    }
    match UnicodeWidthChar::width(ch) {
        Some(0) if !ch.is_control() => 0,
        Some(2) => 2,
        _ => 1,
    }
}

/// Width of plain text (no escape handling) laid out from column 0.
pub fn plain_width(text: &str) -> usize {
    text.chars()
        .fold(0usize, |col, ch| col + char_width(ch, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii() {
        assert_eq!(char_width('a', 0), 1);
        assert_eq!(char_width('~', 17), 1);
    }

    #[test]
    fn wide_cjk() {
        assert_eq!(char_width('界', 0), 2);
        assert_eq!(char_width('Ａ', 3), 2); // fullwidth Latin
    }

    #[test]
    fn combining_acute() {
        assert_eq!(char_width('\u{0301}', 4), 0);
    }

    #[test]
    fn tab_advances_to_next_stop() {
        assert_eq!(char_width('\t', 0), 8);
        assert_eq!(char_width('\t', 3), 5);
        assert_eq!(char_width('\t', 7), 1);
        assert_eq!(char_width('\t', 8), 8);
    }

    #[test]
    fn control_and_unknown_default_to_one() {
        assert_eq!(char_width('\x1b', 0), 1);
        assert_eq!(char_width('\u{0085}', 0), 1);
        assert_eq!(char_width('\u{10FFFD}', 0), 1); // private use plane
    }

    #[test]
    fn plain_width_expands_tabs_by_column() {
        assert_eq!(plain_width("ab\tc"), 9);
        assert_eq!(plain_width("界x"), 3);
        assert_eq!(plain_width("e\u{0301}"), 1);
    }
}
