//! Overlays layered onto already-styled rows: search hits and the selection.
//!
//! Both overlays keep the row's own escape sequences. Search hits are wrapped
//! in bold / reverse-bold pairs that only switch off the attributes they
//! switched on. The selection is drawn in reverse video; every SGR inside the
//! selected span is re-issued with `7` appended so an inner reset does not
//! cut the span short, and the last style seen is restored after it.

use std::borrow::Cow;

use core_text::ansi::{Token, has_escape, tokens};
use core_text::width::char_width;

const CURRENT_HIT_ON: &str = "\x1b[7;1m";
const CURRENT_HIT_OFF: &str = "\x1b[27;22m";
const OTHER_HIT_ON: &str = "\x1b[1m";
const OTHER_HIT_OFF: &str = "\x1b[22m";
const REVERSE_ON: &str = "\x1b[7m";
const RESET: &str = "\x1b[0m";

#[inline]
fn fold(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

/// Non-overlapping case-insensitive matches of `query`, as visible-char
/// index ranges.
fn find_spans(folded: &[char], query: &[char]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    if query.is_empty() || folded.len() < query.len() {
        return spans;
    }
    let mut i = 0usize;
    while i + query.len() <= folded.len() {
        if folded[i..i + query.len()] == *query {
            spans.push((i, i + query.len()));
            i += query.len();
        } else {
            i += 1;
        }
    }
    spans
}

/// Pick the hit the cursor is on: the one containing `target`, else the
/// first after it, else the last.
fn current_span(spans: &[(usize, usize)], target: usize) -> usize {
    spans
        .iter()
        .position(|&(s, e)| s <= target && target < e)
        .or_else(|| spans.iter().position(|&(s, _)| s >= target))
        .unwrap_or(spans.len() - 1)
}

/// Emphasize case-insensitive occurrences of `query` in a styled row.
///
/// `current_column` is the 1-based visible-character column of the current
/// hit when it lies on this row. With `has_current` set, the current hit is
/// reverse-bold and the others bold; without it every hit is reverse-bold.
pub fn highlight_matches<'t>(
    text: &'t str,
    query: &str,
    current_column: Option<usize>,
    has_current: bool,
) -> Cow<'t, str> {
    if text.is_empty() || query.is_empty() {
        return Cow::Borrowed(text);
    }
    let mut bounds: Vec<(usize, usize)> = Vec::with_capacity(text.len());
    let mut folded: Vec<char> = Vec::with_capacity(text.len());
    let mut iter = tokens(text);
    loop {
        let at = iter.byte_pos();
        let Some(tok) = iter.next() else { break };
        if let Token::Char(ch) = tok {
            bounds.push((at, iter.byte_pos()));
            folded.push(fold(ch));
        }
    }
    let needle: Vec<char> = query.chars().map(fold).collect();
    let spans = find_spans(&folded, &needle);
    if spans.is_empty() {
        return Cow::Borrowed(text);
    }
    let current = match current_column {
        Some(col) if has_current => Some(current_span(&spans, col.saturating_sub(1))),
        _ => None,
    };

    let mut out = String::with_capacity(text.len() + spans.len() * 12);
    let mut cursor = 0usize;
    for (idx, &(s, e)) in spans.iter().enumerate() {
        let raw_start = bounds[s].0;
        let raw_end = bounds[e - 1].1;
        let (on, off) = if !has_current || current == Some(idx) {
            (CURRENT_HIT_ON, CURRENT_HIT_OFF)
        } else {
            (OTHER_HIT_ON, OTHER_HIT_OFF)
        };
        out.push_str(&text[cursor..raw_start]);
        out.push_str(on);
        out.push_str(&text[raw_start..raw_end]);
        out.push_str(off);
        cursor = raw_end;
    }
    out.push_str(&text[cursor..]);
    Cow::Owned(out)
}

/// Reverse-video the display columns `[start_col, end_col)` of a styled row.
pub fn select_span<'t>(text: &'t str, start_col: usize, end_col: usize) -> Cow<'t, str> {
    if text.is_empty() || end_col <= start_col {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    let mut col = 0usize;
    let mut inside = false;
    let mut closed = false;
    let mut last_sgr: Option<&str> = None;

    for tok in tokens(text) {
        match tok {
            Token::Escape(seq) => {
                if let Some(params) = seq.sgr_params() {
                    last_sgr = if params.is_empty() || params == "0" {
                        None
                    } else {
                        Some(seq.text)
                    };
                    if inside {
                        out.push_str("\x1b[");
                        out.push_str(if params.is_empty() { "0" } else { params });
                        out.push_str(";7m");
                        continue;
                    }
                }
                out.push_str(seq.text);
            }
            Token::Char(ch) => {
                if !inside && !closed && col >= start_col && col < end_col {
                    out.push_str(REVERSE_ON);
                    inside = true;
                } else if inside && col >= end_col {
                    close_span(&mut out, last_sgr);
                    inside = false;
                    closed = true;
                }
                out.push(ch);
                col += char_width(ch, col);
            }
        }
    }
    if inside {
        close_span(&mut out, last_sgr);
    } else if !closed {
        return Cow::Borrowed(text);
    }
    Cow::Owned(out)
}

fn close_span(out: &mut String, restore: Option<&str>) {
    out.push_str(RESET);
    if let Some(seq) = restore {
        out.push_str(seq);
    }
}

/// Reverse-video a whole row, keeping it reversed across inner resets.
pub fn selected_with_ansi(text: &str) -> String {
    if !has_escape(text) {
        let mut out = String::with_capacity(text.len() + 8);
        out.push_str(REVERSE_ON);
        out.push_str(text);
        out.push_str(RESET);
        return out;
    }
    format!("{REVERSE_ON}{}{RESET}", text.replace(RESET, "\x1b[0;7m"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_all_hits_without_current() {
        assert_eq!(
            highlight_matches("Foo foo", "foo", None, false),
            "\x1b[7;1mFoo\x1b[27;22m \x1b[7;1mfoo\x1b[27;22m"
        );
    }

    #[test]
    fn current_hit_gets_primary_style() {
        let out = highlight_matches("ab ab ab", "ab", Some(4), true);
        assert_eq!(
            out,
            "\x1b[1mab\x1b[22m \x1b[7;1mab\x1b[27;22m \x1b[1mab\x1b[22m"
        );
        // current hit elsewhere: every hit on this row is secondary
        let other = highlight_matches("ab", "ab", None, true);
        assert_eq!(other, "\x1b[1mab\x1b[22m");
    }

    #[test]
    fn hits_skip_escape_sequences() {
        let out = highlight_matches("\x1b[33mhello\x1b[0m", "LL", None, false);
        assert_eq!(out, "\x1b[33mhe\x1b[7;1mll\x1b[27;22mo\x1b[0m");
    }

    #[test]
    fn no_match_borrows() {
        assert!(matches!(highlight_matches("abc", "z", None, false), Cow::Borrowed(_)));
    }

    #[test]
    fn select_span_marks_columns() {
        assert_eq!(select_span("abcdef", 1, 3), "a\x1b[7mbc\x1b[0mdef");
        assert_eq!(select_span("abc", 1, 99), "a\x1b[7mbc\x1b[0m");
        assert_eq!(select_span("abc", 5, 9), "abc");
    }

    #[test]
    fn select_span_keeps_reverse_across_inner_sgr() {
        assert_eq!(
            select_span("\x1b[33mab\x1b[0mcd", 1, 3),
            "\x1b[33ma\x1b[7mb\x1b[0;7mc\x1b[0md"
        );
        // the color active at the end of the span is restored
        assert_eq!(
            select_span("a\x1b[32mbcd", 1, 2),
            "a\x1b[32m\x1b[7mb\x1b[0m\x1b[32mcd"
        );
    }

    #[test]
    fn whole_row_selection() {
        assert_eq!(selected_with_ansi("x"), "\x1b[7mx\x1b[0m");
        assert_eq!(
            selected_with_ansi("\x1b[1mx\x1b[0my"),
            "\x1b[7m\x1b[1mx\x1b[0;7my\x1b[0m"
        );
    }
}
