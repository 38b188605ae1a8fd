//! Sticky header rows.
//!
//! Each symbol in a sticky chain is drawn as its own declaration line taken
//! from the displayed block, cut to the pane the same way a content row is
//! (slice under horizontal scroll, clip under wrap), underlined end to end and
//! padded with a dim rule up to the pane width.

use core_model::{LineMap, SymbolEntry};
use core_text::ansi::{Token, tokens};
use core_text::line_ops::{clip, display_width, slice};

const UNDERLINE_ON: &str = "\x1b[4m";
const UNDERLINE_OFF: &str = "\x1b[24m";
const FILLER_STYLE: &str = "\x1b[2;38;5;245m";

/// Underline `text`, re-applying the underline after every SGR in it so a
/// reset inside a colored token does not end the rule early.
pub fn underline_with_ansi(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(text.len() + 16);
    out.push_str(UNDERLINE_ON);
    for tok in tokens(text) {
        match tok {
            Token::Escape(seq) => match seq.sgr_params() {
                Some("") => out.push_str(UNDERLINE_ON),
                Some(params) => {
                    out.push_str("\x1b[");
                    out.push_str(params);
                    out.push_str(";4m");
                }
                None => out.push_str(seq.text),
            },
            Token::Char(ch) => out.push(ch),
        }
    }
    out.push_str(UNDERLINE_OFF);
    out
}

/// One header row of exactly `width` columns.
pub fn format_sticky_header_line(line: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let text = clip(line, width);
    let used = display_width(&text);
    let mut out = underline_with_ansi(&text);
    if used < width {
        out.push_str(FILLER_STYLE);
        out.extend(std::iter::repeat_n('─', width - used));
        out.push_str("\x1b[0m");
    }
    out
}

/// Declaration text of `symbol` as it appears in the displayed block.
pub fn sticky_source_text(
    symbol: &SymbolEntry,
    map: &LineMap<'_>,
    width: usize,
    text_x: usize,
) -> String {
    let raw = map.source_line_raw_text(symbol.header_line());
    if raw.is_empty() {
        return String::new();
    }
    if map.wrap() {
        clip(&raw, width)
    } else {
        slice(&raw, text_x, width)
    }
}

/// Formatted header rows for a chain, outermost first.
pub fn sticky_rows(
    chain: &[&SymbolEntry],
    map: &LineMap<'_>,
    width: usize,
    text_x: usize,
) -> Vec<String> {
    chain
        .iter()
        .map(|symbol| {
            format_sticky_header_line(&sticky_source_text(symbol, map, width, text_x), width)
        })
        .collect()
}
