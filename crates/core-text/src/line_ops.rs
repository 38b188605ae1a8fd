//! ANSI-aware line shaping: clip, horizontal slice and soft wrap.
//!
//! All three primitives walk a styled line left to right with `Tokens`,
//! copying escape sequences verbatim (they consume no width budget) and
//! measuring printable characters with `char_width` at their running column.
//!
//! Invariants:
//! - Output never exceeds the requested width in printable columns, except
//!   `wrap`, which may emit one over-wide chunk when a single character (or a
//!   tab-stop run starting a fresh chunk) is wider than `width`.
//! - Zero-width characters never cause a truncation or a wrap flush.
//! - Tabs are expanded to spaces at their tab-stop-aligned width so the
//!   emitted text renders identically regardless of terminal tab settings.
//! - `slice` injects at most one synthetic SGR sequence per call.

use crate::ansi::{Token, tokens};
use crate::width::{TAB_STOP, char_width};

#[inline]
fn push_spaces(out: &mut String, n: usize) {
    out.extend(std::iter::repeat_n(' ', n));
}

/// Trim a styled line to at most `max_cols` display columns.
pub fn clip(text: &str, max_cols: usize) -> String {
    if max_cols == 0 || text.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(text.len());
    let mut col = 0usize;
    for tok in tokens(text) {
        match tok {
            Token::Escape(seq) => out.push_str(seq.text),
            Token::Char(ch) => {
                let w = char_width(ch, col);
                if col + w > max_cols {
                    break;
                }
                if ch == '\t' {
                    push_spaces(&mut out, w);
                } else {
                    out.push(ch);
                }
                col += w;
            }
        }
    }
    out
}

/// Horizontal viewport of a styled line: columns `[start_col, start_col + max_cols)`.
///
/// The most recent SGR sequence seen before the viewport is re-emitted once,
/// ahead of the first visible output, so a color opened off-screen still
/// applies. A character straddling `start_col` is rendered as the spaces of
/// its visible part.
pub fn slice(text: &str, start_col: usize, max_cols: usize) -> String {
    if max_cols == 0 || text.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(text.len().min(max_cols * 4 + 32));
    let mut col = 0usize;
    let mut shown = 0usize;
    let mut pending_sgr: Option<&str> = None;
    let mut injected = false;

    for tok in tokens(text) {
        if shown >= max_cols {
            break;
        }
        match tok {
            Token::Escape(seq) => {
                if seq.is_sgr() {
                    pending_sgr = Some(seq.text);
                }
                if col >= start_col {
                    if !injected && !seq.is_sgr() {
                        if let Some(sgr) = pending_sgr {
                            out.push_str(sgr);
                            injected = true;
                        }
                    }
                    out.push_str(seq.text);
                    if seq.is_sgr() {
                        injected = true;
                    }
                }
            }
            Token::Char(ch) => {
                let w = char_width(ch, col);
                if col + w <= start_col {
                    col += w;
                    continue;
                }
                if !injected {
                    if let Some(sgr) = pending_sgr {
                        out.push_str(sgr);
                        injected = true;
                    }
                }
                if ch == '\t' || col < start_col {
                    let visible = col + w - col.max(start_col);
                    let room = max_cols - shown;
                    push_spaces(&mut out, visible.min(room));
                    shown += visible.min(room);
                    col += w;
                    continue;
                }
                if shown + w > max_cols {
                    break;
                }
                out.push(ch);
                shown += w;
                col += w;
            }
        }
    }
    out
}

/// Soft-wrap a styled line into chunks of at most `width` printable columns.
///
/// Escape sequences stay attached to the chunk they appear in. A tab that
/// would overflow flushes the current chunk and opens the next one with a
/// full tab-stop run. `width == 0` or empty input yields one empty chunk.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 || text.is_empty() {
        return vec![String::new()];
    }
    let mut wrapped = Vec::new();
    let mut chunk = String::new();
    let mut col = 0usize;

    for tok in tokens(text) {
        let ch = match tok {
            Token::Escape(seq) => {
                chunk.push_str(seq.text);
                continue;
            }
            Token::Char(ch) => ch,
        };
        if ch != '\t' && char_width(ch, 0) == 0 {
            chunk.push(ch);
            continue;
        }
        if col >= width {
            wrapped.push(std::mem::take(&mut chunk));
            col = 0;
        }
        let mut w = char_width(ch, col);
        if ch == '\t' {
            if col + w > width && !chunk.is_empty() {
                wrapped.push(std::mem::take(&mut chunk));
                col = 0;
                w = TAB_STOP;
            }
            push_spaces(&mut chunk, w);
            col += w;
            continue;
        }
        if col + w > width && !chunk.is_empty() {
            wrapped.push(std::mem::take(&mut chunk));
            col = 0;
        }
        chunk.push(ch);
        col += w;
    }
    wrapped.push(chunk);
    wrapped
}

/// Display width of a styled line (escape sequences excluded, tabs expanded).
pub fn display_width(text: &str) -> usize {
    let mut col = 0usize;
    for tok in tokens(text) {
        if let Token::Char(ch) = tok {
            col += char_width(ch, col);
        }
    }
    col
}

#[inline]
pub fn has_line_terminator(line: &str) -> bool {
    line.ends_with('\n') || line.ends_with('\r')
}

/// Split a line into its body and its `\r\n` / `\n` / `\r` terminator.
pub fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else if let Some(body) = line.strip_suffix('\r') {
        (body, "\r")
    } else {
        (line, "")
    }
}

/// Split a block into lines, each keeping its own terminator.
pub fn split_lines_keep_ends(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                out.push(&text[start..=i]);
                start = i + 1;
            }
            b'\r' => {
                let end = if bytes.get(i + 1) == Some(&b'\n') {
                    i + 1
                } else {
                    i
                };
                out.push(&text[start..=end]);
                i = end;
                start = end + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < bytes.len() {
        out.push(&text[start..]);
    }
    out
}

/// Split a rendered block into display lines.
///
/// Without wrap this mirrors a keep-ends line split. With wrap each line body
/// is wrapped to `width` and the original terminator is appended to the last
/// chunk, so terminators continue to mark logical line boundaries.
pub fn build_screen_lines(rendered: &str, width: usize, wrap_text: bool) -> Vec<String> {
    let lines = split_lines_keep_ends(rendered);
    if lines.is_empty() {
        return vec![String::new()];
    }
    if !wrap_text {
        return lines.into_iter().map(str::to_owned).collect();
    }
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let (body, terminator) = split_terminator(line);
        let mut chunks = wrap(body, width);
        if let Some(last) = chunks.last_mut() {
            last.push_str(terminator);
        }
        out.extend(chunks);
    }
    out
}
