//! Status line composition.
//!
//! Two stages, as for every row source in this crate:
//! 1. `compose_status` produces ordered `StatusSegment`s from a `StatusContext`.
//! 2. `format_status` renders the segments into the left-hand status text:
//!    `<path> (<start>-<end>/<total> <pct>%)[ · <message>]`.
//!
//! `build_status_line` then fits the left text and a right-aligned hint into
//! the usable width. The hint has priority: it is only cut (from the left,
//! keeping its visible end) when it alone does not fit; the left text is
//! clipped to leave one column of gap before the hint.

use std::borrow::Cow;
use std::fmt::Write as _;

use core_text::line_ops::{clip, display_width};
use core_text::width::char_width;

pub const DEFAULT_HINT: &str = "│ ? Help";

pub struct StatusContext<'a> {
    pub path: &'a str,
    /// 1-based source lines covered by the viewport.
    pub start: usize,
    pub end: usize,
    pub total: usize,
    pub percent: f64,
    /// Transient message; empty for none.
    pub message: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusSegment<'a> {
    Path(Cow<'a, str>),
    Range {
        start: usize,
        end: usize,
        total: usize,
    },
    Percent(f64),
    Message(&'a str),
}

pub fn compose_status<'a>(ctx: &StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let mut out = Vec::with_capacity(4);
    // control characters in a path would corrupt the row
    let path: Cow<'a, str> = if ctx.path.chars().any(char::is_control) {
        ctx.path
            .chars()
            .map(|c| if c.is_control() { '?' } else { c })
            .collect::<String>()
            .into()
    } else {
        ctx.path.into()
    };
    out.push(StatusSegment::Path(path));
    out.push(StatusSegment::Range {
        start: ctx.start,
        end: ctx.end,
        total: ctx.total,
    });
    out.push(StatusSegment::Percent(ctx.percent));
    if !ctx.message.is_empty() {
        out.push(StatusSegment::Message(ctx.message));
    }
    out
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    let mut s = String::with_capacity(64);
    for seg in segments {
        match seg {
            StatusSegment::Path(p) => s.push_str(p),
            StatusSegment::Range { start, end, total } => {
                let _ = write!(s, " ({start}-{end}/{total}");
            }
            StatusSegment::Percent(p) => {
                let _ = write!(s, " {p:5.1}%)");
            }
            StatusSegment::Message(m) => {
                s.push_str(" · ");
                s.push_str(m);
            }
        }
    }
    s
}

pub fn build_status(ctx: &StatusContext<'_>) -> String {
    format_status(&compose_status(ctx))
}

/// Last `cols` display columns of plain text.
fn tail_columns(text: &str, cols: usize) -> &str {
    let mut used = 0usize;
    let mut cut = text.len();
    for (i, ch) in text.char_indices().rev() {
        let w = char_width(ch, 0);
        if used + w > cols {
            break;
        }
        used += w;
        cut = i;
    }
    &text[cut..]
}

/// Fit `left` and a right-aligned `hint` into a `width`-column terminal row.
///
/// One column is left unused so the row never touches the last terminal
/// column.
pub fn build_status_line(left: &str, width: usize, hint: &str) -> String {
    let usable = width.saturating_sub(1).max(1);
    let hint_width = display_width(hint);
    if usable <= hint_width {
        return tail_columns(hint, usable).to_owned();
    }
    let left_limit = usable - hint_width - 1;
    let left = clip(left, left_limit);
    let gap = usable - display_width(&left) - hint_width;
    let mut out = String::with_capacity(left.len() + gap + hint.len());
    out.push_str(&left);
    out.extend(std::iter::repeat_n(' ', gap));
    out.push_str(hint);
    out
}
