//! Source-pane text selection in display-line / column space.

use core_text::ansi::strip_ansi;
use core_text::line_ops::{display_width, split_terminator};
use core_text::width::char_width;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct SelectionPoint {
    /// Display line index.
    pub line: usize,
    /// Display column.
    pub col: usize,
}

impl SelectionPoint {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Ordered selection endpoints, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: SelectionPoint,
    pub end: SelectionPoint,
}

impl SelectionRange {
    /// Order an anchor/focus pair. No anchor means no selection; a missing
    /// focus collapses onto the anchor.
    pub fn normalize(
        anchor: Option<SelectionPoint>,
        focus: Option<SelectionPoint>,
    ) -> Option<Self> {
        let anchor = anchor?;
        let focus = focus.unwrap_or(anchor);
        let (start, end) = if focus < anchor {
            (focus, anchor)
        } else {
            (anchor, focus)
        };
        Some(Self { start, end })
    }

    pub fn contains_line(&self, line: usize) -> bool {
        (self.start.line..=self.end.line).contains(&line)
    }

    /// Columns `[start, end)` of display line `line` covered by the selection,
    /// relative to a viewport showing columns `[view_start, view_end)`.
    ///
    /// `line_width` is the line's plain display width. A collapsed selection
    /// still marks one column so the caret position stays visible.
    pub fn span_for_line(
        &self,
        line: usize,
        line_width: usize,
        view_start: usize,
        view_end: usize,
    ) -> Option<(usize, usize)> {
        if !self.contains_line(line) {
            return None;
        }
        let (abs_start, mut abs_end) = if self.start.line == self.end.line {
            let s = self.start.col.min(line_width);
            (s, self.end.col.min(line_width).max(s))
        } else if line == self.start.line {
            (self.start.col.min(line_width), line_width)
        } else if line == self.end.line {
            (0, self.end.col.min(line_width))
        } else {
            (0, line_width)
        };
        if abs_end <= abs_start {
            if line_width <= abs_start {
                return None;
            }
            abs_end = abs_start + 1;
        }
        let visible_start = abs_start.max(view_start);
        let visible_end = abs_end.min(view_end);
        if visible_end <= visible_start {
            return None;
        }
        Some((visible_start - view_start, visible_end - view_start))
    }
}

/// Substring of plain text covering display columns `[start, end)`.
pub fn plain_columns(plain: &str, start: usize, end: usize) -> &str {
    let mut col = 0usize;
    let mut from = plain.len();
    let mut to = plain.len();
    for (i, ch) in plain.char_indices() {
        if from == plain.len() && col >= start {
            from = i;
        }
        if col >= end {
            to = i;
            break;
        }
        col += char_width(ch, col);
    }
    if from > to {
        return "";
    }
    &plain[from..to]
}

/// Plain text of the selection across `lines`, joined with `\n`.
///
/// Falls back to the whole start line when the range selects nothing.
pub fn selected_text(lines: &[String], range: &SelectionRange) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let last = lines.len() - 1;
    let first_line = range.start.line.min(last);
    let last_line = range.end.line.min(last);
    let plain_of = |idx: usize| strip_ansi(split_terminator(&lines[idx]).0).into_owned();

    let mut parts: Vec<String> = Vec::with_capacity(last_line - first_line + 1);
    for idx in first_line..=last_line {
        let plain = plain_of(idx);
        let width = display_width(&plain);
        let (from, to) = match (idx == first_line, idx == last_line) {
            (true, true) => {
                let s = range.start.col.min(width);
                (s, range.end.col.min(width).max(s))
            }
            (true, false) => (range.start.col.min(width), width),
            (false, true) => (0, range.end.col.min(width)),
            (false, false) => (0, width),
        };
        parts.push(plain_columns(&plain, from, to).to_owned());
    }
    let text = parts.join("\n");
    if text.is_empty() {
        return plain_of(first_line);
    }
    text
}
