//! Mapping between display lines, logical lines and source lines.
//!
//! A rendered block is a list of display lines. Under wrap a logical line is
//! the run of chunks up to (and including) the next chunk carrying a line
//! terminator; without wrap each display line is its own logical line. In a
//! diff-annotated block some logical lines represent removed content and do
//! not exist in the working file, so they are skipped when counting source
//! lines.
//!
//! The annotation encoding is inferred once per block (`DiffFormat`) and
//! never mixed. `LineMap` precomputes the logical ranges and the
//! source-line index so every query is a lookup or a binary search instead
//! of a rescan of the block.
//!
//! Invariants:
//! - Logical ranges partition `0..display_len` in order.
//! - `source_line_at` is monotonically non-decreasing in the display index.
//! - `source_line_display_index(source_line_at(d))` lies in the logical run
//!   containing `d` whenever that run is not a removed line.

use std::borrow::Cow;

use core_text::ansi::{Token, strip_ansi, tokens};
use core_text::line_ops::{has_line_terminator, split_terminator};

pub const DIFF_ADDED_BG_SGR: &str = "48;2;36;74;52";
pub const DIFF_REMOVED_BG_SGR: &str = "48;2;92;43;49";

const FORMAT_SAMPLE: usize = 32;
const MIN_MARKER_LINES: usize = 3;

/// Removal annotation encoding of a rendered block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffFormat {
    /// No removal annotation; every logical line is a source line.
    #[default]
    Unannotated,
    /// Two-column `"+ "` / `"- "` / `"  "` prefixes.
    PlainMarkers,
    /// Added/removed lines carry a truecolor background SGR.
    BackgroundSgr,
}

/// Inclusive `(first, last)` display indices of each logical line.
pub fn logical_ranges(lines: &[String], wrap: bool) -> Vec<(usize, usize)> {
    let mut ranges = Vec::with_capacity(lines.len());
    let mut idx = 0usize;
    while idx < lines.len() {
        let start = idx;
        if wrap {
            while idx + 1 < lines.len() && !has_line_terminator(&lines[idx]) {
                idx += 1;
            }
        }
        ranges.push((start, idx));
        idx += 1;
    }
    ranges
}

fn marker_of(first_chunk: &str) -> Option<char> {
    let plain = strip_ansi(first_chunk);
    let mut chars = plain.chars();
    match (chars.next(), chars.next()) {
        (Some(m @ (' ' | '+' | '-')), Some(' ')) => Some(m),
        _ => None,
    }
}

/// Whether the first logical lines look like a plain-marker diff.
///
/// Requires at least three logical lines, three quarters of the sample (and
/// no fewer than three) carrying a marker, and at least one `+`/`-` marker so
/// ordinary indented text is not mistaken for a diff.
pub fn uses_plain_markers(lines: &[String], ranges: &[(usize, usize)]) -> bool {
    if ranges.len() < MIN_MARKER_LINES {
        return false;
    }
    let sample = &ranges[..ranges.len().min(FORMAT_SAMPLE)];
    let mut marked = 0usize;
    let mut changed = 0usize;
    for &(start, _) in sample {
        if let Some(m) = marker_of(&lines[start]) {
            marked += 1;
            if m != ' ' {
                changed += 1;
            }
        }
    }
    marked >= MIN_MARKER_LINES.max(sample.len() * 3 / 4) && changed > 0
}

/// `run` occurs in `params` bounded by `;` or the ends.
fn has_param_run(params: &str, run: &str) -> bool {
    params.match_indices(run).any(|(at, _)| {
        let end = at + run.len();
        (at == 0 || params.as_bytes()[at - 1] == b';')
            && (end == params.len() || params.as_bytes()[end] == b';')
    })
}

/// Whether any SGR in `chunk` sets one of the `backgrounds` parameter runs.
fn has_background(chunk: &str, backgrounds: &[&str]) -> bool {
    tokens(chunk).any(|tok| match tok {
        Token::Escape(seq) => seq
            .sgr_params()
            .is_some_and(|p| backgrounds.iter().any(|bg| has_param_run(p, bg))),
        Token::Char(_) => false,
    })
}

fn has_removed_background(chunk: &str) -> bool {
    has_background(chunk, &[DIFF_REMOVED_BG_SGR])
}

/// Infer the annotation encoding of a rendered block.
pub fn detect_format(lines: &[String], ranges: &[(usize, usize)]) -> DiffFormat {
    if uses_plain_markers(lines, ranges) {
        DiffFormat::PlainMarkers
    } else if ranges
        .iter()
        .any(|&(start, _)| has_removed_background(&lines[start]))
    {
        DiffFormat::BackgroundSgr
    } else {
        DiffFormat::Unannotated
    }
}

/// Whether a logical line (given its first chunk) is a removed line.
pub fn is_removed(first_chunk: &str, format: DiffFormat) -> bool {
    match format {
        DiffFormat::Unannotated => false,
        DiffFormat::PlainMarkers => marker_of(first_chunk) == Some('-'),
        DiffFormat::BackgroundSgr => has_removed_background(first_chunk),
    }
}

/// Raw text of 1-based source lines, used for scope and indentation checks.
pub trait SourceText {
    fn line_count(&self) -> usize;
    /// Line `n` (1-based) without its terminator; `""` when out of range.
    fn raw_line(&self, n: usize) -> Cow<'_, str>;
}

impl SourceText for [String] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn raw_line(&self, n: usize) -> Cow<'_, str> {
        match n.checked_sub(1).and_then(|i| self.get(i)) {
            Some(line) => Cow::Borrowed(split_terminator(line).0),
            None => Cow::Borrowed(""),
        }
    }
}

impl SourceText for Vec<String> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn raw_line(&self, n: usize) -> Cow<'_, str> {
        self.as_slice().raw_line(n)
    }
}

#[derive(Debug, Clone, Copy)]
struct Logical {
    start: usize,
    end: usize,
    removed: bool,
    /// Source line shown by this run; for a removed run, the next one.
    source: usize,
}

/// Precomputed display/logical/source index over one rendered block.
#[derive(Debug, Clone)]
pub struct LineMap<'a> {
    lines: &'a [String],
    logical: Vec<Logical>,
    sources: Vec<usize>,
    format: DiffFormat,
    wrap: bool,
}

impl<'a> LineMap<'a> {
    /// Map over a block without removal annotation.
    pub fn new(lines: &'a [String], wrap: bool) -> Self {
        Self::with_format(lines, wrap, DiffFormat::Unannotated)
    }

    /// Map over a diff-annotated block, inferring its encoding.
    pub fn for_diff(lines: &'a [String], wrap: bool) -> Self {
        let ranges = logical_ranges(lines, wrap);
        let format = detect_format(lines, &ranges);
        Self::from_ranges(lines, wrap, format, ranges)
    }

    pub fn with_format(lines: &'a [String], wrap: bool, format: DiffFormat) -> Self {
        let ranges = logical_ranges(lines, wrap);
        Self::from_ranges(lines, wrap, format, ranges)
    }

    fn from_ranges(
        lines: &'a [String],
        wrap: bool,
        format: DiffFormat,
        ranges: Vec<(usize, usize)>,
    ) -> Self {
        let mut logical = Vec::with_capacity(ranges.len());
        let mut sources = Vec::with_capacity(ranges.len());
        let mut next_source = 1usize;
        for (start, end) in ranges {
            let removed = is_removed(&lines[start], format);
            if !removed {
                sources.push(logical.len());
            }
            logical.push(Logical {
                start,
                end,
                removed,
                source: next_source,
            });
            if !removed {
                next_source += 1;
            }
        }
        Self {
            lines,
            logical,
            sources,
            format,
            wrap,
        }
    }

    #[inline]
    pub fn format(&self) -> DiffFormat {
        self.format
    }

    #[inline]
    pub fn wrap(&self) -> bool {
        self.wrap
    }

    #[inline]
    pub fn display_len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn logical_line_count(&self) -> usize {
        self.logical.len()
    }

    /// Logical lines minus removed ones.
    #[inline]
    pub fn source_line_count(&self) -> usize {
        self.sources.len()
    }

    fn logical_index_at(&self, display: usize) -> Option<usize> {
        if self.logical.is_empty() {
            return None;
        }
        let d = display.min(self.lines.len() - 1);
        Some(self.logical.partition_point(|r| r.end < d))
    }

    /// Source line (1-based) shown at a display index; clamps out of range.
    pub fn source_line_at(&self, display: usize) -> usize {
        self.logical_index_at(display)
            .map_or(1, |i| self.logical[i].source)
    }

    /// First display index of a source line (1-based; 0 is treated as 1).
    pub fn source_line_display_index(&self, source_line: usize) -> Option<usize> {
        let i = *self.sources.get(source_line.max(1) - 1)?;
        Some(self.logical[i].start)
    }

    /// Whole logical text of a source line, chunks re-joined, terminator stripped.
    pub fn source_line_raw_text(&self, source_line: usize) -> Cow<'a, str> {
        match self.sources.get(source_line.max(1) - 1) {
            Some(&i) => self.logical_text(i),
            None => Cow::Borrowed(""),
        }
    }

    fn logical_text(&self, i: usize) -> Cow<'a, str> {
        let Logical { start, end, .. } = self.logical[i];
        if start == end {
            return Cow::Borrowed(split_terminator(&self.lines[start]).0);
        }
        let mut out = String::new();
        for chunk in &self.lines[start..=end] {
            out.push_str(split_terminator(chunk).0);
        }
        Cow::Owned(out)
    }

    /// Logical line (1-based, removed lines included) at a display index.
    pub fn logical_line_at(&self, display: usize) -> usize {
        self.logical_index_at(display).map_or(1, |i| i + 1)
    }

    /// First display index of a logical line; past-the-end clamps to the last row.
    pub fn logical_line_display_index(&self, logical_line: usize) -> usize {
        match self.logical.get(logical_line.max(1) - 1) {
            Some(r) => r.start,
            None => self.lines.len().saturating_sub(1),
        }
    }

    pub fn is_removed_at(&self, display: usize) -> bool {
        self.logical_index_at(display)
            .is_some_and(|i| self.logical[i].removed)
    }

    /// `(first, last, total)` source lines covered by `rows` display rows from `top`.
    pub fn status_range(&self, top: usize, rows: usize) -> (usize, usize, usize) {
        if self.lines.is_empty() {
            return (1, 1, 1);
        }
        let last = self.lines.len() - 1;
        let start_d = top.min(last);
        let end_d = (start_d + rows.max(1) - 1).min(last);
        let total = self.source_line_count().max(1);
        let start = self.source_line_at(start_d).min(total);
        let end = self.source_line_at(end_d).clamp(start, total);
        (start, end, total)
    }
}

impl SourceText for LineMap<'_> {
    fn line_count(&self) -> usize {
        self.source_line_count()
    }

    fn raw_line(&self, n: usize) -> Cow<'_, str> {
        if n == 0 {
            return Cow::Borrowed("");
        }
        self.source_line_raw_text(n)
    }
}

/// Whether a display line belongs to an added/removed change.
pub fn has_change_marker(line: &str) -> bool {
    let plain = strip_ansi(line);
    if plain.starts_with("+ ") || plain.starts_with("- ") {
        return true;
    }
    has_background(line, &[DIFF_ADDED_BG_SGR, DIFF_REMOVED_BG_SGR])
}

/// Start indices of contiguous runs of change-marked display lines.
pub fn change_block_starts(lines: &[String]) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut in_block = false;
    for (idx, line) in lines.iter().enumerate() {
        let changed = has_change_marker(line);
        if changed && !in_block {
            starts.push(idx);
        }
        in_block = changed;
    }
    starts
}
