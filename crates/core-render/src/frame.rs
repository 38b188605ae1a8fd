//! Full-frame composition.
//!
//! `FrameComposer` precomputes everything a frame needs once (layout, line
//! map, sticky header rows, status range) and then emits the whole screen into
//! one buffer:
//!
//! 1. `ESC[H ESC[J`.
//! 2. One row per content row: tree cell clipped and padded to the tree width,
//!    a dim divider, then the source cell (sticky header rows first).
//! 3. Help rows, when help is shown.
//! 4. The reverse-video status line.
//!
//! Invariants:
//! * Every content and help row ends with CRLF; the status row does not.
//! * A cell that carried any escape sequence is followed by `ESC[0m` so no
//!   style leaks into the divider or the next row.
//! * Sticky header rows cover the first source rows; source row `r` always
//!   shows display line `vertical + r`, so the header chain never shifts the
//!   text under it.
//! * The status range and scroll percentage are computed over the rows left
//!   after the sticky headers.

use std::borrow::Cow;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::Result;
use bitflags::bitflags;
use core_model::scroll::scroll_percent;
use core_model::sticky::max_headers_for;
use core_model::{Layout, LineMap, SelectionRange, StickyChain, SymbolEntry, sticky_headers};
use core_text::ansi::{has_escape, strip_ansi};
use core_text::line_ops::{clip, display_width, slice, split_terminator};

use crate::help::{HelpLines, HelpMode, help_line, help_row_count};
use crate::highlight::{highlight_matches, select_span, selected_with_ansi};
use crate::picker::PickerView;
use crate::status::{StatusContext, build_status, build_status_line};
use crate::sticky_rows::sticky_rows;
use crate::writer::Writer;

const DIVIDER: &str = "\x1b[2m│\x1b[0m";
const RESET: &str = "\x1b[0m";

static LAST_COMPOSE_NS: AtomicU64 = AtomicU64::new(0);

fn duration_ns(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
}

/// Duration of the most recent frame composition, in nanoseconds.
pub fn last_compose_ns() -> u64 {
    LAST_COMPOSE_NS.load(Ordering::Relaxed)
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ViewFlags: u8 {
        const BROWSER_VISIBLE = 0b0000_0001;
        const WRAP            = 0b0000_0010;
        /// Content is a diff-annotated block.
        const DIFF            = 0b0000_0100;
    }
}

/// Pre-rendered tree rows supplied by the tree collaborator.
#[derive(Debug, Clone, Copy)]
pub struct TreeRows<'a> {
    pub rows: &'a [String],
    pub start: usize,
    pub selected: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum LeftPane<'a> {
    Tree(TreeRows<'a>),
    Picker(PickerView<'a>),
}

impl LeftPane<'_> {
    fn render_row(&self, row: usize, width: usize) -> String {
        match self {
            LeftPane::Tree(tree) => {
                let idx = tree.start + row;
                let Some(text) = tree.rows.get(idx) else {
                    return String::new();
                };
                let text = clip(split_terminator(text).0, width);
                if tree.selected == Some(idx) {
                    selected_with_ansi(&text)
                } else {
                    text
                }
            }
            LeftPane::Picker(view) => view.render_row(row, width),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StickyInput<'a> {
    pub enabled: bool,
    pub symbols: &'a [SymbolEntry],
    /// Working-file lines for scope checks on diff blocks. `None` on a diff
    /// block means the file could not be read and headers are skipped.
    pub scope_source: Option<&'a [String]>,
    /// `None` derives the budget from the content rows.
    pub max_headers: Option<usize>,
}

/// Active content search.
#[derive(Debug, Clone, Copy)]
pub struct SearchHighlight<'a> {
    pub query: &'a str,
    /// Display line (0-based) and 1-based column of the current hit.
    pub current: Option<(usize, usize)>,
}

#[derive(Debug, Clone, Copy)]
pub struct StatusInput<'a> {
    pub path: &'a str,
    pub message: &'a str,
    pub hint: &'a str,
}

/// Everything one frame is drawn from.
#[derive(Debug, Clone)]
pub struct FrameInput<'a> {
    pub width: usize,
    pub height: usize,
    pub left_width: usize,
    pub flags: ViewFlags,
    /// Display lines of the source pane, already built for the wrap mode.
    pub lines: &'a [String],
    pub vertical: usize,
    pub horizontal: usize,
    pub left: LeftPane<'a>,
    pub sticky: StickyInput<'a>,
    pub help: Option<HelpMode>,
    pub search: Option<SearchHighlight<'a>>,
    pub selection: Option<SelectionRange>,
    pub status: StatusInput<'a>,
}

pub struct FrameComposer<'a> {
    input: &'a FrameInput<'a>,
    layout: Layout,
    map: LineMap<'a>,
    left: LeftPane<'a>,
    help: Option<HelpLines>,
    sticky: Vec<String>,
    text_content_rows: usize,
    source_width: usize,
}

fn to_u16(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

impl<'a> FrameComposer<'a> {
    pub fn new(input: &'a FrameInput<'a>) -> Self {
        let browser_visible = input.flags.contains(ViewFlags::BROWSER_VISIBLE);
        let wrap = input.flags.contains(ViewFlags::WRAP);
        let usable = input.height.saturating_sub(1).max(1);
        let help_rows = help_row_count(usable, input.help, browser_visible);
        let layout = Layout::compute(
            to_u16(input.width),
            to_u16(input.height),
            to_u16(input.left_width),
            browser_visible,
            to_u16(help_rows),
        );
        let content_rows = layout.content_rows();
        let source_width = layout.source.width as usize;

        let map = if input.flags.contains(ViewFlags::DIFF) {
            LineMap::for_diff(input.lines, wrap)
        } else {
            LineMap::new(input.lines, wrap)
        };

        let chain = Self::sticky_chain(input, &map, content_rows);
        let sticky = sticky_rows(&chain, &map, source_width, input.horizontal);
        let text_content_rows = content_rows.saturating_sub(sticky.len()).max(1);

        let left = match &input.left {
            LeftPane::Picker(view) => LeftPane::Picker(view.clone().clamped(content_rows)),
            other => other.clone(),
        };

        Self {
            input,
            layout,
            map,
            left,
            help: input.help.map(HelpLines::for_mode),
            sticky,
            text_content_rows,
            source_width,
        }
    }

    fn sticky_chain(
        input: &'a FrameInput<'a>,
        map: &LineMap<'a>,
        content_rows: usize,
    ) -> StickyChain<'a> {
        let cfg = &input.sticky;
        if !cfg.enabled || cfg.symbols.is_empty() {
            return StickyChain::new();
        }
        let top = map.source_line_at(input.vertical);
        let budget = max_headers_for(content_rows);
        let max_headers = Some(cfg.max_headers.map_or(budget, |m| m.clamp(1, budget)));
        if input.flags.contains(ViewFlags::DIFF) {
            match cfg.scope_source {
                Some(source) => sticky_headers(cfg.symbols, top, content_rows, max_headers, source),
                None => StickyChain::new(),
            }
        } else {
            sticky_headers(cfg.symbols, top, content_rows, max_headers, map)
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn sticky_rows(&self) -> &[String] {
        &self.sticky
    }

    /// Source rows left for text after the sticky headers.
    pub fn text_content_rows(&self) -> usize {
        self.text_content_rows
    }

    /// Left-hand status text (path, covered range, percentage, message).
    pub fn status_text(&self) -> String {
        let (start, end, total) = self
            .map
            .status_range(self.input.vertical, self.text_content_rows);
        let percent = scroll_percent(
            self.input.vertical,
            self.input.lines.len(),
            self.text_content_rows,
        );
        build_status(&StatusContext {
            path: self.input.status.path,
            start,
            end,
            total,
            percent,
            message: self.input.status.message,
        })
    }

    fn source_row(&self, row: usize) -> Cow<'_, str> {
        if let Some(header) = self.sticky.get(row) {
            return Cow::Borrowed(header.as_str());
        }
        let input = self.input;
        let idx = input.vertical + row;
        let Some(line) = input.lines.get(idx) else {
            return Cow::Borrowed("");
        };
        let full = split_terminator(line).0;
        let width = self.source_width;
        let (text, view_start) = if self.map.wrap() {
            (clip(full, width), 0)
        } else {
            (slice(full, input.horizontal, width), input.horizontal)
        };

        let text = match input.search {
            Some(search) if !search.query.is_empty() => {
                let current_column = search
                    .current
                    .and_then(|(line, col)| (line == idx).then_some(col));
                highlight_matches(&text, search.query, current_column, search.current.is_some())
                    .into_owned()
            }
            _ => text,
        };

        let Some(range) = input.selection else {
            return Cow::Owned(text);
        };
        let line_width = display_width(&strip_ansi(full));
        match range.span_for_line(idx, line_width, view_start, view_start + width) {
            Some((s, e)) => Cow::Owned(select_span(&text, s, e).into_owned()),
            None => Cow::Owned(text),
        }
    }

    fn push_cell(w: &mut Writer, text: &str) {
        w.print(text);
        if has_escape(text) {
            w.print(RESET);
        }
    }

    pub fn compose(&self) -> String {
        self.compose_into().into_string()
    }

    /// Emit the whole frame into one `Writer`.
    pub fn compose_into(&self) -> Writer {
        let started = Instant::now();
        let content_rows = self.layout.content_rows();
        let help_rows = self.layout.help_rows();
        let left_width = self.layout.tree.width as usize;
        let browser_visible = self.layout.browser_visible();

        let row_bytes = self.layout.width as usize + 32;
        let mut w = Writer::with_capacity((content_rows + help_rows + 1) * row_bytes);
        w.clear_screen();

        for row in 0..content_rows {
            if browser_visible {
                let cell = self.left.render_row(row, left_width);
                let used = display_width(&cell);
                w.print(&cell);
                w.pad(left_width.saturating_sub(used));
                w.print(DIVIDER);
            }
            Self::push_cell(&mut w, &self.source_row(row));
            w.end_row();
        }

        if let Some(help) = &self.help {
            for row in 0..help_rows {
                if browser_visible {
                    let left = clip(help_line(help.tree, row), left_width);
                    let used = display_width(&left);
                    w.print(&left);
                    w.pad(left_width.saturating_sub(used));
                    w.print(DIVIDER);
                    Self::push_cell(&mut w, &clip(help_line(help.text, row), self.source_width));
                } else {
                    let text = clip(help_line(help.text_only, row), self.source_width);
                    Self::push_cell(&mut w, &text);
                }
                w.end_row();
            }
        }

        let status = build_status_line(
            &self.status_text(),
            self.input.width,
            self.input.status.hint,
        );
        w.print("\x1b[7m");
        w.print(&status);
        w.print(RESET);

        let elapsed = started.elapsed();
        LAST_COMPOSE_NS.store(duration_ns(elapsed), Ordering::Relaxed);
        tracing::debug!(
            target: "render.frame",
            rows = content_rows,
            sticky = self.sticky.len(),
            help = help_rows,
            bytes = w.len(),
            elapsed_us = elapsed.as_micros() as u64,
            "frame_composed"
        );
        w
    }
}

/// Compose one frame.
pub fn compose_frame(input: &FrameInput<'_>) -> String {
    FrameComposer::new(input).compose()
}

/// Compose one frame and write it to `out` in a single write.
pub fn render_frame<W: Write>(input: &FrameInput<'_>, out: &mut W) -> Result<()> {
    FrameComposer::new(input).compose_into().flush_to(out)
}
