//! Scroll state for the source pane.
//!
//! `ScrollModel` owns the rendered block, its display lines under the current
//! wrap mode, and the vertical/horizontal offsets. Offsets are clamped on every
//! mutation so the model never holds an out-of-range position.
//!
//! Invariants:
//! - `vertical <= max_offset == len(lines) - visible_rows` (saturating).
//! - `horizontal == 0` whenever wrap is enabled.
//! - Toggling wrap keeps the logical line at the top of the viewport.

use std::sync::Arc;

use tracing::debug;

use core_text::line_ops::build_screen_lines;

use crate::line_cache::{ScreenLineCache, ScreenLineKey, ScreenLines, content_hash};
use crate::line_map::{LineMap, change_block_starts};

/// Scroll start that places `target` in the upper third of the viewport.
pub fn centered_start(target: usize, max_start: usize, visible_rows: usize) -> usize {
    let anchor = target.min(max_start);
    anchor.saturating_sub((visible_rows / 3).max(1)).min(max_start)
}

/// Vertical position as a percentage of the scrollable range.
pub fn scroll_percent(top: usize, total_lines: usize, visible_rows: usize) -> f64 {
    if total_lines == 0 {
        return 0.0;
    }
    let max_start = total_lines.saturating_sub(visible_rows.max(1));
    if max_start == 0 {
        return 0.0;
    }
    top.min(max_start) as f64 / max_start as f64 * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeJump {
    Moved,
    /// Ran past the last (or first) change block and started over.
    Wrapped,
    Stayed,
}

#[derive(Debug, Clone)]
pub struct ScrollModel {
    rendered: String,
    content: u64,
    lines: ScreenLines,
    vertical: usize,
    horizontal: usize,
    wrap: bool,
    wrap_width: usize,
    visible_rows: usize,
    max_offset: usize,
}

impl Default for ScrollModel {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ScrollModel {
    pub fn new(wrap: bool) -> Self {
        Self {
            rendered: String::new(),
            content: content_hash(""),
            lines: Arc::new(vec![String::new()]),
            vertical: 0,
            horizontal: 0,
            wrap,
            wrap_width: 1,
            visible_rows: 1,
            max_offset: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    #[inline]
    pub fn vertical(&self) -> usize {
        self.vertical
    }

    #[inline]
    pub fn horizontal(&self) -> usize {
        self.horizontal
    }

    #[inline]
    pub fn wrap(&self) -> bool {
        self.wrap
    }

    #[inline]
    pub fn max_offset(&self) -> usize {
        self.max_offset
    }

    #[inline]
    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    #[inline]
    pub fn wrap_width(&self) -> usize {
        self.wrap_width
    }

    /// Replace the rendered block and scroll back to the top.
    pub fn set_content(
        &mut self,
        rendered: impl Into<String>,
        cache: Option<&mut ScreenLineCache>,
    ) {
        self.rendered = rendered.into();
        self.content = content_hash(&self.rendered);
        self.vertical = 0;
        self.horizontal = 0;
        self.reflow(cache);
    }

    /// Apply new pane geometry, reflowing only when the wrap width changed.
    pub fn resize(
        &mut self,
        wrap_width: usize,
        visible_rows: usize,
        cache: Option<&mut ScreenLineCache>,
    ) {
        let wrap_width = wrap_width.max(1);
        let reflow = self.wrap && wrap_width != self.wrap_width;
        self.wrap_width = wrap_width;
        self.visible_rows = visible_rows.max(1);
        if reflow {
            self.reflow(cache);
        } else {
            self.clamp();
        }
    }

    /// Install freshly built display lines and clamp the offsets.
    pub fn rebuild(&mut self, lines: impl Into<ScreenLines>) {
        self.lines = lines.into();
        if self.lines.is_empty() {
            self.lines = Arc::new(vec![String::new()]);
        }
        self.clamp();
    }

    fn clamp(&mut self) {
        self.max_offset = self.lines.len().saturating_sub(self.visible_rows);
        self.vertical = self.vertical.min(self.max_offset);
        if self.wrap {
            self.horizontal = 0;
        }
    }

    fn reflow(&mut self, cache: Option<&mut ScreenLineCache>) {
        let (rendered, width, wrap) = (&self.rendered, self.wrap_width, self.wrap);
        let lines = match cache {
            Some(cache) => cache.get_or_build(ScreenLineKey::new(self.content, width, wrap), || {
                build_screen_lines(rendered, width, wrap)
            }),
            None => Arc::new(build_screen_lines(rendered, width, wrap)),
        };
        self.rebuild(lines);
    }

    /// Flip soft wrap, keeping the top logical line in place.
    pub fn toggle_wrap(&mut self, cache: Option<&mut ScreenLineCache>) {
        let top_logical = LineMap::new(&self.lines, self.wrap).logical_line_at(self.vertical);
        self.wrap = !self.wrap;
        if self.wrap {
            self.horizontal = 0;
        }
        self.reflow(cache);
        let start = LineMap::new(&self.lines, self.wrap).logical_line_display_index(top_logical);
        self.vertical = start.min(self.max_offset);
        debug!(
            target: "model.scroll",
            wrap = self.wrap,
            top_logical,
            vertical = self.vertical,
            lines = self.lines.len(),
            "wrap_toggled"
        );
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll_to(self.vertical.saturating_add_signed(delta));
    }

    pub fn scroll_to(&mut self, display: usize) {
        self.vertical = display.min(self.max_offset);
    }

    /// Scroll the unwrapped view sideways; no-op under wrap.
    pub fn scroll_horizontal(&mut self, delta: isize, pane_width: usize) {
        if self.wrap {
            return;
        }
        let max = crate::layout::max_horizontal_offset(&self.lines, pane_width);
        self.horizontal = self.horizontal.saturating_add_signed(delta).min(max);
    }

    /// Bring `display` into the upper third of the viewport.
    pub fn center_on(&mut self, display: usize) {
        self.vertical = centered_start(display, self.max_offset, self.visible_rows);
    }

    /// Move to the next (`forward`) or previous change block of a diff block.
    pub fn jump_to_change(&mut self, forward: bool) -> ChangeJump {
        let starts = change_block_starts(&self.lines);
        let (Some(&first), Some(&last)) = (starts.first(), starts.last()) else {
            return ChangeJump::Stayed;
        };
        let anchor = self.vertical + self.visible_rows / 3;
        let current = starts.iter().copied().take_while(|&s| s <= anchor).last();
        let target = match (forward, current) {
            (true, None) => Some(first),
            (true, Some(cur)) => starts.iter().copied().find(|&s| s > cur),
            (false, Some(cur)) => starts.iter().copied().rev().find(|&s| s < cur),
            (false, None) => None,
        };
        let (target, outcome) = match target {
            Some(t) => (t, ChangeJump::Moved),
            None => (if forward { first } else { last }, ChangeJump::Wrapped),
        };
        let next = centered_start(target, self.max_offset, self.visible_rows);
        if next == self.vertical {
            return ChangeJump::Stayed;
        }
        self.vertical = next;
        outcome
    }
}
