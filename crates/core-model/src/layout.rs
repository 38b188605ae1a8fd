//! Pane geometry.
//!
//! A frame is split into up to four regions, all in terminal cell units:
//! the tree pane (left), a one-column divider, the source pane (right) and,
//! below them, the help rows and a single status row. With the browser
//! hidden the source pane spans the full width.
//!
//! Invariants:
//! - `tree.width + divider + source.width == width` when the browser is visible.
//! - `content_rows + help_rows + 1 == height` for `height >= 2`.
//! - Every region has width >= 1 except a hidden tree pane (width 0).

use core_text::ansi::strip_ansi;
use core_text::line_ops::{display_width, split_terminator};

pub const DIVIDER_WIDTH: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutRegion {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl LayoutRegion {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Regions of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u16,
    pub height: u16,
    pub tree: LayoutRegion,
    pub source: LayoutRegion,
    pub help: LayoutRegion,
    pub status: LayoutRegion,
}

impl Layout {
    /// Split a `width` x `height` terminal.
    ///
    /// `height` counts every row including the status row; `help_rows` are
    /// taken from the content area and capped so one content row remains.
    pub fn compute(
        width: u16,
        height: u16,
        left_width: u16,
        browser_visible: bool,
        help_rows: u16,
    ) -> Self {
        let width = width.max(1);
        let usable = height.saturating_sub(1).max(1);
        let help_rows = help_rows.min(usable.saturating_sub(1));
        let content_rows = (usable - help_rows).max(1);
        let (tree_w, source_x, source_w) = if browser_visible {
            let left = clamp_left_width(width as usize, left_width as usize) as u16;
            let right = width.saturating_sub(left + DIVIDER_WIDTH).max(1);
            (left, left + DIVIDER_WIDTH, right)
        } else {
            (0, 0, width)
        };
        Self {
            width,
            height,
            tree: LayoutRegion::new(0, 0, tree_w, content_rows),
            source: LayoutRegion::new(source_x, 0, source_w, content_rows),
            help: LayoutRegion::new(0, content_rows, width, help_rows),
            status: LayoutRegion::new(0, content_rows + help_rows, width, 1),
        }
    }

    #[inline]
    pub fn browser_visible(&self) -> bool {
        self.tree.width > 0
    }

    #[inline]
    pub fn content_rows(&self) -> usize {
        self.source.height as usize
    }

    #[inline]
    pub fn help_rows(&self) -> usize {
        self.help.height as usize
    }

    /// Width to soft-wrap source text at; one column narrower than the pane so
    /// a full chunk never touches the terminal's last column.
    pub fn wrap_width(&self) -> usize {
        if self.browser_visible() {
            (self.source.width as usize).saturating_sub(1).max(1)
        } else {
            (self.width as usize).saturating_sub(1).max(1)
        }
    }
}

/// Default tree-pane width for a terminal `total_width` columns wide.
pub fn compute_left_width(total_width: usize) -> usize {
    if total_width <= 60 {
        (total_width / 2).max(16)
    } else {
        (total_width / 3).clamp(20, 40)
    }
}

/// Clamp a requested tree-pane width to bounds that leave the source pane usable.
pub fn clamp_left_width(total_width: usize, desired: usize) -> usize {
    let max_possible = total_width.saturating_sub(2).max(1);
    let mut min_left = total_width.saturating_sub(12).min(20).max(12);
    let max_left = total_width.saturating_sub(12).max(min_left).min(max_possible);
    min_left = min_left.min(max_left);
    desired.clamp(min_left, max_left)
}

/// Tree-pane width from a configured percentage in the open interval (0, 100).
pub fn left_width_from_percent(total_width: usize, percent: Option<f64>) -> usize {
    let desired = match percent {
        Some(p) if p > 0.0 && p < 100.0 => (p / 100.0 * total_width as f64) as usize,
        _ => compute_left_width(total_width),
    };
    clamp_left_width(total_width, desired)
}

/// Largest useful horizontal offset: widest line minus the pane width.
pub fn max_horizontal_offset(lines: &[String], pane_width: usize) -> usize {
    let widest = lines
        .iter()
        .map(|line| display_width(&strip_ansi(split_terminator(line).0)))
        .max()
        .unwrap_or(0);
    widest.saturating_sub(pane_width)
}
