//! Help panel rows and the full-screen help page.
//!
//! The panel is a fixed set of styled rows drawn under the content area; the
//! set depends on the layout (split or text-only) and on whether a content
//! search is active. The page is a modal box drawn with absolute cursor
//! positioning over a dimmed backdrop.

use core_text::line_ops::clip;

use crate::writer::Writer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HelpMode {
    #[default]
    Browse,
    /// Content search with the query row focused.
    SearchEditing,
    /// Content search navigating hits.
    SearchHits,
}

pub const TREE_LINES: &[&str] = &[
    "\x1b[1;38;5;81mTREE\x1b[0m",
    "\x1b[38;5;229mh/j/k/l\x1b[0m move  \x1b[38;5;229mEnter\x1b[0m open",
    "\x1b[38;5;229mt\x1b[0m show/hide tree",
    "\x1b[38;5;229mShift+Left/Right\x1b[0m resize tree",
    "\x1b[38;5;229m:\x1b[0m commands  \x1b[38;5;229ms\x1b[0m symbols",
];

pub const TEXT_LINES: &[&str] = &[
    "\x1b[1;38;5;81mTEXT\x1b[0m",
    "\x1b[38;5;229mUp/Down\x1b[0m line  \x1b[38;5;229md/u\x1b[0m half",
    "\x1b[38;5;229mSpace/f/b\x1b[0m page  \x1b[38;5;229mg/G\x1b[0m top/bottom",
    "\x1b[38;5;229mLeft/Right\x1b[0m x-scroll  \x1b[38;5;229mw\x1b[0m wrap",
    "\x1b[38;5;229mn/N\x1b[0m next/prev change  \x1b[38;5;229m/\x1b[0m search",
    "\x1b[38;5;229m?\x1b[0m help  \x1b[38;5;229mq\x1b[0m quit",
];

pub const TEXT_ONLY_LINES: &[&str] = &[
    "\x1b[1;38;5;81mKEYS\x1b[0m",
    "\x1b[38;5;229mUp/Down\x1b[0m  \x1b[38;5;229md/u\x1b[0m  \x1b[38;5;229mSpace/f/b\x1b[0m  \x1b[38;5;229mg/G\x1b[0m",
    "\x1b[38;5;229mLeft/Right\x1b[0m x-scroll  \x1b[38;5;229mw\x1b[0m wrap  \x1b[38;5;229mt\x1b[0m tree",
    "\x1b[38;5;229mn/N\x1b[0m changes  \x1b[38;5;229m/\x1b[0m search  \x1b[38;5;229ms\x1b[0m symbols",
    "\x1b[38;5;229m?\x1b[0m help  \x1b[38;5;229mq\x1b[0m quit",
];

pub const SEARCH_EDIT_TREE_LINES: &[&str] = &[
    "\x1b[1;38;5;81mSEARCH QUERY\x1b[0m",
    "\x1b[38;5;229mType/Backspace\x1b[0m edit query",
    "\x1b[38;5;229mEnter\x1b[0m jump to first hit",
    "\x1b[38;5;229mEsc\x1b[0m close search",
];

pub const SEARCH_HITS_TREE_LINES: &[&str] = &[
    "\x1b[1;38;5;81mSEARCH HITS\x1b[0m",
    "\x1b[38;5;229mn/N\x1b[0m next/prev hit",
    "\x1b[38;5;229m/\x1b[0m edit query",
    "\x1b[38;5;229mEsc\x1b[0m close search",
];

pub const SEARCH_HITS_TEXT_LINES: &[&str] = &[
    "\x1b[1;38;5;81mSEARCH HITS + TEXT\x1b[0m",
    "\x1b[38;5;229mn/N\x1b[0m next/prev hit  \x1b[38;5;229mw\x1b[0m wrap",
    "\x1b[38;5;229mUp/Down\x1b[0m line  \x1b[38;5;229mSpace/f/b\x1b[0m page",
    "\x1b[38;5;229m?\x1b[0m help  \x1b[38;5;229mq\x1b[0m quit",
];

pub const SEARCH_HITS_TEXT_ONLY_LINES: &[&str] = &[
    "\x1b[1;38;5;81mSEARCH HITS\x1b[0m",
    "\x1b[38;5;229mn/N\x1b[0m next/prev  \x1b[38;5;229m/\x1b[0m edit query",
    "\x1b[38;5;229mEsc\x1b[0m close search  \x1b[38;5;229mq\x1b[0m quit",
];

/// Help row sets for the tree column, the text column and the text-only layout.
#[derive(Debug, Clone, Copy)]
pub struct HelpLines {
    pub tree: &'static [&'static str],
    pub text: &'static [&'static str],
    pub text_only: &'static [&'static str],
}

impl HelpLines {
    pub fn for_mode(mode: HelpMode) -> Self {
        match mode {
            HelpMode::Browse => Self {
                tree: TREE_LINES,
                text: TEXT_LINES,
                text_only: TEXT_ONLY_LINES,
            },
            HelpMode::SearchEditing => Self {
                tree: SEARCH_EDIT_TREE_LINES,
                text: &[],
                text_only: SEARCH_HITS_TEXT_ONLY_LINES,
            },
            HelpMode::SearchHits => Self {
                tree: SEARCH_HITS_TREE_LINES,
                text: SEARCH_HITS_TEXT_LINES,
                text_only: SEARCH_HITS_TEXT_ONLY_LINES,
            },
        }
    }

    pub fn required_rows(&self, browser_visible: bool) -> usize {
        if browser_visible {
            self.tree.len().max(self.text.len())
        } else {
            self.text_only.len()
        }
    }
}

/// Help panel height within `max_lines` rows; one content row always remains.
pub fn help_row_count(max_lines: usize, mode: Option<HelpMode>, browser_visible: bool) -> usize {
    let Some(mode) = mode else {
        return 0;
    };
    if max_lines <= 1 {
        return 0;
    }
    HelpLines::for_mode(mode)
        .required_rows(browser_visible)
        .min(max_lines - 1)
}

/// Row `row` of a help set, or `""` past its end.
#[inline]
pub fn help_line(lines: &[&'static str], row: usize) -> &'static str {
    lines.get(row).copied().unwrap_or("")
}

const PAGE_TITLE: &str = "oxview help";
const PAGE_ACCENT: &str = "\x1b[38;5;45m";

const PAGE_LINES: &[&str] = &[
    "",
    "\x1b[1;38;5;81mGeneral\x1b[0m",
    "  \x1b[38;5;229m?\x1b[0m toggle help panel   \x1b[38;5;229mF1\x1b[0m this page   \x1b[38;5;229mq\x1b[0m/\x1b[38;5;229mEsc\x1b[0m close",
    "  \x1b[38;5;229m:\x1b[0m command picker   \x1b[38;5;229ms\x1b[0m symbol outline for the current file",
    "  \x1b[38;5;229m/\x1b[0m search the current file   \x1b[38;5;229mn/N\x1b[0m next/prev hit",
    "  \x1b[38;5;229mt\x1b[0m show/hide tree pane",
    "",
    "\x1b[1;38;5;81mSource pane\x1b[0m",
    "  \x1b[38;5;229mUp/Down\x1b[0m line   \x1b[38;5;229md/u\x1b[0m half-page   \x1b[38;5;229mSpace/f/b\x1b[0m page   \x1b[38;5;229mg/G\x1b[0m top/bottom",
    "  \x1b[38;5;229mw\x1b[0m toggle wrap   \x1b[38;5;229mLeft/Right\x1b[0m horizontal scroll (wrap off)",
    "  \x1b[38;5;229mn/N\x1b[0m next/prev change block in a diff",
    "  \x1b[38;5;229mv\x1b[0m start/clear selection   \x1b[38;5;229my\x1b[0m copy selection to the status line",
    "",
    "\x1b[1;38;5;81mLayout\x1b[0m",
    "  \x1b[38;5;229mShift+Left/Right\x1b[0m resize tree pane",
    "",
    "\x1b[2;38;5;250mPress ? / Esc / q to close\x1b[0m",
];

/// Full-screen modal help page as one frame.
pub fn render_help_page(width: usize, height: usize) -> String {
    let mut w = Writer::with_capacity(width * height * 2);
    w.clear_screen();

    let modal_w = width.saturating_sub(10).clamp(52, 84);
    let modal_h = height.saturating_sub(6).clamp(14, 24);
    let x = width.saturating_sub(modal_w) / 2;
    let y = height.saturating_sub(modal_h) / 2;
    let inner_w = modal_w.saturating_sub(2).max(1);
    let inner_h = modal_h.saturating_sub(2).max(1);

    // dim backdrop
    let backdrop = " ".repeat(width.saturating_sub(1).max(1));
    for row in 0..height {
        w.move_to(0, row);
        w.print("\x1b[2m");
        w.print(&backdrop);
        w.print("\x1b[0m");
    }

    let rule = "─".repeat(inner_w);
    let blank = " ".repeat(inner_w);
    w.move_to(x, y);
    w.print(PAGE_ACCENT);
    w.print("╭");
    w.print(&rule);
    w.print("╮\x1b[0m");
    for i in 0..inner_h {
        w.move_to(x, y + 1 + i);
        w.print(PAGE_ACCENT);
        w.print("│\x1b[0m");
        w.print(&blank);
        w.print(PAGE_ACCENT);
        w.print("│\x1b[0m");
    }
    w.move_to(x, y + modal_h - 1);
    w.print(PAGE_ACCENT);
    w.print("╰");
    w.print(&rule);
    w.print("╯\x1b[0m");

    let title_x = x + (modal_w.saturating_sub(2 + PAGE_TITLE.len()) / 2).max(2);
    w.move_to(title_x, y);
    w.print("\x1b[1;38;5;45m");
    w.print(PAGE_TITLE);
    w.print("\x1b[0m");

    let body_rows = PAGE_LINES.len().min(inner_h.saturating_sub(1));
    for (i, line) in PAGE_LINES.iter().take(body_rows).enumerate() {
        w.move_to(x + 2, y + 1 + i);
        w.print(&clip(line, inner_w.saturating_sub(2)));
        w.print("\x1b[0m");
    }
    w.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_help_takes_no_rows() {
        assert_eq!(help_row_count(40, None, true), 0);
        assert_eq!(help_row_count(1, Some(HelpMode::Browse), true), 0);
    }

    #[test]
    fn help_rows_follow_layout() {
        assert_eq!(help_row_count(40, Some(HelpMode::Browse), true), TEXT_LINES.len());
        assert_eq!(
            help_row_count(40, Some(HelpMode::Browse), false),
            TEXT_ONLY_LINES.len()
        );
        assert_eq!(help_row_count(3, Some(HelpMode::Browse), true), 2);
    }

    #[test]
    fn search_editing_has_no_text_column() {
        let lines = HelpLines::for_mode(HelpMode::SearchEditing);
        assert!(lines.text.is_empty());
        assert_eq!(help_line(lines.text, 0), "");
        assert_eq!(lines.required_rows(true), SEARCH_EDIT_TREE_LINES.len());
    }

    #[test]
    fn help_page_positions_modal() {
        let page = render_help_page(100, 30);
        assert!(page.starts_with("\x1b[H\x1b[J"));
        // modal is 84x24 centered at (8, 3); rows/cols are 1-based on the wire
        assert!(page.contains("\x1b[4;9H\x1b[38;5;45m╭"));
        assert!(page.contains("\x1b[27;9H\x1b[38;5;45m╰"));
        assert!(page.contains("oxview help"));
        assert!(page.contains("Press ? / Esc / q to close"));
    }
}
