//! Command / symbol picker drawn over the tree pane.
//!
//! Row 0 is the query row; rows below list the filtered items starting at
//! `list_start`. When nothing matched, row 1 carries the picker message.

use core_text::line_ops::clip;

use crate::highlight::selected_with_ansi;

const QUERY_STYLE: &str = "\x1b[1;38;5;81m";
const MUTED_STYLE: &str = "\x1b[2;38;5;250m";
const ACCENT_STYLE: &str = "\x1b[38;5;81m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerMode {
    Commands,
    Symbols,
}

impl PickerMode {
    pub fn prefix(self) -> &'static str {
        match self {
            PickerMode::Commands => ": ",
            PickerMode::Symbols => "s> ",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            PickerMode::Commands => "type to filter commands",
            PickerMode::Symbols => "type to filter symbols",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerFocus {
    #[default]
    Query,
    List,
}

#[derive(Debug, Clone)]
pub struct PickerView<'a> {
    pub mode: PickerMode,
    pub query: &'a str,
    pub items: &'a [String],
    pub selected: usize,
    pub focus: PickerFocus,
    pub list_start: usize,
    pub message: &'a str,
}

impl<'a> PickerView<'a> {
    /// Clamp `selected` and `list_start` against the items and the rows
    /// available below the query row.
    pub fn clamped(mut self, content_rows: usize) -> Self {
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
        let list_rows = content_rows.saturating_sub(1).max(1);
        let max_start = self.items.len().saturating_sub(list_rows);
        self.list_start = self.list_start.min(max_start);
        self
    }

    /// Row `row` of the picker, clipped to `width` and unpadded.
    pub fn render_row(&self, row: usize, width: usize) -> String {
        if row == 0 {
            let text = if self.query.is_empty() {
                format!("{MUTED_STYLE}{}{}\x1b[0m", self.mode.prefix(), self.mode.placeholder())
            } else {
                format!("{QUERY_STYLE}{}{}\x1b[0m", self.mode.prefix(), self.query)
            };
            let text = clip(&text, width);
            return match self.focus {
                PickerFocus::Query => selected_with_ansi(&text),
                PickerFocus::List => text,
            };
        }

        let idx = self.list_start + row - 1;
        if let Some(item) = self.items.get(idx) {
            let text = clip(&format!(" {item}"), width);
            if idx != self.selected {
                return text;
            }
            return match self.focus {
                PickerFocus::List => selected_with_ansi(&text),
                PickerFocus::Query => format!("{ACCENT_STYLE}{text}\x1b[0m"),
            };
        }
        if row == 1 && !self.message.is_empty() {
            return clip(&format!("{MUTED_STYLE}{}\x1b[0m", self.message), width);
        }
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn items() -> Vec<String> {
        ["fn main", "fn helper", "class Box"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn query_row_placeholder_and_focus() {
        let items = items();
        let view = PickerView {
            mode: PickerMode::Symbols,
            query: "",
            items: &items,
            selected: 0,
            focus: PickerFocus::List,
            list_start: 0,
            message: "",
        };
        assert_eq!(
            view.render_row(0, 40),
            "\x1b[2;38;5;250ms> type to filter symbols\x1b[0m"
        );
        let focused = PickerView {
            query: "he",
            focus: PickerFocus::Query,
            ..view
        };
        assert_eq!(focused.render_row(0, 40), "\x1b[7m\x1b[1;38;5;81ms> he\x1b[0;7m\x1b[0m");
    }

    #[test]
    fn selected_item_style_follows_focus() {
        let items = items();
        let view = PickerView {
            mode: PickerMode::Commands,
            query: "",
            items: &items,
            selected: 1,
            focus: PickerFocus::Query,
            list_start: 0,
            message: "",
        };
        assert_eq!(view.render_row(1, 40), " fn main");
        assert_eq!(view.render_row(2, 40), "\x1b[38;5;81m fn helper\x1b[0m");
        let listed = PickerView {
            focus: PickerFocus::List,
            ..view
        };
        assert_eq!(listed.render_row(2, 40), "\x1b[7m fn helper\x1b[0m");
        assert_eq!(listed.render_row(9, 40), "");
    }

    #[test]
    fn message_shows_when_list_is_empty() {
        let view = PickerView {
            mode: PickerMode::Symbols,
            query: "zz",
            items: &[],
            selected: 5,
            focus: PickerFocus::Query,
            list_start: 3,
            message: "no symbols",
        }
        .clamped(10);
        assert_eq!((view.selected, view.list_start), (0, 0));
        assert_eq!(view.render_row(1, 40), "\x1b[2;38;5;250mno symbols\x1b[0m");
    }

    #[test]
    fn list_start_clamps_to_visible_rows() {
        let items = items();
        let view = PickerView {
            mode: PickerMode::Symbols,
            query: "",
            items: &items,
            selected: 0,
            focus: PickerFocus::List,
            list_start: 9,
            message: "",
        }
        .clamped(3);
        assert_eq!(view.list_start, 1);
        assert_eq!(view.render_row(1, 40), " fn helper");
    }
}
