//! Pager state: what is open, where it is scrolled, which overlay is up, and
//! how keys and mouse events change that.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use core_config::{Config, ConfigContext};
use core_model::layout::clamp_left_width;
use core_model::selection::selected_text;
use core_model::{
    ChangeJump, Layout, LineMap, ScreenLineCache, ScrollModel, SelectionPoint, SelectionRange,
    SymbolEntry,
};
use core_render::help::help_row_count;
use core_render::{
    DEFAULT_HINT, FrameInput, HelpMode, LeftPane, PickerFocus, PickerMode, PickerView,
    SearchHighlight, StatusInput, StickyInput, TreeRows, ViewFlags, render_frame,
    render_help_page,
};
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tracing::{debug, warn};

use crate::document::Document;
use crate::search::{SearchState, viewport_column};
use crate::tree::FileTree;

const HSCROLL_STEP: isize = 4;
const WHEEL_STEP: isize = 3;
const TREE_RESIZE_STEP: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    ToggleWrap,
    ToggleTree,
    ToggleHelp,
    HelpPage,
    Quit,
}

const COMMANDS: &[(&str, Command)] = &[
    ("toggle wrap", Command::ToggleWrap),
    ("toggle tree", Command::ToggleTree),
    ("toggle help", Command::ToggleHelp),
    ("help page", Command::HelpPage),
    ("quit", Command::Quit),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickerTarget {
    Command(Command),
    /// Index into the document's symbols.
    Symbol(usize),
}

#[derive(Debug)]
struct Picker {
    mode: PickerMode,
    query: String,
    focus: PickerFocus,
    selected: usize,
    list_start: usize,
    items: Vec<String>,
    targets: Vec<PickerTarget>,
    message: String,
    /// The tree pane was hidden when the picker opened.
    hide_tree_on_close: bool,
}

impl Picker {
    fn new(mode: PickerMode, symbols: &[SymbolEntry], hide_tree_on_close: bool) -> Self {
        let mut picker = Self {
            mode,
            query: String::new(),
            focus: PickerFocus::Query,
            selected: 0,
            list_start: 0,
            items: Vec::new(),
            targets: Vec::new(),
            message: String::new(),
            hide_tree_on_close,
        };
        picker.filter(symbols);
        picker
    }

    fn filter(&mut self, symbols: &[SymbolEntry]) {
        let needle = self.query.to_lowercase();
        let keep = |label: &str| needle.is_empty() || label.to_lowercase().contains(&needle);
        let (items, targets): (Vec<String>, Vec<PickerTarget>) = match self.mode {
            PickerMode::Commands => COMMANDS
                .iter()
                .filter(|(label, _)| keep(label))
                .map(|(label, cmd)| (label.to_string(), PickerTarget::Command(*cmd)))
                .unzip(),
            PickerMode::Symbols => symbols
                .iter()
                .enumerate()
                .filter(|(_, s)| keep(&s.label))
                .map(|(i, s)| (s.label.clone(), PickerTarget::Symbol(i)))
                .unzip(),
        };
        self.items = items;
        self.targets = targets;
        self.selected = 0;
        self.list_start = 0;
        self.message = if self.items.is_empty() {
            "no matches".to_string()
        } else {
            String::new()
        };
    }

    fn move_selection(&mut self, delta: isize, list_rows: usize) {
        self.focus = PickerFocus::List;
        let last = self.items.len().saturating_sub(1);
        self.selected = self.selected.saturating_add_signed(delta).min(last);
        let rows = list_rows.max(1);
        if self.selected < self.list_start {
            self.list_start = self.selected;
        } else if self.selected >= self.list_start + rows {
            self.list_start = self.selected + 1 - rows;
        }
    }
}

fn to_u16(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

pub struct App {
    config: Config,
    cache: ScreenLineCache,
    scroll: ScrollModel,
    tree: Option<FileTree>,
    doc: Document,
    width: usize,
    height: usize,
    left_width: usize,
    browser_visible: bool,
    help_rows: bool,
    help_page: bool,
    search: Option<SearchState>,
    picker: Option<Picker>,
    anchor: Option<SelectionPoint>,
    focus: Option<SelectionPoint>,
    message: String,
}

impl App {
    pub fn new(
        mut config: Config,
        doc: Document,
        rendered: String,
        tree: Option<FileTree>,
        width: usize,
        height: usize,
    ) -> Self {
        let effective =
            config.apply_context(ConfigContext::from_terminal(to_u16(width), to_u16(height)));
        let cache = ScreenLineCache::new(config.screen_lines_capacity());
        let scroll = ScrollModel::new(config.file.view.wrap);
        let browser_visible = config.file.layout.browser_visible && tree.is_some();
        let mut app = Self {
            config,
            cache,
            scroll,
            tree,
            doc,
            width,
            height,
            left_width: effective.left_width,
            browser_visible,
            help_rows: false,
            help_page: false,
            search: None,
            picker: None,
            anchor: None,
            focus: None,
            message: String::new(),
        };
        app.relayout();
        app.scroll.set_content(rendered, Some(&mut app.cache));
        if let Some(path) = app.doc.path.clone() {
            let path = std::fs::canonicalize(&path).unwrap_or(path);
            let rows = app.scroll.visible_rows();
            if let Some(tree) = app.tree.as_mut() {
                tree.select_path(&path, rows);
            }
        }
        app
    }

    fn help_mode(&self) -> Option<HelpMode> {
        if !self.help_rows {
            return None;
        }
        Some(match &self.search {
            Some(s) if s.editing => HelpMode::SearchEditing,
            Some(s) if !s.hits.is_empty() => HelpMode::SearchHits,
            _ => HelpMode::Browse,
        })
    }

    fn layout(&self) -> Layout {
        let usable = self.height.saturating_sub(1).max(1);
        let help = help_row_count(usable, self.help_mode(), self.browser_visible);
        Layout::compute(
            to_u16(self.width),
            to_u16(self.height),
            to_u16(self.left_width),
            self.browser_visible,
            to_u16(help),
        )
    }

    /// Push the current pane geometry into the scroll model.
    fn relayout(&mut self) {
        let layout = self.layout();
        let rows = layout.content_rows();
        self.scroll
            .resize(layout.wrap_width(), rows, Some(&mut self.cache));
        if let Some(tree) = self.tree.as_mut() {
            tree.reveal(rows);
        }
    }

    fn refresh_search(&mut self) {
        if let Some(search) = self.search.as_mut() {
            search.refresh(self.scroll.lines(), self.scroll.vertical());
        }
    }

    fn clear_selection(&mut self) {
        self.anchor = None;
        self.focus = None;
    }

    fn selection(&self) -> Option<SelectionRange> {
        SelectionRange::normalize(self.anchor, self.focus)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        let ctx = ConfigContext::from_terminal(to_u16(width), to_u16(height));
        if let Some(effective) = self.config.recompute_with_context(ctx) {
            self.left_width = effective.left_width;
        }
        self.left_width = clamp_left_width(width, self.left_width);
        let before = self.scroll.lines().len();
        self.relayout();
        if self.scroll.lines().len() != before {
            self.clear_selection();
            self.refresh_search();
        }
        debug!(target: "runtime", width, height, left_width = self.left_width, "resized");
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }
        if self.help_page {
            self.help_page = false;
            return Flow::Continue;
        }
        if self.picker.is_some() {
            return self.picker_key(key);
        }
        if self.search.as_ref().is_some_and(|s| s.editing) {
            self.search_key(key);
            return Flow::Continue;
        }
        self.browse_key(key)
    }

    fn browse_key(&mut self, key: KeyEvent) -> Flow {
        let rows = self.scroll.visible_rows() as isize;
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Flow::Quit;
            }
            KeyCode::Esc => {
                if self.anchor.is_some() {
                    self.clear_selection();
                } else if self.search.take().is_some() {
                    self.relayout();
                }
                self.message.clear();
            }
            KeyCode::Down => self.scroll.scroll_by(1),
            KeyCode::Up => self.scroll.scroll_by(-1),
            KeyCode::Char('j') => self.tree_or_scroll(1),
            KeyCode::Char('k') => self.tree_or_scroll(-1),
            KeyCode::Char('h') if self.browser_visible => self.tree_parent(),
            KeyCode::Char('l') | KeyCode::Enter if self.browser_visible => self.open_selected(),
            KeyCode::Char('d') => self.scroll.scroll_by((rows / 2).max(1)),
            KeyCode::Char('u') => self.scroll.scroll_by(-(rows / 2).max(1)),
            KeyCode::Char(' ') | KeyCode::Char('f') | KeyCode::PageDown => {
                self.scroll.scroll_by(rows)
            }
            KeyCode::Char('b') | KeyCode::PageUp => self.scroll.scroll_by(-rows),
            KeyCode::Char('g') | KeyCode::Home => self.scroll.scroll_to(0),
            KeyCode::Char('G') | KeyCode::End => self.scroll.scroll_to(self.scroll.max_offset()),
            KeyCode::Left if shift => self.resize_tree(false),
            KeyCode::Right if shift => self.resize_tree(true),
            KeyCode::Left => self.scroll_sideways(-HSCROLL_STEP),
            KeyCode::Right => self.scroll_sideways(HSCROLL_STEP),
            KeyCode::Char('w') => self.toggle_wrap(),
            KeyCode::Char('t') => self.toggle_tree(),
            KeyCode::Char('n') => self.next(true),
            KeyCode::Char('N') => self.next(false),
            KeyCode::Char('/') => {
                match self.search.as_mut() {
                    Some(search) => search.editing = true,
                    None => self.search = Some(SearchState::editing()),
                }
                self.relayout();
            }
            KeyCode::Char('?') => {
                self.help_rows = !self.help_rows;
                self.relayout();
            }
            KeyCode::F(1) => self.help_page = true,
            KeyCode::Char(':') => self.open_picker(PickerMode::Commands),
            KeyCode::Char('s') => self.open_picker(PickerMode::Symbols),
            _ => {}
        }
        Flow::Continue
    }

    fn search_key(&mut self, key: KeyEvent) {
        let Some(search) = self.search.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.search = None,
            KeyCode::Enter => {
                search.editing = false;
                match search.current_hit() {
                    Some((line, _)) => self.scroll.center_on(line),
                    None => self.message = format!("no matches for {:?}", search.query),
                }
            }
            KeyCode::Backspace => {
                search.query.pop();
                search.refresh(self.scroll.lines(), self.scroll.vertical());
            }
            KeyCode::Char(c) => {
                search.query.push(c);
                search.refresh(self.scroll.lines(), self.scroll.vertical());
            }
            _ => {}
        }
        self.relayout();
    }

    fn picker_key(&mut self, key: KeyEvent) -> Flow {
        let list_rows = self.layout().content_rows().saturating_sub(1).max(1);
        let Some(picker) = self.picker.as_mut() else {
            return Flow::Continue;
        };
        match key.code {
            KeyCode::Esc => self.close_picker(),
            KeyCode::Enter => {
                let target = picker.targets.get(picker.selected).copied();
                self.close_picker();
                if let Some(target) = target {
                    return self.run_target(target);
                }
            }
            KeyCode::Tab => {
                picker.focus = match picker.focus {
                    PickerFocus::Query => PickerFocus::List,
                    PickerFocus::List => PickerFocus::Query,
                };
            }
            KeyCode::Down => picker.move_selection(1, list_rows),
            KeyCode::Up => picker.move_selection(-1, list_rows),
            KeyCode::Backspace => {
                picker.query.pop();
                picker.filter(&self.doc.symbols);
            }
            KeyCode::Char(c) => {
                picker.focus = PickerFocus::Query;
                picker.query.push(c);
                picker.filter(&self.doc.symbols);
            }
            _ => {}
        }
        Flow::Continue
    }

    fn open_picker(&mut self, mode: PickerMode) {
        let hide_tree_on_close = !self.browser_visible;
        self.picker = Some(Picker::new(mode, &self.doc.symbols, hide_tree_on_close));
        if hide_tree_on_close {
            self.browser_visible = true;
            self.relayout();
        }
    }

    fn close_picker(&mut self) {
        if let Some(picker) = self.picker.take()
            && picker.hide_tree_on_close
        {
            self.browser_visible = false;
            self.relayout();
        }
    }

    fn run_target(&mut self, target: PickerTarget) -> Flow {
        match target {
            PickerTarget::Command(Command::ToggleWrap) => self.toggle_wrap(),
            PickerTarget::Command(Command::ToggleTree) => self.toggle_tree(),
            PickerTarget::Command(Command::ToggleHelp) => {
                self.help_rows = !self.help_rows;
                self.relayout();
            }
            PickerTarget::Command(Command::HelpPage) => self.help_page = true,
            PickerTarget::Command(Command::Quit) => return Flow::Quit,
            PickerTarget::Symbol(idx) => self.jump_to_symbol(idx),
        }
        Flow::Continue
    }

    fn jump_to_symbol(&mut self, idx: usize) {
        let Some(symbol) = self.doc.symbols.get(idx) else {
            return;
        };
        let lines = self.scroll.lines();
        let map = if self.doc.diff {
            LineMap::for_diff(lines, self.scroll.wrap())
        } else {
            LineMap::new(lines, self.scroll.wrap())
        };
        match map.source_line_display_index(symbol.header_line()) {
            Some(display) => {
                self.message = symbol.label.clone();
                self.scroll.center_on(display);
            }
            None => self.message = format!("{} is not in this view", symbol.label),
        }
    }

    fn tree_or_scroll(&mut self, delta: isize) {
        let rows = self.scroll.visible_rows();
        match self.tree.as_mut() {
            Some(tree) if self.browser_visible => tree.move_selection(delta, rows),
            _ => self.scroll.scroll_by(delta),
        }
    }

    fn tree_parent(&mut self) {
        let Some(dir) = self.tree.as_ref().map(|t| t.dir().to_path_buf()) else {
            return;
        };
        if let Some(parent) = dir.parent() {
            self.enter_dir(parent, Some(&dir));
        }
    }

    fn open_selected(&mut self) {
        let Some(entry) = self.tree.as_ref().and_then(|t| t.selected()).cloned() else {
            return;
        };
        if entry.is_dir {
            let from = self.tree.as_ref().map(|t| t.dir().to_path_buf());
            self.enter_dir(&entry.path, from.as_deref());
        } else {
            self.open_file(&entry.path);
        }
    }

    fn enter_dir(&mut self, dir: &Path, reselect: Option<&Path>) {
        match FileTree::open(dir) {
            Ok(mut tree) => {
                if let Some(path) = reselect {
                    tree.select_path(path, self.scroll.visible_rows());
                }
                self.tree = Some(tree);
            }
            Err(e) => {
                warn!(target: "tree", dir = %dir.display(), error = %format!("{e:#}"), "tree_open_failed");
                self.message = format!("{e:#}");
            }
        }
    }

    fn open_file(&mut self, path: &Path) {
        match Document::load(path, false, None) {
            Ok((doc, rendered)) => {
                self.doc = doc;
                self.scroll.set_content(rendered, Some(&mut self.cache));
                self.clear_selection();
                self.refresh_search();
                self.message.clear();
            }
            Err(e) => {
                warn!(target: "io", file = %path.display(), error = %format!("{e:#}"), "file_open_failed");
                self.message = format!("{e:#}");
            }
        }
    }

    fn scroll_sideways(&mut self, delta: isize) {
        let pane = self.layout().source.width as usize;
        self.scroll.scroll_horizontal(delta, pane);
    }

    fn resize_tree(&mut self, wider: bool) {
        if !self.browser_visible {
            return;
        }
        let desired = if wider {
            self.left_width + TREE_RESIZE_STEP
        } else {
            self.left_width.saturating_sub(TREE_RESIZE_STEP)
        };
        self.left_width = clamp_left_width(self.width, desired);
        self.relayout();
    }

    fn toggle_wrap(&mut self) {
        self.scroll.toggle_wrap(Some(&mut self.cache));
        self.clear_selection();
        self.refresh_search();
        self.message = if self.scroll.wrap() { "wrap on" } else { "wrap off" }.to_string();
    }

    fn toggle_tree(&mut self) {
        if self.tree.is_none() {
            self.message = "no directory listing".to_string();
            return;
        }
        self.browser_visible = !self.browser_visible;
        self.relayout();
    }

    /// `n`/`N`: step through search hits when there are any, else through
    /// change blocks.
    fn next(&mut self, forward: bool) {
        if let Some(search) = self.search.as_mut()
            && !search.hits.is_empty()
        {
            if let Some((line, _)) = search.step(forward) {
                self.scroll.center_on(line);
            }
            return;
        }
        self.message = match self.scroll.jump_to_change(forward) {
            ChangeJump::Moved => String::new(),
            ChangeJump::Wrapped if forward => "wrapped to first change".to_string(),
            ChangeJump::Wrapped => "wrapped to last change".to_string(),
            ChangeJump::Stayed => "no other changes".to_string(),
        };
    }

    /// Source-pane position under screen cell `(x, y)`.
    fn source_point(&self, x: usize, y: usize, clamp: bool) -> Option<SelectionPoint> {
        let region = self.layout().source;
        let (left, rows) = (region.x as usize, region.height as usize);
        let inside = x >= left && y < rows;
        if !inside && !clamp {
            return None;
        }
        let y = y.min(rows.saturating_sub(1));
        let col = x.saturating_sub(left)
            + if self.scroll.wrap() {
                0
            } else {
                self.scroll.horizontal()
            };
        let last = self.scroll.lines().len().saturating_sub(1);
        Some(SelectionPoint::new((self.scroll.vertical() + y).min(last), col))
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) -> Flow {
        if self.help_page {
            return Flow::Continue;
        }
        let (x, y) = (event.column as usize, event.row as usize);
        match event.kind {
            MouseEventKind::ScrollDown => self.scroll.scroll_by(WHEEL_STEP),
            MouseEventKind::ScrollUp => self.scroll.scroll_by(-WHEEL_STEP),
            MouseEventKind::Down(MouseButton::Left) => {
                self.anchor = self.source_point(x, y, false);
                self.focus = None;
            }
            MouseEventKind::Drag(MouseButton::Left) if self.anchor.is_some() => {
                self.focus = self.source_point(x, y, true);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(range) = self.selection().filter(|_| self.focus.is_some()) {
                    let text = selected_text(self.scroll.lines(), &range);
                    self.message = format!("{} chars selected", text.chars().count());
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    /// Compose the current frame and write it to `out` in one go.
    pub fn draw<W: Write>(&self, out: &mut W) -> Result<()> {
        if self.help_page {
            out.write_all(render_help_page(self.width, self.height).as_bytes())?;
            out.flush()?;
            return Ok(());
        }
        let lines = self.scroll.lines();
        let wrap = self.scroll.wrap();
        let horizontal = self.scroll.horizontal();

        let mut flags = ViewFlags::empty();
        flags.set(ViewFlags::BROWSER_VISIBLE, self.browser_visible);
        flags.set(ViewFlags::WRAP, wrap);
        flags.set(ViewFlags::DIFF, self.doc.diff);

        let left = match (&self.picker, &self.tree) {
            (Some(p), _) => LeftPane::Picker(PickerView {
                mode: p.mode,
                query: &p.query,
                items: &p.items,
                selected: p.selected,
                focus: p.focus,
                list_start: p.list_start,
                message: &p.message,
            }),
            (None, Some(tree)) => LeftPane::Tree(TreeRows {
                rows: tree.rows(),
                start: tree.start(),
                selected: tree.selected_index(),
            }),
            (None, None) => LeftPane::Tree(TreeRows {
                rows: &[],
                start: 0,
                selected: None,
            }),
        };

        let search = self
            .search
            .as_ref()
            .filter(|s| !s.query.is_empty())
            .map(|s| SearchHighlight {
                query: &s.query,
                current: s.current_hit().and_then(|(line, col)| {
                    let col = if wrap {
                        col
                    } else {
                        viewport_column(lines.get(line)?, col, horizontal)?
                    };
                    Some((line, col))
                }),
            });

        let editing = self.search.as_ref().filter(|s| s.editing);
        let message = match editing {
            Some(s) => format!("/{}", s.query),
            None => self.message.clone(),
        };

        let input = FrameInput {
            width: self.width,
            height: self.height,
            left_width: self.left_width,
            flags,
            lines,
            vertical: self.scroll.vertical(),
            horizontal,
            left,
            sticky: StickyInput {
                enabled: self.config.file.sticky.enabled,
                symbols: &self.doc.symbols,
                scope_source: self.doc.scope_source.as_deref(),
                max_headers: self.config.effective.sticky_max_headers,
            },
            help: self.help_mode(),
            search,
            selection: self.selection(),
            status: StatusInput {
                path: &self.doc.label,
                message: &message,
                hint: DEFAULT_HINT,
            },
        };
        render_frame(&input, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn press(app: &mut App, keys: &str) {
        for c in keys.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn numbered(n: usize) -> String {
        (0..n).map(|i| format!("line {i}\n")).collect()
    }

    fn app(rendered: &str, width: usize, height: usize) -> App {
        let mut doc = Document {
            label: "t.txt".to_string(),
            ..Document::default()
        };
        let plain: Vec<String> = rendered.lines().map(str::to_owned).collect();
        doc.symbols = crate::symbols::extract_symbols(&plain);
        App::new(Config::default(), doc, rendered.to_string(), None, width, height)
    }

    fn frame(app: &App) -> String {
        let mut out = Vec::new();
        app.draw(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn paging_keys_move_the_viewport() {
        let mut a = app(&numbered(100), 40, 11);
        assert_eq!(a.scroll.visible_rows(), 10);
        press(&mut a, "j");
        assert_eq!(a.scroll.vertical(), 1);
        press(&mut a, "d");
        assert_eq!(a.scroll.vertical(), 6);
        press(&mut a, " ");
        assert_eq!(a.scroll.vertical(), 16);
        press(&mut a, "G");
        assert_eq!(a.scroll.vertical(), 90);
        press(&mut a, "b");
        assert_eq!(a.scroll.vertical(), 80);
        press(&mut a, "g");
        assert_eq!(a.scroll.vertical(), 0);
    }

    #[test]
    fn quit_keys() {
        let mut a = app("x\n", 40, 5);
        assert_eq!(a.handle_key(key(KeyCode::Esc)), Flow::Continue);
        assert_eq!(a.handle_key(key(KeyCode::Char('q'))), Flow::Quit);
    }

    #[test]
    fn help_rows_shrink_the_text_area() {
        let mut a = app(&numbered(100), 40, 20);
        assert_eq!(a.scroll.visible_rows(), 19);
        press(&mut a, "?");
        assert_eq!(a.scroll.visible_rows(), 19 - 5);
        press(&mut a, "?");
        assert_eq!(a.scroll.visible_rows(), 19);
    }

    #[test]
    fn search_typing_and_hit_navigation() {
        let mut a = app(&numbered(50), 60, 11);
        press(&mut a, "/line 4");
        assert!(frame(&a).contains("/line 4"));
        a.handle_key(key(KeyCode::Enter));
        let hits: Vec<_> = a.search.as_ref().unwrap().hits.iter().map(|h| h.0).collect();
        assert_eq!(hits, vec![4, 40, 41, 42, 43, 44, 45, 46, 47, 48, 49]);
        press(&mut a, "n");
        assert_eq!(a.search.as_ref().unwrap().current_hit(), Some((40, 1)));
        assert_eq!(a.scroll.vertical(), 37);
        assert!(frame(&a).contains("\x1b[7;1mline 4\x1b[27;22m0"));
        a.handle_key(key(KeyCode::Esc));
        assert!(a.search.is_none());
    }

    #[test]
    fn wrap_toggle_keeps_the_top_line() {
        let long = format!("{}\n", "x".repeat(100));
        let text = format!("{long}{long}{}", numbered(20));
        let mut a = app(&text, 30, 10);
        press(&mut a, "jj");
        assert_eq!(a.scroll.vertical(), 2);
        press(&mut a, "w");
        assert!(a.scroll.wrap());
        assert_eq!(a.message, "wrap on");
        // two 100-column lines wrap to 4 chunks each at 29 columns
        assert_eq!(a.scroll.vertical(), 8);
        press(&mut a, "w");
        assert_eq!(a.scroll.vertical(), 2);
    }

    #[test]
    fn command_picker_runs_selected_command() {
        let mut a = app("x\n", 60, 10);
        assert!(!a.browser_visible);
        press(&mut a, ":");
        assert!(a.browser_visible);
        press(&mut a, "wrap");
        assert_eq!(a.picker.as_ref().unwrap().items, vec!["toggle wrap".to_string()]);
        assert_eq!(a.handle_key(key(KeyCode::Enter)), Flow::Continue);
        assert!(a.picker.is_none());
        assert!(!a.browser_visible);
        assert!(a.scroll.wrap());
    }

    #[test]
    fn symbol_picker_jumps_to_declaration() {
        let mut text = numbered(40);
        text.push_str("def target():\n");
        text.push_str(&numbered(40));
        let mut a = app(&text, 60, 13);
        press(&mut a, "starg");
        a.handle_key(key(KeyCode::Enter));
        assert_eq!(a.message, "fn target");
        // declaration at display line 40, placed in the upper third
        assert_eq!(a.scroll.vertical(), 36);
    }

    #[test]
    fn picker_filter_without_matches_reports_it() {
        let mut a = app("x\n", 60, 10);
        press(&mut a, ":zzz");
        assert_eq!(a.picker.as_ref().unwrap().message, "no matches");
        a.handle_key(key(KeyCode::Esc));
        assert!(a.picker.is_none());
    }

    #[test]
    fn change_jump_reports_wrap() {
        let text = format!("{}+ b\n{}- d\n{}", numbered(10), numbered(10), numbered(10));
        let mut a = app(&text, 40, 6);
        press(&mut a, "n");
        assert_eq!((a.scroll.vertical(), a.message.as_str()), (9, ""));
        press(&mut a, "n");
        assert_eq!(a.scroll.vertical(), 20);
        press(&mut a, "n");
        assert_eq!(a.scroll.vertical(), 9);
        assert_eq!(a.message, "wrapped to first change");
    }

    #[test]
    fn mouse_drag_selects_text() {
        let mut a = app("hello world\nsecond\n", 40, 5);
        let at = |kind, column, row| MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        a.handle_mouse(at(MouseEventKind::Down(MouseButton::Left), 6, 0));
        a.handle_mouse(at(MouseEventKind::Drag(MouseButton::Left), 3, 1));
        a.handle_mouse(at(MouseEventKind::Up(MouseButton::Left), 3, 1));
        assert_eq!(a.message, "9 chars selected");
        assert!(frame(&a).contains("hello \x1b[7mworld"));
        a.handle_key(key(KeyCode::Esc));
        assert!(a.selection().is_none());
    }

    #[test]
    fn help_page_closes_on_any_key() {
        let mut a = app("x\n", 100, 30);
        a.handle_key(key(KeyCode::F(1)));
        assert!(frame(&a).contains("oxview help"));
        press(&mut a, "j");
        assert!(!a.help_page);
        assert!(frame(&a).contains("t.txt"));
    }

    #[test]
    fn resize_reflows_and_keeps_status_row() {
        let mut a = app(&numbered(100), 40, 11);
        a.resize(60, 21);
        assert_eq!(a.scroll.visible_rows(), 20);
        let f = frame(&a);
        assert_eq!(f.matches("\r\n").count(), 20);
        assert!(f.contains("t.txt (1-20/100 "));
    }
}
