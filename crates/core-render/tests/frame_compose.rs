use core_model::{SymbolEntry, SymbolKind};
use core_render::{
    DEFAULT_HINT, FrameComposer, FrameInput, HelpMode, LeftPane, PickerFocus, PickerMode,
    PickerView, SearchHighlight, StatusInput, StickyInput, TreeRows, ViewFlags, compose_frame,
    render_frame,
};
use core_text::build_screen_lines;
use pretty_assertions::assert_eq;

const DIVIDER: &str = "\x1b[2m│\x1b[0m";
const BOX: &str = "class Box:\n    def first(self):\n        return 1\n\n    def second(self):\n        value = 2\n        return value\n";

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

fn base<'a>(lines: &'a [String], left: LeftPane<'a>) -> FrameInput<'a> {
    FrameInput {
        width: 30,
        height: 4,
        left_width: 10,
        flags: ViewFlags::BROWSER_VISIBLE,
        lines,
        vertical: 0,
        horizontal: 0,
        left,
        sticky: StickyInput::default(),
        help: None,
        search: None,
        selection: None,
        status: StatusInput {
            path: "f.txt",
            message: "",
            hint: DEFAULT_HINT,
        },
    }
}

fn box_symbols() -> Vec<SymbolEntry> {
    vec![
        SymbolEntry::new(SymbolKind::Class, "Box", 0),
        SymbolEntry::new(SymbolKind::Function, "first", 1),
        SymbolEntry::new(SymbolKind::Function, "second", 4),
    ]
}

#[test]
fn split_frame_pads_tree_and_divides_panes() {
    let lines = owned(&["abc\n", "def\n", "ghi\n"]);
    let tree = owned(&["a", "b"]);
    let input = base(
        &lines,
        LeftPane::Tree(TreeRows {
            rows: &tree,
            start: 0,
            selected: Some(1),
        }),
    );
    let pad = " ".repeat(17);
    let expected = format!(
        "\x1b[H\x1b[J\
         a{pad}{DIVIDER}abc\r\n\
         \x1b[7mb\x1b[0m{pad}{DIVIDER}def\r\n\
         {}{DIVIDER}ghi\r\n\
         \x1b[7mf.txt (1-3/3   0.0%) │ ? Help\x1b[0m",
        " ".repeat(18)
    );
    assert_eq!(compose_frame(&input), expected);
}

#[test]
fn render_frame_writes_one_buffer() {
    let lines = owned(&["abc\n"]);
    let input = base(&lines, LeftPane::Tree(TreeRows { rows: &[], start: 0, selected: None }));
    let mut out = Vec::new();
    render_frame(&input, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), compose_frame(&input));
}

#[test]
fn wrapped_rows_end_to_end() {
    let lines = build_screen_lines("abcdef\nxy\n", 3, true);
    assert_eq!(lines, owned(&["abc", "def\n", "xy\n"]));
    let mut input = base(&lines, LeftPane::Tree(TreeRows { rows: &[], start: 0, selected: None }));
    input.flags = ViewFlags::WRAP;
    input.width = 4;
    input.height = 4;
    let frame = compose_frame(&input);
    assert!(frame.starts_with("\x1b[H\x1b[Jabc\r\ndef\r\nxy\r\n"));
    // source lines 1..=2 of 2 over three display rows
    assert!(FrameComposer::new(&input).status_text().starts_with("f.txt (1-2/2"));
}

#[test]
fn help_rows_shrink_content() {
    let lines = owned(&["abc\n"; 20]);
    let mut input = base(&lines, LeftPane::Tree(TreeRows { rows: &[], start: 0, selected: None }));
    input.flags = ViewFlags::empty();
    input.width = 80;
    input.height = 10;
    input.help = Some(HelpMode::Browse);
    let composer = FrameComposer::new(&input);
    assert_eq!(composer.layout().help_rows(), 5);
    assert_eq!(composer.layout().content_rows(), 4);
    let frame = composer.compose();
    assert_eq!(frame.matches("\r\n").count(), 9);
    assert!(frame.contains("\x1b[1;38;5;81mKEYS\x1b[0m"));
}

#[test]
fn split_help_rows_use_both_columns() {
    let lines = owned(&["abc\n"; 20]);
    let mut input = base(&lines, LeftPane::Tree(TreeRows { rows: &[], start: 0, selected: None }));
    input.width = 100;
    input.height = 20;
    input.left_width = 30;
    input.help = Some(HelpMode::Browse);
    let frame = compose_frame(&input);
    let pad = " ".repeat(26);
    assert!(frame.contains(&format!(
        "\x1b[1;38;5;81mTREE\x1b[0m{pad}{DIVIDER}\x1b[1;38;5;81mTEXT\x1b[0m\x1b[0m\r\n"
    )));
}

#[test]
fn sticky_headers_cover_first_rows() {
    let lines = build_screen_lines(BOX, 40, false);
    let symbols = box_symbols();
    let mut input = base(&lines, LeftPane::Tree(TreeRows { rows: &[], start: 0, selected: None }));
    input.flags = ViewFlags::empty();
    input.width = 40;
    input.height = 10;
    input.vertical = 5;
    input.sticky = StickyInput {
        enabled: true,
        symbols: &symbols,
        scope_source: None,
        max_headers: None,
    };
    let composer = FrameComposer::new(&input);
    assert_eq!(
        composer.sticky_rows(),
        &[
            format!("\x1b[4mclass Box:\x1b[24m\x1b[2;38;5;245m{}\x1b[0m", "─".repeat(30)),
            format!(
                "\x1b[4m    def second(self):\x1b[24m\x1b[2;38;5;245m{}\x1b[0m",
                "─".repeat(19)
            ),
        ]
    );
    assert_eq!(composer.text_content_rows(), 7);
    let frame = composer.compose();
    // display line 5 sits under the first header
    assert!(!frame.contains("value = 2"));
    assert!(frame.contains("class Box:"));
}

#[test]
fn sticky_headers_skipped_on_diff_without_source() {
    let lines = build_screen_lines(BOX, 40, false);
    let symbols = box_symbols();
    let mut input = base(&lines, LeftPane::Tree(TreeRows { rows: &[], start: 0, selected: None }));
    input.flags = ViewFlags::DIFF;
    input.height = 10;
    input.vertical = 5;
    input.sticky = StickyInput {
        enabled: true,
        symbols: &symbols,
        scope_source: None,
        max_headers: None,
    };
    assert!(FrameComposer::new(&input).sticky_rows().is_empty());
}

#[test]
fn search_hits_are_emphasized() {
    let lines = owned(&["find me, find me\n"]);
    let mut input = base(&lines, LeftPane::Tree(TreeRows { rows: &[], start: 0, selected: None }));
    input.flags = ViewFlags::empty();
    input.width = 40;
    input.search = Some(SearchHighlight {
        query: "FIND",
        current: Some((0, 10)),
    });
    let frame = compose_frame(&input);
    assert!(frame.starts_with(
        "\x1b[H\x1b[J\x1b[1mfind\x1b[22m me, \x1b[7;1mfind\x1b[27;22m me\x1b[0m\r\n"
    ));
}

#[test]
fn picker_replaces_tree_rows() {
    let lines = owned(&["abc\n"]);
    let items = owned(&["fn main", "fn other"]);
    let input = base(
        &lines,
        LeftPane::Picker(PickerView {
            mode: PickerMode::Symbols,
            query: "",
            items: &items,
            selected: 0,
            focus: PickerFocus::List,
            list_start: 0,
            message: "",
        }),
    );
    let frame = compose_frame(&input);
    let rows: Vec<&str> = frame.split("\r\n").collect();
    assert!(rows[0].contains("s> type to filter"));
    assert!(rows[1].starts_with("\x1b[7m fn main\x1b[0m"));
    assert!(rows[2].starts_with(" fn other"));
}
