use std::time::{Duration, Instant};

use core_model::{SymbolEntry, SymbolKind};
use core_render::{
    DEFAULT_HINT, FrameComposer, FrameInput, LeftPane, StatusInput, StickyInput, TreeRows,
    ViewFlags, compose_frame, last_compose_ns,
};
use core_text::build_screen_lines;

const ADDED: &str = "\x1b[48;2;36;74;52m";
const REMOVED: &str = "\x1b[48;2;92;43;49m";

/// A 20,000-line background-annotated diff plus the working file it maps to.
fn annotated_diff() -> (String, Vec<String>, Vec<SymbolEntry>) {
    let mut rendered = String::new();
    let mut file = Vec::new();
    let mut symbols = Vec::new();
    for i in 0..20_000usize {
        if i % 50 == 0 {
            symbols.push(SymbolEntry::new(SymbolKind::Function, format!("f{i}"), file.len()));
            let text = format!("def f{i}(value):");
            rendered.push_str(&format!("\x1b[38;5;81m{text}\x1b[0m\n"));
            file.push(text);
        } else if i % 7 == 0 {
            rendered.push_str(&format!("{REMOVED}    old = {i}\x1b[0m\n"));
        } else if i % 11 == 0 {
            let text = format!("    new = {i} # \u{754c}\u{9762}\ttrailing");
            rendered.push_str(&format!("{ADDED}{text}\x1b[0m\n"));
            file.push(text);
        } else {
            let text = format!("    value = value + {i}");
            rendered.push_str(&format!("\x1b[37m{text}\x1b[0m\n"));
            file.push(text);
        }
    }
    (rendered, file, symbols)
}

fn input<'a>(
    lines: &'a [String],
    file: &'a [String],
    symbols: &'a [SymbolEntry],
    flags: ViewFlags,
    vertical: usize,
) -> FrameInput<'a> {
    FrameInput {
        width: 200,
        height: 60,
        left_width: 40,
        flags,
        lines,
        vertical,
        horizontal: 0,
        left: LeftPane::Tree(TreeRows {
            rows: &[],
            start: 0,
            selected: None,
        }),
        sticky: StickyInput {
            enabled: true,
            symbols,
            scope_source: Some(file),
            max_headers: None,
        },
        help: None,
        search: None,
        selection: None,
        status: StatusInput {
            path: "src/big.py",
            message: "",
            hint: DEFAULT_HINT,
        },
    }
}

#[test]
fn annotated_diff_frame_within_budget() {
    let (rendered, file, symbols) = annotated_diff();
    for wrap in [false, true] {
        let lines = build_screen_lines(&rendered, 158, wrap);
        let mut flags = ViewFlags::BROWSER_VISIBLE | ViewFlags::DIFF;
        flags.set(ViewFlags::WRAP, wrap);
        let vertical = lines.len() / 2;
        let frame_input = input(&lines, &file, &symbols, flags, vertical);

        let started = Instant::now();
        let frame = compose_frame(&frame_input);
        let elapsed = started.elapsed();

        assert!(
            elapsed < Duration::from_millis(250),
            "frame took {elapsed:?} (wrap={wrap})"
        );
        assert!(last_compose_ns() > 0);
        assert!(frame.ends_with("\x1b[0m"));
        assert_eq!(frame.matches("\r\n").count(), 59);
    }
}

#[test]
fn diff_status_counts_only_working_file_lines() {
    let (rendered, file, symbols) = annotated_diff();
    let lines = build_screen_lines(&rendered, 158, false);
    let frame_input = input(
        &lines,
        &file,
        &symbols,
        ViewFlags::BROWSER_VISIBLE | ViewFlags::DIFF,
        0,
    );
    let status = FrameComposer::new(&frame_input).status_text();
    assert!(
        status.contains(&format!("/{} ", file.len())),
        "status {status:?} should total {} lines",
        file.len()
    );
}

#[test]
fn sticky_scan_stays_fast_deep_in_a_long_scope() {
    // one function spanning the whole file; the scope walk must stay linear
    let mut rendered = String::from("def outer():\n");
    let mut file = vec!["def outer():".to_string()];
    for i in 0..20_000 {
        let text = format!("    step_{i}()");
        rendered.push_str(&text);
        rendered.push('\n');
        file.push(text);
    }
    let symbols = vec![SymbolEntry::new(SymbolKind::Function, "outer", 0)];
    let lines = build_screen_lines(&rendered, 158, false);
    let frame_input = input(&lines, &file, &symbols, ViewFlags::BROWSER_VISIBLE, 19_000);

    let started = Instant::now();
    let composer = FrameComposer::new(&frame_input);
    let _ = composer.compose();
    assert!(started.elapsed() < Duration::from_millis(250));
    assert_eq!(composer.sticky_rows().len(), 1);
}
