use core_model::{LineMap, ScrollModel};
use proptest::prelude::*;

const ADDED: &str = "\x1b[48;2;36;74;52m";
const REMOVED: &str = "\x1b[48;2;92;43;49m";

/// Background-annotated diff: (kind, text) with 0 context, 1 added, 2 removed.
fn annotated() -> impl Strategy<Value = Vec<(u8, String)>> {
    prop::collection::vec((0u8..3, "[a-z ]{0,30}"), 1..30)
}

fn render(rows: &[(u8, String)]) -> String {
    rows.iter()
        .map(|(kind, text)| match kind {
            1 => format!("{ADDED}{text}\x1b[0m\n"),
            2 => format!("{REMOVED}{text}\x1b[0m\n"),
            _ => format!("{text}\n"),
        })
        .collect()
}

fn block() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z ]{0,30}", 1..40).prop_map(|lines| {
        let mut out = lines.join("\n");
        out.push('\n');
        out
    })
}

proptest! {
    #[test]
    fn wrap_round_trip_restores_top_line(
        text in block(),
        width in 1usize..12,
        rows in 1usize..10,
        pick in 0usize..100,
    ) {
        let mut model = ScrollModel::new(false);
        model.resize(width, rows, None);
        model.set_content(text, None);
        let start = pick % (model.max_offset() + 1);
        model.scroll_to(start);

        model.toggle_wrap(None);
        let map = LineMap::new(model.lines(), true);
        prop_assert_eq!(map.logical_line_at(model.vertical()), start + 1);

        model.toggle_wrap(None);
        prop_assert_eq!(model.vertical(), start);
    }

    #[test]
    fn source_mapping_is_monotonic(text in block(), width in 1usize..12) {
        let lines = core_text::build_screen_lines(&text, width, true);
        let map = LineMap::new(&lines, true);
        let mut prev = 0usize;
        for d in 0..lines.len() {
            let s = map.source_line_at(d);
            prop_assert!(s >= prev);
            prev = s;
            let first = map.source_line_display_index(s).unwrap();
            prop_assert!(first <= d);
            prop_assert_eq!(map.source_line_at(first), s);
        }
    }
}

proptest! {
    #[test]
    fn wrapped_diff_operations_agree(rows in annotated(), width in 1usize..12) {
        let lines = core_text::build_screen_lines(&render(&rows), width, true);
        let map = LineMap::for_diff(&lines, true);
        let kept: Vec<&String> = rows.iter().filter(|(k, _)| *k != 2).map(|(_, t)| t).collect();
        prop_assert_eq!(map.source_line_count(), kept.len());

        for d in 0..lines.len() {
            let logical = map.logical_line_at(d);
            let run_start = map.logical_line_display_index(logical);
            let run_end = map.logical_line_display_index(logical + 1);
            let back = map.source_line_display_index(map.source_line_at(d));
            if map.is_removed_at(d) {
                // removed runs point at the following source line, if any
                prop_assert!(back.is_none_or(|b| b > d));
            } else {
                let b = back.unwrap();
                prop_assert!(b == run_start && b <= d);
                prop_assert!(d < run_end || logical == map.logical_line_count());
            }
        }
        for (n, text) in kept.iter().enumerate() {
            let raw = map.source_line_raw_text(n + 1);
            prop_assert_eq!(core_text::strip_ansi(&raw).into_owned(), text.to_string());
        }
    }
}

#[test]
fn diff_block_without_markers_hides_nothing() {
    let lines: Vec<String> = (0..10).map(|i| format!("line {i}\n")).collect();
    let map = LineMap::for_diff(&lines, false);
    assert_eq!(map.source_line_count(), lines.len());
}
