//! Line-based symbol scan used when no parser is available.
//!
//! Recognizes declarations by their leading keyword after any visibility or
//! `async` qualifiers. Good enough to drive sticky headers and the symbol
//! picker for Python and Rust style sources.

use core_model::sticky::leading_indent;
use core_model::{SymbolEntry, SymbolKind};

const QUALIFIERS: &[&str] = &[
    "pub(crate) ",
    "pub(super) ",
    "pub ",
    "async ",
    "export ",
    "unsafe ",
];

const KEYWORDS: &[(&str, SymbolKind)] = &[
    ("def ", SymbolKind::Function),
    ("fn ", SymbolKind::Function),
    ("class ", SymbolKind::Class),
    ("struct ", SymbolKind::Class),
    ("enum ", SymbolKind::Class),
    ("trait ", SymbolKind::Class),
    ("impl ", SymbolKind::Class),
    ("mod ", SymbolKind::Class),
    ("import ", SymbolKind::Import),
    ("from ", SymbolKind::Import),
    ("use ", SymbolKind::Import),
];

fn strip_qualifiers(mut text: &str) -> &str {
    while let Some(rest) = QUALIFIERS.iter().find_map(|q| text.strip_prefix(q)) {
        text = rest;
    }
    text
}

fn identifier(text: &str) -> &str {
    let end = text
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || matches!(c, '_' | '.' | ':')))
        .map_or(text.len(), |(i, _)| i);
    text[..end].trim_end_matches([':', '.'])
}

/// Declarations in `lines` (plain text), in file order.
pub fn extract_symbols(lines: &[String]) -> Vec<SymbolEntry> {
    let mut out = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let body = strip_qualifiers(line.trim_start());
        let Some((kind, rest)) = KEYWORDS
            .iter()
            .find_map(|(kw, kind)| body.strip_prefix(kw).map(|rest| (*kind, rest)))
        else {
            continue;
        };
        let name = identifier(rest.trim_start());
        if name.is_empty() {
            continue;
        }
        let mut entry = SymbolEntry::new(kind, name, idx);
        entry.column = leading_indent(line);
        out.push(entry);
    }
    out
}
