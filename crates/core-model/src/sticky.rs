//! Sticky symbol header tracking.
//!
//! Given the symbols declared in a file and the source line at the top of the
//! viewport, compute the chain of enclosing class/function declarations that
//! should stay pinned above the content.
//!
//! Algorithm:
//! 1. Candidates are scope-opening symbols declared strictly above the top
//!    line, in declaration order.
//! 2. An indentation stack reduces them to the enclosing chain: pop while the
//!    top of the stack is indented at least as deep as the candidate, then
//!    push. Tabs count as four columns.
//! 3. Each chain member is checked for scope exit at the top line; an exited
//!    symbol is dropped (its outer scopes may remain).
//! 4. The chain keeps its innermost `max_headers` entries.
//! 5. One-line lookahead: if the chain one line further down is exactly the
//!    current chain plus a symbol declared on the top line itself, that chain
//!    is returned now.
//!
//! Per-line facts (indent, blank, closing brace) are memoized inside a
//! `ScopeScanner` for the duration of one computation, so repeated scope
//! checks while scrolling never rescan from a declaration line per symbol.
//!
//! Invariants:
//! - Returned chains are strictly increasing in declaration line.
//! - Indentation along the chain is non-decreasing.

use std::path::Path;

use anyhow::Context;
use smallvec::SmallVec;
use tracing::{debug, warn};

use core_text::ansi::strip_ansi;

use crate::line_map::SourceText;
use crate::symbol::SymbolEntry;

/// Enclosing scopes, outermost first.
pub type StickyChain<'a> = SmallVec<[&'a SymbolEntry; 4]>;

const TAB_INDENT: usize = 4;

/// Leading indentation in columns; tabs count as four.
pub fn leading_indent(text: &str) -> usize {
    let mut col = 0usize;
    for ch in text.chars() {
        match ch {
            ' ' => col += 1,
            '\t' => col += TAB_INDENT,
            _ => break,
        }
    }
    col
}

#[derive(Debug, Clone, Copy)]
struct LineFacts {
    indent: usize,
    blank: bool,
    closes: bool,
}

/// Memoized per-line scope facts over one source text.
pub struct ScopeScanner<'s, S: SourceText + ?Sized> {
    source: &'s S,
    facts: Vec<Option<LineFacts>>,
}

impl<'s, S: SourceText + ?Sized> ScopeScanner<'s, S> {
    pub fn new(source: &'s S) -> Self {
        Self {
            facts: vec![None; source.line_count() + 1],
            source,
        }
    }

    fn facts(&mut self, line: usize) -> LineFacts {
        if let Some(Some(f)) = self.facts.get(line) {
            return *f;
        }
        let raw = self.source.raw_line(line);
        let plain = strip_ansi(&raw);
        let trimmed = plain.trim_start();
        let f = LineFacts {
            indent: leading_indent(&plain),
            blank: plain.trim().is_empty(),
            closes: trimmed.starts_with('}'),
        };
        if let Some(slot) = self.facts.get_mut(line) {
            *slot = Some(f);
        }
        f
    }

    pub fn indent(&mut self, line: usize) -> usize {
        self.facts(line).indent
    }

    pub fn is_blank(&mut self, line: usize) -> bool {
        self.facts(line).blank
    }

    /// First non-blank line at or after `from`.
    pub fn next_nonblank(&mut self, from: usize) -> Option<usize> {
        (from.max(1)..=self.source.line_count()).find(|&n| !self.is_blank(n))
    }

    /// Whether a blank line `line` ends the scope opened by `symbol`.
    fn blank_exits(&mut self, line: usize, symbol: &SymbolEntry, symbols: &[SymbolEntry]) -> bool {
        let Some(next) = self.next_nonblank(line + 1) else {
            return true;
        };
        if next_scope_start(symbols, symbol.header_line()) == Some(next) {
            return true;
        }
        let facts = self.facts(next);
        if facts.closes {
            return false;
        }
        facts.indent <= self.indent(symbol.header_line())
    }

    /// Whether `line` lies outside the scope opened by `symbol`.
    pub fn exits_scope(
        &mut self,
        line: usize,
        symbol: &SymbolEntry,
        symbols: &[SymbolEntry],
    ) -> bool {
        let header = symbol.header_line();
        if line <= header {
            return false;
        }
        if self.is_blank(line) && self.blank_exits(line, symbol, symbols) {
            return true;
        }
        let header_indent = self.indent(header);
        for n in header + 1..=line {
            let f = self.facts(n);
            if f.blank || f.closes {
                continue;
            }
            if f.indent <= header_indent {
                return true;
            }
        }
        false
    }

    /// Reduce declaration-ordered candidates to the enclosing chain.
    ///
    /// Without any source text there is no indentation to compare, so every
    /// candidate is kept.
    pub fn enclosing_chain<'a>(&mut self, candidates: &[&'a SymbolEntry]) -> StickyChain<'a> {
        if self.source.line_count() == 0 {
            return candidates.iter().copied().collect();
        }
        let mut stack: SmallVec<[(&'a SymbolEntry, usize); 8]> = SmallVec::new();
        for &symbol in candidates {
            let indent = if symbol.line < self.source.line_count() {
                self.indent(symbol.header_line())
            } else {
                0
            };
            while stack.last().is_some_and(|&(_, top)| indent <= top) {
                stack.pop();
            }
            stack.push((symbol, indent));
        }
        stack.into_iter().map(|(s, _)| s).collect()
    }

    fn headers_above<'a>(
        &mut self,
        symbols: &'a [SymbolEntry],
        top: usize,
        max_headers: usize,
    ) -> StickyChain<'a> {
        if max_headers == 0 || top <= 1 {
            return StickyChain::new();
        }
        let candidates: SmallVec<[&'a SymbolEntry; 16]> = symbols
            .iter()
            .filter(|s| s.opens_scope() && s.header_line() < top)
            .collect();
        let mut chain = self.enclosing_chain(&candidates);
        if chain.len() > max_headers {
            let excess = chain.len() - max_headers;
            chain.drain(..excess);
        }
        chain
    }

    fn visible_at<'a>(
        &mut self,
        chain: &StickyChain<'a>,
        line: usize,
        symbols: &[SymbolEntry],
    ) -> StickyChain<'a> {
        let mut visible = StickyChain::new();
        for &symbol in chain {
            if self.exits_scope(line, symbol, symbols) {
                // inner scopes cannot outlive an exited outer one
                break;
            }
            visible.push(symbol);
        }
        visible
    }
}

/// 1-based start line of the first scope-opening symbol after `after_line`.
pub fn next_scope_start(symbols: &[SymbolEntry], after_line: usize) -> Option<usize> {
    symbols
        .iter()
        .filter(|s| s.opens_scope())
        .map(SymbolEntry::header_line)
        .find(|&line| line > after_line.max(1))
}

/// Header budget for a pane with `content_rows` rows.
#[inline]
pub fn max_headers_for(content_rows: usize) -> usize {
    content_rows.saturating_sub(1).max(1)
}

/// Sticky chain for a viewport whose top row shows source line `top`.
///
/// `source` supplies the raw lines used for indentation and scope checks.
/// `max_headers` of `None` derives the budget from `content_rows`.
pub fn sticky_headers<'a, S: SourceText + ?Sized>(
    symbols: &'a [SymbolEntry],
    top: usize,
    content_rows: usize,
    max_headers: Option<usize>,
    source: &S,
) -> StickyChain<'a> {
    if content_rows <= 1 {
        return StickyChain::new();
    }
    let max_headers = max_headers.unwrap_or_else(|| max_headers_for(content_rows));
    let mut scanner = ScopeScanner::new(source);

    let chain = scanner.headers_above(symbols, top, max_headers);
    if chain.is_empty() {
        return chain;
    }
    let visible = scanner.visible_at(&chain, top, symbols);
    if visible.is_empty() {
        return visible;
    }

    if visible.len() < max_headers {
        let next = scanner.headers_above(symbols, top + 1, max_headers);
        if !next.is_empty() {
            let next_visible = scanner.visible_at(&next, top, symbols);
            let entering = next_visible.len() == visible.len() + 1
                && next_visible[..visible.len()] == visible[..]
                && next_visible
                    .last()
                    .is_some_and(|s| s.header_line() == top);
            if entering {
                debug!(target: "model.sticky", top, depth = next_visible.len(), "sticky_lookahead");
                return next_visible;
            }
        }
    }
    visible
}

/// Read a file's lines for scope checks.
pub fn read_scope_source(path: &Path) -> anyhow::Result<Vec<String>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading sticky scope source {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_owned)
        .collect())
}

/// `read_scope_source`, degrading to `None` (no headers) on failure.
pub fn load_scope_source(path: &Path) -> Option<Vec<String>> {
    match read_scope_source(path) {
        Ok(lines) => Some(lines),
        Err(e) => {
            warn!(target: "model.sticky", error = %e, "sticky_source_unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKind;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_owned).collect()
    }

    fn names(chain: &StickyChain<'_>) -> Vec<String> {
        chain.iter().map(|s| s.name.clone()).collect()
    }

    const BOX: &str = "class Box:\n    def first(self):\n        return 1\n\n    def second(self):\n        value = 2\n        return value\n";

    fn box_symbols() -> Vec<SymbolEntry> {
        vec![
            SymbolEntry::new(SymbolKind::Class, "Box", 0),
            SymbolEntry::new(SymbolKind::Function, "first", 1),
            SymbolEntry::new(SymbolKind::Function, "second", 4),
        ]
    }

    #[test]
    fn empty_source_keeps_every_candidate() {
        let syms = box_symbols();
        let candidates: Vec<&SymbolEntry> = syms.iter().collect();
        let empty: Vec<String> = Vec::new();
        let chain = ScopeScanner::new(&empty).enclosing_chain(&candidates);
        assert_eq!(names(&chain), vec!["Box", "first", "second"]);

        let src = lines(BOX);
        let chain = ScopeScanner::new(&src).enclosing_chain(&candidates);
        assert_eq!(names(&chain), vec!["Box", "second"]);
    }

    #[test]
    fn indent_counts_tabs_as_four() {
        assert_eq!(leading_indent("\t  x"), 6);
        assert_eq!(leading_indent("x  "), 0);
    }

    #[test]
    fn nested_method_chain() {
        let src = lines(BOX);
        let syms = box_symbols();
        let chain = sticky_headers(&syms, 6, 10, None, &src);
        assert_eq!(names(&chain), vec!["Box", "second"]);
    }

    #[test]
    fn inside_first_body() {
        let src = lines(BOX);
        let syms = box_symbols();
        let chain = sticky_headers(&syms, 3, 10, None, &src);
        assert_eq!(names(&chain), vec!["Box", "first"]);
    }

    #[test]
    fn blank_before_sibling_exits_inner_scope() {
        let src = lines(BOX);
        let syms = box_symbols();
        // line 4 is blank and the next non-blank line starts `second`
        let chain = sticky_headers(&syms, 4, 10, None, &src);
        assert_eq!(names(&chain), vec!["Box"]);
    }

    #[test]
    fn top_level_statement_after_blank_clears_chain() {
        let src = lines("def first():\n    return 1\n\nvalue = first()\nprint(value)\n");
        let syms = vec![SymbolEntry::new(SymbolKind::Function, "first", 0)];
        assert!(sticky_headers(&syms, 3, 10, None, &src).is_empty());
        assert!(sticky_headers(&syms, 4, 10, None, &src).is_empty());
        assert_eq!(names(&sticky_headers(&syms, 2, 10, None, &src)), vec!["first"]);
    }

    #[test]
    fn closing_brace_stays_in_scope() {
        let src = lines("fn main() {\n    let a = 1;\n\n}\nfn other() {}\n");
        let syms = vec![
            SymbolEntry::new(SymbolKind::Function, "main", 0),
            SymbolEntry::new(SymbolKind::Function, "other", 4),
        ];
        assert_eq!(names(&sticky_headers(&syms, 3, 10, None, &src)), vec!["main"]);
        assert_eq!(names(&sticky_headers(&syms, 4, 10, None, &src)), vec!["main"]);
    }

    #[test]
    fn lookahead_includes_symbol_declared_on_top_line() {
        let src = lines(BOX);
        let syms = box_symbols();
        // top shows `def second`; the chain one line down adds it
        let chain = sticky_headers(&syms, 5, 10, None, &src);
        assert_eq!(names(&chain), vec!["Box", "second"]);
    }

    #[test]
    fn max_headers_keeps_innermost() {
        let src = lines(BOX);
        let syms = box_symbols();
        let chain = sticky_headers(&syms, 6, 10, Some(1), &src);
        assert_eq!(names(&chain), vec!["second"]);
    }

    #[test]
    fn degenerate_inputs() {
        let src = lines(BOX);
        let syms = box_symbols();
        assert!(sticky_headers(&syms, 6, 1, None, &src).is_empty());
        assert!(sticky_headers(&syms, 1, 10, None, &src).is_empty());
        assert!(sticky_headers(&[], 6, 10, None, &src).is_empty());
    }

    #[test]
    fn imports_never_stick() {
        let src = lines("import os\nx = 1\ny = 2\n");
        let syms = vec![SymbolEntry::new(SymbolKind::Import, "os", 0)];
        assert!(sticky_headers(&syms, 3, 10, None, &src).is_empty());
    }

    #[test]
    fn next_scope_start_skips_imports() {
        let mut syms = box_symbols();
        syms.insert(0, SymbolEntry::new(SymbolKind::Import, "os", 0));
        assert_eq!(next_scope_start(&syms, 2), Some(5));
        assert_eq!(next_scope_start(&syms, 5), None);
    }

    #[test]
    fn missing_file_degrades_to_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_scope_source(&dir.path().join("nope.py")).is_none());
        let path = dir.path().join("a.py");
        std::fs::write(&path, "a\r\nb\n").unwrap();
        assert_eq!(load_scope_source(&path).unwrap(), vec!["a", "b"]);
    }
}
