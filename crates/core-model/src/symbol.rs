//! Symbol declarations consumed by the sticky-header tracker.
//!
//! Entries are produced by an external extractor (parser or regex fallback)
//! already sorted by declaration order. This crate only reads them.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Class,
    Import,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Function => "fn",
            SymbolKind::Class => "class",
            SymbolKind::Import => "import",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub kind: SymbolKind,
    pub name: String,
    /// 0-based declaration line.
    pub line: usize,
    pub column: usize,
    pub label: String,
}

impl SymbolEntry {
    pub fn new(kind: SymbolKind, name: impl Into<String>, line: usize) -> Self {
        let name = name.into();
        Self {
            kind,
            label: format!("{} {}", kind.as_str(), name),
            name,
            line,
            column: 0,
        }
    }

    /// Class and function declarations open a scope; imports do not.
    #[inline]
    pub fn opens_scope(&self) -> bool {
        matches!(self.kind, SymbolKind::Function | SymbolKind::Class)
    }

    /// 1-based source line of the declaration.
    #[inline]
    pub fn header_line(&self) -> usize {
        self.line + 1
    }
}
