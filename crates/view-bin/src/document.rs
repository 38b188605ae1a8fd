//! The block shown in the source pane plus its symbols.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use core_model::SymbolEntry;
use core_model::sticky::load_scope_source;
use core_text::strip_ansi;

use crate::symbols::extract_symbols;

#[derive(Debug, Default)]
pub struct Document {
    pub label: String,
    pub path: Option<PathBuf>,
    /// The block is diff-annotated; sticky scopes come from `scope_source`.
    pub diff: bool,
    pub symbols: Vec<SymbolEntry>,
    pub scope_source: Option<Vec<String>>,
}

/// `path` relative to the working directory when it lives below it.
pub fn display_label(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));
    relative.unwrap_or_else(|| path.to_path_buf()).display().to_string()
}

impl Document {
    /// Read `path` (lossy UTF-8) and return the document with its rendered
    /// block. For a diff block, `working_file` supplies the lines that scope
    /// checks and symbols are taken from.
    pub fn load(path: &Path, diff: bool, working_file: Option<&Path>) -> Result<(Self, String)> {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let rendered = String::from_utf8_lossy(&bytes).into_owned();
        let (symbols, scope_source) = if diff {
            let source = working_file.and_then(load_scope_source);
            let symbols = source.as_deref().map(extract_symbols).unwrap_or_default();
            (symbols, source)
        } else {
            let plain: Vec<String> = rendered
                .lines()
                .map(|l| strip_ansi(l).into_owned())
                .collect();
            (extract_symbols(&plain), None)
        };
        tracing::debug!(
            target: "io",
            file = %path.display(),
            size_bytes = bytes.len(),
            diff,
            symbols = symbols.len(),
            "file_read_ok"
        );
        let doc = Self {
            label: display_label(path),
            path: Some(path.to_path_buf()),
            diff,
            symbols,
            scope_source,
        };
        Ok((doc, rendered))
    }
}
