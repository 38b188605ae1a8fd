//! One-level directory listing shown in the tree pane.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const DIR_STYLE: &str = "\x1b[38;5;81m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

#[derive(Debug)]
pub struct FileTree {
    dir: PathBuf,
    entries: Vec<TreeEntry>,
    rows: Vec<String>,
    selected: usize,
    start: usize,
}

impl FileTree {
    /// List `dir`, directories first, hidden entries skipped.
    pub fn open(dir: &Path) -> Result<Self> {
        let mut entries = Vec::new();
        let listing =
            std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;
        for item in listing {
            let item = item?;
            let name = item.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let is_dir = item.file_type().map(|t| t.is_dir()).unwrap_or(false);
            entries.push(TreeEntry {
                path: item.path(),
                name,
                is_dir,
            });
        }
        entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
        if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
            entries.insert(
                0,
                TreeEntry {
                    path: parent.to_path_buf(),
                    name: "..".to_string(),
                    is_dir: true,
                },
            );
        }
        let rows = entries
            .iter()
            .map(|e| {
                if e.is_dir {
                    format!("{DIR_STYLE}{}/{RESET}", e.name)
                } else {
                    e.name.clone()
                }
            })
            .collect();
        tracing::debug!(target: "tree", dir = %dir.display(), entries = entries.len(), "tree_listed");
        Ok(Self {
            dir: dir.to_path_buf(),
            entries,
            rows,
            selected: 0,
            start: 0,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.selected)
    }

    pub fn selected(&self) -> Option<&TreeEntry> {
        self.entries.get(self.selected)
    }

    /// Select the entry for `path`, if listed.
    pub fn select_path(&mut self, path: &Path, visible_rows: usize) {
        if let Some(idx) = self.entries.iter().position(|e| e.path == path) {
            self.selected = idx;
            self.reveal(visible_rows);
        }
    }

    pub fn move_selection(&mut self, delta: isize, visible_rows: usize) {
        let last = self.entries.len().saturating_sub(1);
        self.selected = self.selected.saturating_add_signed(delta).min(last);
        self.reveal(visible_rows);
    }

    /// Adjust the first shown row so the selection is on screen.
    pub fn reveal(&mut self, visible_rows: usize) {
        let rows = visible_rows.max(1);
        if self.selected < self.start {
            self.start = self.selected;
        } else if self.selected >= self.start + rows {
            self.start = self.selected + 1 - rows;
        }
    }
}
