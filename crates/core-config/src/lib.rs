//! Configuration loading and parsing.
//!
//! Parses `viewer.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [layout]
//! left_pane_percent = 30.0
//! browser_visible = true
//! [view]
//! wrap = false
//! tab_stop = 8
//! [sticky]
//! enabled = true
//! max_headers = 0
//! [cache]
//! screen_lines_capacity = 16
//! ```
//!
//! Missing sections take defaults and unknown fields are ignored. A file that
//! fails to parse yields defaults and a `warn!`. The raw values are kept;
//! `Config::apply_context` derives the effective ones against the current
//! terminal geometry so a resize can re-derive them.

use anyhow::{Context, Result};
use core_model::layout::left_width_from_percent;
use core_model::sticky::max_headers_for;
use core_text::TAB_STOP;
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "viewer.toml";
const APP_DIR: &str = "oxview";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    pub viewport_columns: u16,
    pub viewport_rows: u16,
    pub status_rows: u16,
    pub help_rows: u16,
}

impl ConfigContext {
    pub fn new(
        viewport_columns: u16,
        viewport_rows: u16,
        status_rows: u16,
        help_rows: u16,
    ) -> Self {
        Self {
            viewport_columns,
            viewport_rows,
            status_rows,
            help_rows,
        }
    }

    /// Terminal size with the single status row and no help.
    pub fn from_terminal(columns: u16, rows: u16) -> Self {
        Self::new(columns, rows, 1, 0)
    }

    pub fn text_rows(&self) -> u16 {
        let reserved = self.status_rows.saturating_add(self.help_rows);
        self.viewport_rows.saturating_sub(reserved)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LayoutConfig {
    /// Tree pane width as a percentage; only values in (0, 100) are used.
    #[serde(default)]
    pub left_pane_percent: Option<f64>,
    #[serde(default = "LayoutConfig::default_browser_visible")]
    pub browser_visible: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            left_pane_percent: None,
            browser_visible: Self::default_browser_visible(),
        }
    }
}

impl LayoutConfig {
    const fn default_browser_visible() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    #[serde(default)]
    pub wrap: bool,
    #[serde(default = "ViewConfig::default_tab_stop")]
    pub tab_stop: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            wrap: false,
            tab_stop: Self::default_tab_stop(),
        }
    }
}

impl ViewConfig {
    const fn default_tab_stop() -> usize {
        TAB_STOP
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StickyConfig {
    #[serde(default = "StickyConfig::default_enabled")]
    pub enabled: bool,
    /// 0 derives the budget from the content rows.
    #[serde(default)]
    pub max_headers: u16,
}

impl Default for StickyConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            max_headers: 0,
        }
    }
}

impl StickyConfig {
    const fn default_enabled() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "CacheConfig::default_screen_lines_capacity")]
    pub screen_lines_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            screen_lines_capacity: Self::default_screen_lines_capacity(),
        }
    }
}

impl CacheConfig {
    const fn default_screen_lines_capacity() -> usize {
        16
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub sticky: StickyConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Values derived from the file and the terminal geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Effective {
    pub left_width: usize,
    /// `None` lets the frame derive the budget from its content rows.
    pub sticky_max_headers: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub path: Option<PathBuf>,
    pub file: ConfigFile, // parsed (or default) data
    pub effective: Effective,
}

/// Config path: `viewer.toml` in the working directory, else the platform
/// config dir (`<config_dir>/oxview/viewer.toml`).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join(APP_DIR).join(CONFIG_FILE_NAME);
    }
    local
}

/// Parse a config file's text.
pub fn parse(content: &str) -> Result<ConfigFile> {
    toml::from_str::<ConfigFile>(content).context("parsing viewer config")
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Load from `path` (or the discovered path). A missing file or a parse
/// failure yields defaults.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let content = match read(&path) {
        Ok(content) => content,
        Err(e) => {
            info!(target: "config", path = %path.display(), error = %e, "config_not_loaded");
            return Ok(Config::default());
        }
    };
    match parse(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                path: Some(path),
                file,
                effective: Effective::default(), // computed later
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %format!("{e:#}"), "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Derive effective values for the given terminal geometry.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> Effective {
        let columns = ctx.viewport_columns as usize;
        let percent = self.file.layout.left_pane_percent;
        if let Some(p) = percent.filter(|p| !(*p > 0.0 && *p < 100.0)) {
            info!(target: "config", left_pane_percent = p, "left_pane_percent_ignored");
        }
        let left_width = left_width_from_percent(columns, percent);

        let raw = self.file.sticky.max_headers as usize;
        let sticky_max_headers = if raw == 0 {
            None
        } else {
            let max = max_headers_for(ctx.text_rows() as usize);
            let clamped = raw.min(max);
            if clamped != raw {
                info!(
                    target: "config",
                    raw,
                    clamped,
                    text_rows = ctx.text_rows(),
                    viewport_rows = ctx.viewport_rows,
                    help_rows = ctx.help_rows,
                    "sticky_max_headers_clamped"
                );
            }
            Some(clamped)
        };

        if self.file.view.tab_stop != TAB_STOP {
            info!(target: "config", tab_stop = self.file.view.tab_stop, fixed = TAB_STOP, "tab_stop_ignored");
        }

        self.effective = Effective {
            left_width,
            sticky_max_headers,
        };
        self.effective
    }

    /// Re-derive on a resize. Returns the new values when they changed.
    pub fn recompute_with_context(&mut self, ctx: ConfigContext) -> Option<Effective> {
        let prev = self.effective;
        let current = self.apply_context(ctx);
        if current != prev { Some(current) } else { None }
    }

    pub fn screen_lines_capacity(&self) -> usize {
        self.file.cache.screen_lines_capacity
    }
}
