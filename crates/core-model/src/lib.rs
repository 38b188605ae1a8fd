//! Viewer model: line-index mapping, sticky scopes, scroll state, selection
//! and pane geometry.
//!
//! Three index spaces meet here:
//! * display lines (0-based rows of the built screen-line list),
//! * logical lines (a wrapped run up to its terminator; removed diff lines
//!   included),
//! * source lines (1-based lines of the working file; removed diff lines
//!   excluded).
//!
//! `LineMap` is the single authority for converting between them. Everything
//! else in this crate (`ScrollModel`, the sticky tracker, status ranges)
//! goes through it rather than re-deriving terminator or diff-marker rules.
//!
//! Ownership:
//! * Display lines are owned by `ScrollModel` as a shared `Arc<Vec<String>>`
//!   so a caller-owned `ScreenLineCache` can hand the same block back after a
//!   wrap toggle or resize without copying.
//! * `SymbolEntry` lists belong to the symbol extractor; sticky chains only
//!   borrow them.
//! * Selection endpoints and scroll offsets live in caller state and are
//!   only mutated through the pure functions and methods here.
//!
//! Nothing in this crate performs terminal I/O. The only file access is
//! `sticky::read_scope_source`, used for diff-annotated blocks whose own
//! lines carry synthetic markers.

pub mod layout;
pub mod line_cache;
pub mod line_map;
pub mod scroll;
pub mod selection;
pub mod sticky;
pub mod symbol;

pub use layout::{Layout, LayoutRegion};
pub use line_cache::{ScreenLineCache, ScreenLineKey, ScreenLines};
pub use line_map::{DiffFormat, LineMap, SourceText};
pub use scroll::{ChangeJump, ScrollModel};
pub use selection::{SelectionPoint, SelectionRange};
pub use sticky::{StickyChain, sticky_headers};
pub use symbol::{SymbolEntry, SymbolKind};
