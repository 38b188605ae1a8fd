//! Frame composition for the pager: tree pane, source pane, sticky headers,
//! help rows and status line emitted as a single byte stream.
//!
//! Every draw is a full redraw; there is no retained diff against the
//! previous frame. Callers decide when a frame is dirty and call
//! `compose_frame` (or `render_frame`) once per loop iteration.
//!
//! Invariants:
//! - A frame starts with `ESC[H ESC[J` and uses CRLF row terminators.
//! - No row's visible width exceeds its pane; cells are clipped with the
//!   ANSI-aware line operations of `core-text` and padded to width.
//! - Styles never leak: a styled cell is followed by `ESC[0m`.
//! - The status line never exceeds `width - 1` columns and the hint keeps
//!   priority over the left text.
//!
//! Exposed Components:
//! - `frame`: `FrameInput` / `FrameComposer`, the per-frame assembly.
//! - `status`: two-stage status segment pipeline and hint fitting.
//! - `sticky_rows`: underlined sticky header rows.
//! - `highlight`: search-hit and selection overlays on styled rows.
//! - `picker`: command / symbol picker rows drawn over the tree pane.
//! - `help`: help panel row sets and the modal help page.
//! - `writer`: single-buffer frame writer.

pub mod frame;
pub mod help;
pub mod highlight;
pub mod picker;
pub mod status;
pub mod sticky_rows;
pub mod writer;

pub use frame::{
    FrameComposer, FrameInput, LeftPane, SearchHighlight, StatusInput, StickyInput, TreeRows,
    ViewFlags, compose_frame, last_compose_ns, render_frame,
};
pub use help::{HelpMode, render_help_page};
pub use picker::{PickerFocus, PickerMode, PickerView};
pub use status::DEFAULT_HINT;
pub use writer::Writer;
