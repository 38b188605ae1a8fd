//! Terminal text metrics and ANSI-aware line shaping.
//!
//! Layers (leaves first):
//! - `width`: per-character terminal column width (`char_width`).
//! - `ansi`: escape-sequence scanner and tokenizer (`match_escape`, `Tokens`).
//! - `line_ops`: `clip`, `slice`, `wrap` and screen-line splitting built on
//!   the two layers above.
//!
//! Everything here is pure and total over its input domain: malformed escape
//! sequences become literal text, unknown code points are one column wide and
//! out-of-range widths collapse to empty output.

pub mod ansi;
pub mod line_ops;
pub mod width;

pub use ansi::{EscapeKind, EscapeSeq, SGR_RESET, Token, Tokens, has_escape, strip_ansi, tokens};
pub use line_ops::{
    build_screen_lines, clip, display_width, has_line_terminator, slice, split_lines_keep_ends,
    split_terminator, wrap,
};
pub use width::{TAB_STOP, char_width, plain_width};
