//! Frame buffer writer.
//!
//! Every draw is accumulated into one `String` and handed to the output in a
//! single `write_all` followed by one flush. Cursor commands are encoded with
//! crossterm's ANSI writers so positioning matches what the terminal backend
//! would emit.
//!
//! Invariants:
//! * Commands preserve ordering; nothing reaches the output before `flush_to`.
//! * Positions are absolute, 0-based; `(0, 0)` is encoded as `ESC[1;1H`.
//! * The writer owns no global state; it is a short-lived object per frame.

use std::io::Write;

use anyhow::Result;
use crossterm::Command;
use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};

pub const CRLF: &str = "\r\n";
const CURSOR_HOME: &str = "\x1b[H";

#[derive(Debug, Default)]
pub struct Writer {
    buf: String,
}

fn to_u16(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

impl Writer {
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            buf: String::with_capacity(bytes),
        }
    }

    /// Cursor home followed by erase-below (`ESC[H ESC[J`).
    pub fn clear_screen(&mut self) {
        self.buf.push_str(CURSOR_HOME);
        // writing into a String cannot fail
        let _ = Clear(ClearType::FromCursorDown).write_ansi(&mut self.buf);
    }

    pub fn move_to(&mut self, x: usize, y: usize) {
        let _ = MoveTo(to_u16(x), to_u16(y)).write_ansi(&mut self.buf);
    }

    #[inline]
    pub fn print(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    pub fn pad(&mut self, cols: usize) {
        self.buf.extend(std::iter::repeat_n(' ', cols));
    }

    #[inline]
    pub fn end_row(&mut self) {
        self.buf.push_str(CRLF);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    /// Write the whole frame with one `write_all`, then flush.
    pub fn flush_to<W: Write>(self, out: &mut W) -> Result<()> {
        out.write_all(self.buf.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
