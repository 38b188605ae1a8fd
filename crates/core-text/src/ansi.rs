//! ANSI / CSI escape sequence scanner.
//!
//! Recognizes sequences of the shape
//!
//! ```text
//! ESC '[' [0-9;?]* [\x20-\x2F]* [\x40-\x7E]
//!          params   intermediates  final
//! ```
//!
//! with an explicit three-state walk over bytes instead of a regex engine.
//! Every byte of a matched sequence is ASCII, so matched ranges always fall on
//! UTF-8 boundaries and can be sliced out of the source `&str` verbatim.
//!
//! Progress guarantee: when `match_escape` reports no match at `pos`, callers
//! treat the byte there (even a lone ESC) as ordinary text and advance past
//! it. `Tokens` does exactly that, so malformed input is never fatal and
//! never loops.
//!
//! Only SGR sequences (final byte `m`) carry style; other CSI sequences
//! (cursor movement, erase) are copied through but never replayed.

use std::borrow::Cow;

pub const ESC: char = '\x1b';
pub const SGR_RESET: &str = "\x1b[0m";

const ESC_BYTE: u8 = 0x1b;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeKind {
    /// Select Graphic Rendition (`…m`).
    Sgr,
    /// Any other CSI sequence.
    Csi,
}

/// A matched escape sequence borrowed from the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeSeq<'a> {
    pub text: &'a str,
    pub kind: EscapeKind,
}

impl<'a> EscapeSeq<'a> {
    #[inline]
    pub fn is_sgr(&self) -> bool {
        self.kind == EscapeKind::Sgr
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Parameter bytes of an SGR sequence (`"1;34"` for `ESC[1;34m`).
    pub fn sgr_params(&self) -> Option<&'a str> {
        if !self.is_sgr() {
            return None;
        }
        Some(&self.text[2..self.text.len() - 1])
    }
}

/// Try to match one escape sequence starting at byte offset `pos`.
pub fn match_escape(text: &str, pos: usize) -> Option<EscapeSeq<'_>> {
    let bytes = text.as_bytes();
    if bytes.get(pos) != Some(&ESC_BYTE) || bytes.get(pos + 1) != Some(&b'[') {
        return None;
    }
    let mut i = pos + 2;
    // params
    while let Some(&b) = bytes.get(i) {
        if b.is_ascii_digit() || b == b';' || b == b'?' {
            i += 1;
        } else {
            break;
        }
    }
    // intermediates
    while matches!(bytes.get(i), Some(0x20..=0x2F)) {
        i += 1;
    }
    match bytes.get(i) {
        Some(&b) if (0x40..=0x7E).contains(&b) => Some(EscapeSeq {
            text: &text[pos..=i],
            kind: if b == b'm' {
                EscapeKind::Sgr
            } else {
                EscapeKind::Csi
            },
        }),
        _ => None,
    }
}

/// One lexical unit of a styled line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Escape(EscapeSeq<'a>),
    Char(char),
}

/// Left-to-right tokenizer over a styled line.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Byte offset of the next token.
    #[inline]
    pub fn byte_pos(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.text.get(self.pos..)?;
        if rest.as_bytes().first() == Some(&ESC_BYTE) {
            if let Some(seq) = match_escape(self.text, self.pos) {
                self.pos += seq.len();
                return Some(Token::Escape(seq));
            }
        }
        let ch = rest.chars().next()?;
        self.pos += ch.len_utf8();
        Some(Token::Char(ch))
    }
}

#[inline]
pub fn tokens(text: &str) -> Tokens<'_> {
    Tokens::new(text)
}

#[inline]
pub fn has_escape(text: &str) -> bool {
    text.contains(ESC)
}

/// Remove every recognized escape sequence, keeping unmatched ESC bytes.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    if !has_escape(text) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for tok in tokens(text) {
        if let Token::Char(ch) = tok {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}
