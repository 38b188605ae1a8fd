//! In-file content search over the display lines.

use core_text::{char_width, split_terminator, strip_ansi};

/// A hit: display line and 1-based character column in its plain text.
pub type Hit = (usize, usize);

#[derive(Debug, Default)]
pub struct SearchState {
    pub query: String,
    pub editing: bool,
    pub hits: Vec<Hit>,
    pub current: Option<usize>,
}

impl SearchState {
    pub fn editing() -> Self {
        Self {
            editing: true,
            ..Self::default()
        }
    }

    /// Recompute hits, making the first hit at or below `top` current.
    pub fn refresh(&mut self, lines: &[String], top: usize) {
        self.hits = find_hits(lines, &self.query);
        self.current = if self.hits.is_empty() {
            None
        } else {
            Some(self.hits.iter().position(|&(line, _)| line >= top).unwrap_or(0))
        };
    }

    pub fn current_hit(&self) -> Option<Hit> {
        self.current.and_then(|i| self.hits.get(i).copied())
    }

    /// Step to the next or previous hit, wrapping at either end.
    pub fn step(&mut self, forward: bool) -> Option<Hit> {
        let len = self.hits.len();
        if len == 0 {
            return None;
        }
        let next = match (self.current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.current = Some(next);
        self.hits.get(next).copied()
    }
}

/// Case-insensitive, non-overlapping matches of `query` in each line.
pub fn find_hits(lines: &[String], query: &str) -> Vec<Hit> {
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut hits = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let plain: Vec<char> = strip_ansi(split_terminator(line).0)
            .chars()
            .flat_map(char::to_lowercase)
            .collect();
        let mut col = 0;
        while col + needle.len() <= plain.len() {
            if plain[col..col + needle.len()] == needle[..] {
                hits.push((idx, col + 1));
                col += needle.len();
            } else {
                col += 1;
            }
        }
    }
    hits
}

/// Re-express a hit column relative to a view scrolled `horizontal` columns.
///
/// `None` when the hit starts left of the viewport.
pub fn viewport_column(line: &str, col: usize, horizontal: usize) -> Option<usize> {
    if horizontal == 0 {
        return Some(col);
    }
    let plain = strip_ansi(split_terminator(line).0);
    let mut width = 0;
    let mut skipped = 0;
    for ch in plain.chars() {
        let w = char_width(ch, width);
        if width + w > horizontal {
            break;
        }
        width += w;
        skipped += 1;
    }
    col.checked_sub(skipped).filter(|&c| c > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn hits_ignore_case_and_escapes() {
        let l = lines(&["\x1b[31mFoo\x1b[0m foo\n", "bar\n", "xfoofoo"]);
        assert_eq!(find_hits(&l, "FOO"), vec![(0, 1), (0, 5), (2, 2), (2, 5)]);
        assert!(find_hits(&l, "").is_empty());
    }

    #[test]
    fn refresh_prefers_hits_below_top() {
        let l = lines(&["ab", "x", "ab", "ab"]);
        let mut s = SearchState {
            query: "ab".into(),
            ..SearchState::default()
        };
        s.refresh(&l, 1);
        assert_eq!(s.current_hit(), Some((2, 1)));
        s.refresh(&l, 9);
        assert_eq!(s.current_hit(), Some((0, 1)));
    }

    #[test]
    fn step_wraps_both_ways() {
        let l = lines(&["ab", "ab"]);
        let mut s = SearchState {
            query: "ab".into(),
            ..SearchState::default()
        };
        s.refresh(&l, 0);
        assert_eq!(s.step(true), Some((1, 1)));
        assert_eq!(s.step(true), Some((0, 1)));
        assert_eq!(s.step(false), Some((1, 1)));
    }

    #[test]
    fn viewport_column_shifts_by_scrolled_chars() {
        assert_eq!(viewport_column("abcdef", 4, 0), Some(4));
        assert_eq!(viewport_column("abcdef", 4, 2), Some(2));
        assert_eq!(viewport_column("abcdef", 2, 2), None);
    }
}
