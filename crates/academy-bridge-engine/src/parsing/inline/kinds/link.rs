use std::ops::Range;

/// `[label](target)`, `![caption](url)` and `[^label]` syntax.
pub struct LinkSyntax;

/// Byte ranges of a complete link starting at a `[`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan {
    pub label: Range<usize>,
    pub target: Range<usize>,
    /// Exclusive end, just past the closing `)`.
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkParse {
    NotALink,
    /// `[label](` with no closing parenthesis.
    Unclosed,
    Link(LinkSpan),
}

impl LinkSyntax {
    pub const OPEN: u8 = b'[';
    pub const CLOSE: u8 = b']';
    pub const TARGET_OPEN: u8 = b'(';
    pub const TARGET_CLOSE: u8 = b')';
    pub const IMAGE: &'static [u8] = b"![";
    pub const FOOTNOTE: &'static [u8] = b"[^";
    pub const ESCAPE: u8 = b'\\';

    /// Parses a link whose label opens at `open`.
    pub fn parse_at(s: &str, open: usize) -> LinkParse {
        let b = s.as_bytes();
        if b.get(open) != Some(&Self::OPEN) {
            return LinkParse::NotALink;
        }
        let Some(close) = Self::matching(b, open, Self::OPEN, Self::CLOSE) else {
            return LinkParse::NotALink;
        };
        if b.get(close + 1) != Some(&Self::TARGET_OPEN) {
            return LinkParse::NotALink;
        }
        let Some(paren) = Self::matching(b, close + 1, Self::TARGET_OPEN, Self::TARGET_CLOSE)
        else {
            return LinkParse::Unclosed;
        };
        LinkParse::Link(LinkSpan {
            label: open + 1..close,
            target: close + 2..paren,
            end: paren + 1,
        })
    }

    /// `[^label]` footnote reference at `open`: returns (label range, end).
    pub fn footnote_at(s: &str, open: usize) -> Option<(Range<usize>, usize)> {
        let b = s.as_bytes();
        if !b.get(open..)?.starts_with(Self::FOOTNOTE) {
            return None;
        }
        let start = open + Self::FOOTNOTE.len();
        let len = b[start..]
            .iter()
            .take_while(|c| **c != Self::CLOSE && !c.is_ascii_whitespace())
            .count();
        if len == 0 || b.get(start + len) != Some(&Self::CLOSE) {
            return None;
        }
        Some((start..start + len, start + len + 1))
    }

    /// Drops angle brackets and an optional `"title"` from a raw target.
    pub fn clean_target(raw: &str) -> &str {
        let t = raw.trim();
        if let Some(inner) = t.strip_prefix('<')
            && let Some(end) = inner.find('>')
        {
            return &inner[..end];
        }
        t.split_whitespace().next().unwrap_or("")
    }

    /// Index of the byte closing the group opened at `open`, honouring
    /// nesting and backslash escapes.
    fn matching(b: &[u8], open: usize, o: u8, c: u8) -> Option<usize> {
        let mut depth = 0usize;
        let mut j = open;
        while j < b.len() {
            match b[j] {
                Self::ESCAPE => {
                    j += 2;
                    continue;
                }
                x if x == o => depth += 1,
                x if x == c => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(j);
                    }
                }
                _ => {}
            }
            j += 1;
        }
        None
    }
}
