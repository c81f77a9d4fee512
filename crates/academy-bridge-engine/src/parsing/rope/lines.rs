use xi_rope::Rope;

use super::span::Span;

/// One physical line of an article body.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// 1-based line number, used when reporting diagnostics.
    pub number: usize,
    /// Byte span in the rope, newline included.
    pub span: Span,
    pub text: String,
}

impl LineRef {
    /// Line text without its trailing newline.
    pub fn content(&self) -> &str {
        self.text.trim_end_matches(['\r', '\n'])
    }
}

/// Iterates the rope's lines, keeping newlines so spans stay contiguous.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).enumerate().map(move |(idx, line)| {
        let start = offset;
        offset += line.len();
        LineRef {
            number: idx + 1,
            span: Span { start, end: offset },
            text: line.into_owned(),
        }
    })
}
