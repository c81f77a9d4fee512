use crate::models::ListKind;
use crate::parsing::rope::span::Span;

/// Structural kind of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineGroup {
    Heading {
        level: u8,
        text: String,
    },
    /// `depth` counts the leading `>` markers. An empty `text` is still a
    /// quote line, never a blank one.
    QuoteLine {
        depth: u8,
        text: String,
    },
    ListLine {
        kind: ListKind,
        indent: usize,
        text: String,
    },
    CodeFenceOpen {
        language: Option<String>,
    },
    CodeFenceLine(String),
    CodeFenceClose,
    TableLine(String),
    ThematicBreak,
    FootnoteDef {
        label: String,
        text: String,
    },
    BlankLine,
    PlainLine {
        indent: usize,
        text: String,
    },
}

/// A classified line with its source position.
#[derive(Debug, Clone)]
pub struct LexedLine {
    pub number: usize,
    pub span: Span,
    pub group: LineGroup,
}
