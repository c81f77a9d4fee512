use crate::parsing::rope::{lines::LineRef, lines_with_spans};

use super::{
    kinds::{
        BlockQuote, CodeFence, FenceKind, FootnoteDefinition, Heading, ListItem, Table,
        ThematicBreak,
    },
    types::{LexedLine, LineGroup},
};

/// Splits an article body into typed line groups.
///
/// The only state carried between lines is whether a code fence is open;
/// fence contents are raw and skip every other rule.
#[derive(Debug, Default)]
pub struct MarkdownLineClassifier {
    fence: Option<FenceKind>,
}

impl MarkdownLineClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies one line. Order matters: blank, fence, quote, heading,
    /// footnote definition, thematic break, table, list, plain.
    pub fn classify(&mut self, lr: &LineRef) -> LexedLine {
        LexedLine {
            number: lr.number,
            span: lr.span,
            group: self.group_of(lr.content()),
        }
    }

    fn group_of(&mut self, line: &str) -> LineGroup {
        if let Some(kind) = self.fence {
            if CodeFence::closes(kind, line) {
                self.fence = None;
                return LineGroup::CodeFenceClose;
            }
            return LineGroup::CodeFenceLine(line.to_string());
        }

        if line.trim().is_empty() {
            return LineGroup::BlankLine;
        }

        if let Some(kind) = CodeFence::sig(line) {
            self.fence = Some(kind);
            return LineGroup::CodeFenceOpen {
                language: CodeFence::language(line),
            };
        }

        let (depth, idx) = BlockQuote::strip_prefixes(line);
        if depth > 0 {
            return LineGroup::QuoteLine {
                depth,
                text: line[idx..].trim().to_string(),
            };
        }

        if let Some((level, text)) = Heading::parse(line) {
            return LineGroup::Heading {
                level,
                text: text.to_string(),
            };
        }

        if let Some((label, text)) = FootnoteDefinition::parse(line) {
            return LineGroup::FootnoteDef {
                label: label.to_string(),
                text: text.to_string(),
            };
        }

        if ThematicBreak::matches(line) {
            return LineGroup::ThematicBreak;
        }

        if Table::is_row(line) {
            return LineGroup::TableLine(line.trim().to_string());
        }

        if let Some((kind, indent, text)) = ListItem::parse(line) {
            return LineGroup::ListLine {
                kind,
                indent,
                text: text.to_string(),
            };
        }

        LineGroup::PlainLine {
            indent: ListItem::indent_of(line),
            text: line.trim().to_string(),
        }
    }
}

/// Classifies every line of `rope`.
pub fn lex(rope: &xi_rope::Rope) -> Vec<LexedLine> {
    let mut classifier = MarkdownLineClassifier::new();
    lines_with_spans(rope)
        .map(|lr| classifier.classify(&lr))
        .collect()
}
