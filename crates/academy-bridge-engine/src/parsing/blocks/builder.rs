use xi_rope::Rope;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::models::{Block, ListKind, TextRun, merge_runs};
use crate::parsing::inline::{InlineIssue, parse_rich_text_with};
use crate::parsing::rope::{Span, preview};

use super::{
    containers::{ListStack, QuoteStack},
    kinds::Table,
    types::{LexedLine, LineGroup},
};

#[derive(Debug)]
enum LeafState {
    None,
    Paragraph {
        runs: Vec<TextRun>,
    },
    Fence {
        language: Option<String>,
        lines: Vec<String>,
        opened_at: usize,
        opening: Span,
    },
    Table {
        lines: Vec<(usize, String)>,
    },
}

/// Builds the block tree from lexed lines.
///
/// Inline parsing happens here, line by line, so every malformed-syntax
/// issue is reported with the line it came from.
pub struct BlockBuilder {
    leaf: LeafState,
    quotes: QuoteStack,
    lists: ListStack,
    /// Index in `out` of the list item an indented plain line continues.
    open_item: Option<usize>,
    out: Vec<Block>,
    diagnostics: Diagnostics,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            leaf: LeafState::None,
            quotes: QuoteStack::default(),
            lists: ListStack::default(),
            open_item: None,
            out: vec![],
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn push(&mut self, line: &LexedLine) {
        match &line.group {
            LineGroup::CodeFenceLine(text) => {
                if let LeafState::Fence { lines, .. } = &mut self.leaf {
                    lines.push(text.clone());
                }
            }
            LineGroup::CodeFenceClose => self.flush_leaf(),
            LineGroup::CodeFenceOpen { language } => {
                self.close_all();
                self.leaf = LeafState::Fence {
                    language: language.clone(),
                    lines: vec![],
                    opened_at: line.number,
                    opening: line.span,
                };
            }
            LineGroup::BlankLine => self.close_all(),
            LineGroup::QuoteLine { depth, text } => {
                self.flush_leaf();
                self.close_list();
                let runs = self.inline(text, line.number);
                self.quotes.push_line(*depth, runs, &mut self.out);
            }
            LineGroup::Heading { level, text } => {
                self.close_all();
                let runs = self.inline(text, line.number);
                self.out.push(Block::Heading {
                    level: *level,
                    runs,
                });
            }
            LineGroup::ListLine { kind, indent, text } => {
                self.flush_leaf();
                self.quotes.close_all(&mut self.out);
                self.push_list_item(*kind, *indent, text, line.number);
            }
            LineGroup::PlainLine { indent, text } => {
                if *indent > 0 && self.continue_list_item(text, line.number) {
                    return;
                }
                if !matches!(self.leaf, LeafState::Paragraph { .. }) {
                    self.flush_leaf();
                }
                self.quotes.close_all(&mut self.out);
                self.close_list();
                self.extend_paragraph(text, line.number);
            }
            LineGroup::TableLine(text) => {
                if !matches!(self.leaf, LeafState::Table { .. }) {
                    self.flush_leaf();
                }
                self.quotes.close_all(&mut self.out);
                self.close_list();
                match &mut self.leaf {
                    LeafState::Table { lines } => lines.push((line.number, text.clone())),
                    _ => {
                        self.leaf = LeafState::Table {
                            lines: vec![(line.number, text.clone())],
                        }
                    }
                }
            }
            LineGroup::ThematicBreak => {
                self.close_all();
                self.out.push(Block::Divider);
            }
            LineGroup::FootnoteDef { label, text } => {
                self.close_all();
                self.out.push(Block::FootnoteDefinition {
                    label: label.clone(),
                    text: text.clone(),
                });
            }
        }
    }

    /// Closes everything still open. `rope` is the body the lines came from.
    pub fn finish(mut self, rope: &Rope) -> (Vec<Block>, Diagnostics) {
        if let LeafState::Fence {
            opened_at, opening, ..
        } = &self.leaf
        {
            self.diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::MalformedMarkdown,
                    format!("unterminated code fence: {}", preview(rope, *opening, 40)),
                )
                .at_line(*opened_at),
            );
        }
        self.close_all();
        (self.out, self.diagnostics)
    }

    fn inline(&mut self, text: &str, line: usize) -> Vec<TextRun> {
        let mut issues: Vec<InlineIssue> = vec![];
        let runs = parse_rich_text_with(text, &mut issues);
        for issue in issues {
            self.diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::MalformedMarkdown,
                    format!("{}: {}", issue.message, issue.text),
                )
                .at_line(line),
            );
        }
        runs
    }

    fn push_list_item(&mut self, kind: ListKind, indent: usize, text: &str, line: usize) {
        let indent_level = self.lists.depth_for(indent);
        let runs = self.inline(text, line);
        self.out.push(Block::ListItem {
            kind,
            runs,
            indent_level,
        });
        self.open_item = Some(self.out.len() - 1);
    }

    /// Appends an indented line to the list item directly above it.
    fn continue_list_item(&mut self, text: &str, line: usize) -> bool {
        let Some(idx) = self.open_item else {
            return false;
        };
        let more = self.inline(text, line);
        let Some(Block::ListItem { runs, .. }) = self.out.get_mut(idx) else {
            return false;
        };
        let mut joined = std::mem::take(runs);
        if !joined.is_empty() {
            joined.push(TextRun::plain(" "));
        }
        joined.extend(more);
        *runs = merge_runs(joined);
        true
    }

    fn extend_paragraph(&mut self, text: &str, line: usize) {
        let more = self.inline(text, line);
        match &mut self.leaf {
            LeafState::Paragraph { runs } => {
                runs.push(TextRun::plain(" "));
                runs.extend(more);
            }
            _ => self.leaf = LeafState::Paragraph { runs: more },
        }
    }

    fn close_list(&mut self) {
        self.open_item = None;
        self.lists.reset();
    }

    fn close_all(&mut self) {
        self.flush_leaf();
        self.quotes.close_all(&mut self.out);
        self.close_list();
    }

    fn flush_leaf(&mut self) {
        match std::mem::replace(&mut self.leaf, LeafState::None) {
            LeafState::None => {}
            LeafState::Paragraph { runs } => {
                let runs = merge_runs(runs);
                if !runs.is_empty() {
                    self.out.push(Block::Paragraph { runs });
                }
            }
            LeafState::Fence {
                language, lines, ..
            } => self.out.push(Block::CodeBlock {
                language,
                text: lines.join("\n"),
            }),
            LeafState::Table { lines } => self.flush_table(lines),
        }
    }

    fn flush_table(&mut self, lines: Vec<(usize, String)>) {
        if lines.len() < 2 {
            for (number, text) in lines {
                let runs = self.inline(&text, number);
                self.out.push(Block::paragraph(runs));
            }
            return;
        }

        let mut rows = lines.into_iter().filter(|(_, l)| !Table::is_separator(l));
        let Some((header_line, header_text)) = rows.next() else {
            return;
        };
        let header: Vec<_> = Table::cells(&header_text)
            .iter()
            .map(|cell| self.inline(cell, header_line))
            .collect();
        let width = header.len();

        let body: Vec<(usize, String)> = rows.collect();
        let mut table_rows = Vec::with_capacity(body.len());
        for (number, text) in body {
            let mut cells: Vec<_> = Table::cells(&text)
                .iter()
                .map(|cell| self.inline(cell, number))
                .collect();
            cells.resize_with(width, Vec::new);
            table_rows.push(cells);
        }

        self.out.push(Block::Table {
            header,
            rows: table_rows,
        });
    }
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}
