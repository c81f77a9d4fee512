use std::collections::BTreeMap;

use relative_path::RelativePathBuf;
use serde::Serialize;

use super::article::ArticleId;

/// Emphasis applied to a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
}

impl Style {
    pub const PLAIN: Style = Style {
        bold: false,
        italic: false,
    };

    pub fn is_plain(self) -> bool {
        self == Self::PLAIN
    }

    pub fn with_bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub fn with_italic(self) -> Self {
        Self {
            italic: true,
            ..self
        }
    }
}

/// Target of a link run.
///
/// `Reference` holds the raw in-corpus reference text as parsed; the graph
/// builder rewrites it into `Article` or `Asset` in its output documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Link {
    Url(String),
    Reference(String),
    Article(ArticleId),
    Asset(RelativePathBuf),
}

impl Link {
    /// Splits raw link targets into external URLs and in-corpus references.
    ///
    /// Anything with a URI scheme or starting with `#` is external.
    pub fn classify(target: &str) -> Link {
        let target = target.trim();
        if target.starts_with('#') || has_scheme(target) {
            Link::Url(target.to_string())
        } else {
            Link::Reference(target.to_string())
        }
    }

    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Link::Reference(r) => Some(r),
            _ => None,
        }
    }
}

fn has_scheme(s: &str) -> bool {
    let Some(colon) = s.find(':') else {
        return false;
    };
    let scheme = &s[..colon];
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Marks a run that a post-pass must still rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "marker", rename_all = "snake_case")]
pub enum RunMarker {
    /// `[^label]`; the run text is replaced by the superscript label.
    FootnoteRef { label: String },
    /// `![caption](url)`; the run text is the caption.
    Image { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub style: Style,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<RunMarker>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, Style::PLAIN)
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
            link: None,
            marker: None,
        }
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }

    pub fn with_marker(mut self, marker: RunMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    fn merges_with(&self, other: &TextRun) -> bool {
        self.marker.is_none()
            && other.marker.is_none()
            && self.style == other.style
            && self.link == other.link
    }
}

/// Drops empty runs and joins neighbours with identical style and link.
///
/// Marker runs are never merged; they stand for a single construct.
pub fn merge_runs(runs: Vec<TextRun>) -> Vec<TextRun> {
    let mut out: Vec<TextRun> = Vec::with_capacity(runs.len());
    for run in runs {
        if run.text.is_empty() && run.marker.is_none() {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.merges_with(&run) => last.text.push_str(&run.text),
            _ => out.push(run),
        }
    }
    out
}

pub fn plain_text(runs: &[TextRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// A blockquote at one nesting depth.
///
/// `lines` are the quote's own lines in order; deeper quotes opened while
/// this one was open are owned in `children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub depth: u8,
    pub lines: Vec<Vec<TextRun>>,
    pub children: Vec<Block>,
}

impl Quote {
    pub fn new(depth: u8) -> Self {
        Self {
            depth,
            lines: vec![],
            children: vec![],
        }
    }

    /// Direct lines joined with newlines, as a single run sequence.
    pub fn runs(&self) -> Vec<TextRun> {
        let mut runs = vec![];
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                runs.push(TextRun::plain("\n"));
            }
            runs.extend(line.iter().cloned());
        }
        merge_runs(runs)
    }

    /// True when every direct line is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.lines
            .iter()
            .all(|line| plain_text(line).trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        runs: Vec<TextRun>,
    },
    Paragraph {
        runs: Vec<TextRun>,
    },
    Quote(Quote),
    /// A quote with no visible text, kept so the target still shows a quote.
    EmptyQuotePlaceholder(Quote),
    ListItem {
        kind: ListKind,
        runs: Vec<TextRun>,
        indent_level: usize,
    },
    CodeBlock {
        language: Option<String>,
        text: String,
    },
    ImageEmbed {
        url: String,
        caption: Vec<TextRun>,
    },
    Table {
        header: Vec<Vec<TextRun>>,
        rows: Vec<Vec<Vec<TextRun>>>,
    },
    Divider,
    /// Only present between building and footnote normalisation.
    FootnoteDefinition {
        label: String,
        text: String,
    },
}

impl Block {
    pub fn paragraph(runs: Vec<TextRun>) -> Self {
        Block::Paragraph {
            runs: merge_runs(runs),
        }
    }

    pub fn empty_quote(depth: u8, children: Vec<Block>) -> Self {
        Block::EmptyQuotePlaceholder(Quote {
            depth,
            lines: vec![vec![TextRun::plain(" ")]],
            children,
        })
    }

    /// Plain text of this block's own runs, without nested blocks.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading { runs, .. }
            | Block::Paragraph { runs }
            | Block::ListItem { runs, .. } => plain_text(runs),
            Block::Quote(q) | Block::EmptyQuotePlaceholder(q) => plain_text(&q.runs()),
            Block::CodeBlock { text, .. } => text.clone(),
            Block::ImageEmbed { caption, .. } => plain_text(caption),
            Block::Table { header, rows } => std::iter::once(header)
                .chain(rows.iter())
                .map(|row| {
                    row.iter()
                        .map(|cell| plain_text(cell))
                        .collect::<Vec<_>>()
                        .join("\t")
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Divider => String::new(),
            Block::FootnoteDefinition { text, .. } => text.clone(),
        }
    }

    /// Visits every run sequence in this block and its nested blocks.
    pub fn visit_runs<'a>(&'a self, f: &mut impl FnMut(&'a [TextRun])) {
        match self {
            Block::Heading { runs, .. }
            | Block::Paragraph { runs }
            | Block::ListItem { runs, .. } => f(runs),
            Block::Quote(q) | Block::EmptyQuotePlaceholder(q) => {
                for line in &q.lines {
                    f(line);
                }
                for child in &q.children {
                    child.visit_runs(f);
                }
            }
            Block::ImageEmbed { caption, .. } => f(caption),
            Block::Table { header, rows } => {
                for cell in header.iter().chain(rows.iter().flatten()) {
                    f(cell);
                }
            }
            Block::CodeBlock { .. } | Block::Divider | Block::FootnoteDefinition { .. } => {}
        }
    }

    pub fn visit_runs_mut(&mut self, f: &mut impl FnMut(&mut Vec<TextRun>)) {
        match self {
            Block::Heading { runs, .. }
            | Block::Paragraph { runs }
            | Block::ListItem { runs, .. } => f(runs),
            Block::Quote(q) | Block::EmptyQuotePlaceholder(q) => {
                for line in &mut q.lines {
                    f(line);
                }
                for child in &mut q.children {
                    child.visit_runs_mut(f);
                }
            }
            Block::ImageEmbed { caption, .. } => f(caption),
            Block::Table { header, rows } => {
                for cell in header.iter_mut().chain(rows.iter_mut().flatten()) {
                    f(cell);
                }
            }
            Block::CodeBlock { .. } | Block::Divider | Block::FootnoteDefinition { .. } => {}
        }
    }
}

/// Footnote label to definition text, as removed from the block flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Footnotes(BTreeMap<String, String>);

impl Footnotes {
    pub fn insert(&mut self, label: impl Into<String>, text: impl Into<String>) {
        self.0.insert(label.into(), text.into());
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0.get(label).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Definitions ordered numerically where labels are numbers, then by text.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self
            .0
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_by_key(|(label, _)| (label.parse::<u64>().unwrap_or(u64::MAX), *label));
        entries
    }
}

/// The converted form of one article body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Every link attached to a run anywhere in the tree, in document order.
    pub fn links(&self) -> Vec<&Link> {
        let mut links = vec![];
        for block in &self.blocks {
            block.visit_runs(&mut |runs| {
                links.extend(runs.iter().filter_map(|r| r.link.as_ref()));
            });
        }
        links
    }

    /// Raw in-corpus reference strings, deduplicated in first-seen order.
    pub fn references(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for reference in self.links().into_iter().filter_map(Link::as_reference) {
            if !seen.contains(&reference) {
                seen.push(reference);
            }
        }
        seen
    }

    /// Copy of the document with a trailing footnote section.
    pub fn with_footnote_appendix(&self, footnotes: &Footnotes) -> Document {
        let mut blocks = self.blocks.clone();
        if footnotes.is_empty() {
            return Document { blocks };
        }
        blocks.push(Block::Divider);
        blocks.push(Block::Heading {
            level: 3,
            runs: vec![TextRun::plain("Footnotes")],
        });
        for (label, text) in footnotes.sorted() {
            blocks.push(Block::paragraph(vec![TextRun::plain(format!(
                "[{label}] {text}"
            ))]));
        }
        Document { blocks }
    }
}
