//! Recoverable problems found while converting and linking articles.
//!
//! Nothing here aborts a run: each problem is recorded with the article it
//! came from and processing continues.

use std::fmt;

use serde::Serialize;

use crate::models::ArticleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DiagnosticKind {
    /// Syntax that could not be parsed; the literal text was kept.
    MalformedMarkdown,
    /// A reference that does not name an article in the corpus.
    BrokenReference,
    /// `[^n]` with no `[^n]:` definition; the superscript is still emitted.
    MissingFootnoteDefinition,
    /// Image syntax with a non-image target; kept as an ordinary link.
    UnsupportedImageExtension,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::MissingFootnoteDefinition
            | DiagnosticKind::UnsupportedImageExtension => Severity::Warning,
            DiagnosticKind::MalformedMarkdown | DiagnosticKind::BrokenReference => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Diagnostic {
    pub article: Option<ArticleId>,
    pub kind: DiagnosticKind,
    /// The offending source text.
    pub text: String,
    /// 1-based body line, when known.
    pub line: Option<usize>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, text: impl Into<String>) -> Self {
        Self {
            article: None,
            kind,
            text: text.into(),
            line: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn for_article(mut self, article: &ArticleId) -> Self {
        self.article = Some(article.clone());
        self
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity() {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{severity}: {:?}", self.kind)?;
        if let Some(article) = &self.article {
            write!(f, " in {article}")?;
        }
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        write!(f, ": {}", self.text)
    }
}

/// Ordered collection of diagnostics returned beside every output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    /// Logs errors at `warn` and warnings at `debug`.
    pub fn log(&self) {
        for diagnostic in &self.0 {
            match diagnostic.severity() {
                Severity::Error => log::warn!("{diagnostic}"),
                Severity::Warning => log::debug!("{diagnostic}"),
            }
        }
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    /// Sets the article on every diagnostic that has none yet.
    pub fn attribute_to(&mut self, article: &ArticleId) {
        for d in self.0.iter_mut().filter(|d| d.article.is_none()) {
            d.article = Some(article.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.0.iter().filter(|d| d.kind == kind).count()
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(|d| d.severity() == Severity::Error)
    }

    pub fn sort(&mut self) {
        self.0.sort();
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_by_kind() {
        assert_eq!(DiagnosticKind::MalformedMarkdown.severity(), Severity::Error);
        assert_eq!(DiagnosticKind::BrokenReference.severity(), Severity::Error);
        assert_eq!(
            DiagnosticKind::MissingFootnoteDefinition.severity(),
            Severity::Warning
        );
        assert_eq!(
            DiagnosticKind::UnsupportedImageExtension.severity(),
            Severity::Warning
        );
    }

    #[test]
    fn test_attribute_keeps_existing_article() {
        let other = ArticleId::from("intro/ta-intro");
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::new(DiagnosticKind::BrokenReference, "../x"));
        diags.push(Diagnostic::new(DiagnosticKind::BrokenReference, "../y").for_article(&other));

        let id = ArticleId::from("translate/figs-metaphor");
        diags.attribute_to(&id);

        let articles: Vec<_> = diags.iter().map(|d| d.article.clone()).collect();
        assert_eq!(articles, vec![Some(id), Some(other)]);
        assert!(diags.has_errors());
    }

    #[test]
    fn test_warnings_only_is_not_error() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::new(DiagnosticKind::MissingFootnoteDefinition, "[^3]"));
        assert!(!diags.has_errors());
        assert_eq!(diags.count(DiagnosticKind::MissingFootnoteDefinition), 1);
    }

    #[test]
    fn test_display() {
        let d = Diagnostic::new(DiagnosticKind::BrokenReference, "../nonexistent")
            .for_article(&ArticleId::from("translate/figs-metaphor"))
            .at_line(4);
        assert_eq!(
            d.to_string(),
            "error: BrokenReference in translate/figs-metaphor:4: ../nonexistent"
        );
    }
}
