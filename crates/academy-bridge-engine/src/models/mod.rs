pub mod article;
pub mod document;

pub use article::{Article, ArticleId, Corpus, KnownArticles, Manual, Section};
pub use document::{
    Block, Document, Footnotes, Link, ListKind, Quote, RunMarker, Style, TextRun, merge_runs,
    plain_text,
};
