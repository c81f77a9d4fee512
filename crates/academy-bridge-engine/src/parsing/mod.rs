pub mod blocks;
pub mod footnotes;
pub mod html;
pub mod images;
pub mod inline;
pub mod rope;
pub mod snapshot;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use serde::Serialize;
use xi_rope::Rope;

use crate::diagnostics::Diagnostics;
use crate::models::{Article, ArticleId, Corpus, Document, Footnotes};

use blocks::{BlockBuilder, lex};

/// Block tree straight out of the builder, before any post-pass.
#[derive(Debug)]
pub struct ParsedDoc {
    pub document: Document,
    pub diagnostics: Diagnostics,
}

pub fn parse_document(rope: &Rope) -> ParsedDoc {
    let mut builder = BlockBuilder::new();
    for line in lex(rope) {
        builder.push(&line);
    }

    let (blocks, diagnostics) = builder.finish(rope);
    ParsedDoc {
        document: Document::new(blocks),
        diagnostics,
    }
}

/// Result of converting one article body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvertedArticle {
    pub document: Document,
    pub footnotes: Footnotes,
    pub diagnostics: Diagnostics,
}

/// Runs the full per-article pipeline on raw markdown: HTML cleanup, block
/// and inline parsing, footnote normalisation, then image embedding.
pub fn convert_markdown(body: &str) -> ConvertedArticle {
    let cleaned = html::normalize_html(body);
    let rope = Rope::from(cleaned.as_str());
    let ParsedDoc {
        document,
        mut diagnostics,
    } = parse_document(&rope);

    let (document, footnotes) = footnotes::normalize_footnotes(document, &mut diagnostics);
    let document = images::embed_images(document, &mut diagnostics);

    ConvertedArticle {
        document,
        footnotes,
        diagnostics,
    }
}

pub fn convert_article(article: &Article) -> ConvertedArticle {
    log::debug!("Converting {}", article.id);
    let mut converted = convert_markdown(&article.body);
    converted.diagnostics.attribute_to(&article.id);
    converted.diagnostics.log();
    converted
}

/// Converts every article independently.
pub fn convert_corpus(corpus: &Corpus) -> BTreeMap<ArticleId, ConvertedArticle> {
    let converted: BTreeMap<_, _> = corpus
        .articles()
        .map(|article| (article.id.clone(), convert_article(article)))
        .collect();
    log::info!("Converted {} articles", converted.len());
    converted
}
