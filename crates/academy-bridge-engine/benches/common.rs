// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use academy_bridge_engine::{Article, ArticleId, Corpus, Section};

#[allow(dead_code)]
pub fn generate_article_body(size: usize) -> String {
    let base = "### Description\n\nA metaphor is a figure of speech[^1] in which **one concept** is used for *another*. See [Simile](../figs-simile/01.md).\n\n> Quoted text with a [link](http://example.com)\n> > Nested quote\n\n1. First step\n2. Second step\n    - detail\n\n![chart](../../images/chart.png)\n\n| Term | Meaning |\n|---|---|\n| a | b |\n\n[^1]: A footnote.\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_corpus(articles: usize) -> Corpus {
    (0..articles)
        .map(|i| {
            let next = (i + 1) % articles;
            let body = format!(
                "{}\nSee [next](../article-{next}/01.md) and [missing](../nowhere).\n",
                generate_article_body(2)
            );
            Article::new(
                ArticleId::new(Section::Translate, &format!("article-{i}")),
                Section::Translate,
                body,
            )
            .with_title(format!("Article {i}"), "")
        })
        .collect()
}
