//! End-to-end tests of the per-article pipeline, asserted as outline
//! snapshots.

use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::diagnostics::DiagnosticKind;
use crate::models::{Article, ArticleId, Block, Section, TextRun, plain_text};
use crate::parsing::{convert_article, convert_markdown, parse_document, snapshot};

fn outline_of(md: &str) -> String {
    let converted = convert_markdown(md);
    snapshot::invariants(&converted.document);
    snapshot::outline(&converted.document)
}

#[test]
fn nested_quote_groups_under_parent() {
    assert_snapshot!(outline_of("> level1\n> > level2\n> level1again"), @r#"
    quote(1)
      | "level1"
      | "level1again"
      quote(2)
        | "level2"
    "#);
}

#[test]
fn deeper_quote_first_is_not_wrapped() {
    assert_snapshot!(outline_of("> > deep\n> shallow"), @r#"
    quote(2)
      | "deep"
    quote(1)
      | "shallow"
    "#);
}

#[test]
fn bare_marker_is_empty_quote() {
    assert_snapshot!(outline_of(">"), @r#"
    empty-quote(1)
      | " "
    "#);
}

#[test]
fn empty_quote_keeps_nested_children() {
    assert_snapshot!(outline_of(">\n> > inner"), @r#"
    empty-quote(1)
      | " "
      quote(2)
        | "inner"
    "#);
}

#[test]
fn image_becomes_embed_and_pdf_stays_link() {
    assert_snapshot!(outline_of("![alt](pic.png)\n\n[alt](pic.pdf)"), @r#"
    image(pic.png) "alt"
    paragraph "alt"->ref(pic.pdf)
    "#);
}

#[test]
fn emphasis_inside_link_label() {
    assert_snapshot!(outline_of("[**bold link**](http://x)"), @r#"
    paragraph "bold link"+b->url(http://x)
    "#);
}

#[test]
fn paragraph_lines_join_with_space() {
    assert_snapshot!(outline_of("line one\nline **two**\n\nnext"), @r#"
    paragraph "line one line " "two"+b
    paragraph "next"
    "#);
}

#[test]
fn list_nesting_and_continuation() {
    let md = "1. first\n   continued\n2. second\n    - nested\n(3) third";
    assert_snapshot!(outline_of(md), @r#"
    list(ordered,0) "first continued"
    list(ordered,0) "second"
    list(unordered,1) "nested"
    list(ordered,0) "third"
    "#);
}

#[test]
fn blank_line_resets_list_depth() {
    assert_snapshot!(outline_of("  - a\n    - b\n\n    - c"), @r#"
    list(unordered,0) "a"
    list(unordered,1) "b"
    list(unordered,0) "c"
    "#);
}

#[test]
fn table_rows_padded_to_header() {
    let md = "| Term | Meaning |\n|---|---|\n| a | *b* |\n| c |";
    assert_snapshot!(outline_of(md), @r#"
    table
      header ["Term"] ["Meaning"]
      row ["a"] ["b"+i]
      row ["c"] []
    "#);
}

#[test]
fn single_pipe_line_is_paragraph() {
    assert_snapshot!(outline_of("| lonely"), @r#"
    paragraph "| lonely"
    "#);
}

#[test]
fn headings_dividers_and_code() {
    let md = "# Title\n---\n```rust\nlet x = *y*;\n```\n###### Small";
    assert_snapshot!(outline_of(md), @r#"
    heading(1) "Title"
    divider
    code(rust) "let x = *y*;"
    heading(6) "Small"
    "#);
}

#[test]
fn footnotes_render_as_superscript() {
    let converted = convert_markdown("Text[^1] and[^2].\n\n[^1]: First note.");

    assert_snapshot!(snapshot::outline(&converted.document), @r#"
    paragraph "Text¹ and²."
    "#);
    assert_eq!(converted.footnotes.get("1"), Some("First note."));
    assert_eq!(
        converted
            .diagnostics
            .count(DiagnosticKind::MissingFootnoteDefinition),
        1
    );
}

#[test]
fn footnote_appendix_follows_body() {
    let converted = convert_markdown("See[^2] and[^10].\n\n[^10]: Ten.\n[^2]: Two.");
    let doc = converted.document.with_footnote_appendix(&converted.footnotes);

    assert_snapshot!(snapshot::outline(&doc), @r#"
    paragraph "See² and¹⁰."
    divider
    heading(3) "Footnotes"
    paragraph "[2] Two."
    paragraph "[10] Ten."
    "#);
}

#[test]
fn html_is_normalised_before_parsing() {
    assert_snapshot!(outline_of("<div>One<br>Two <sup>[1]</sup> <strong>bold</strong></div>"), @r#"
    paragraph "One"
    paragraph "Two ⁽¹⁾ " "bold"+b
    "#);
}

#[test]
fn quote_line_break_keeps_quote() {
    let converted = convert_markdown("> a<br>b");
    let [Block::Quote(q)] = converted.document.blocks.as_slice() else {
        panic!("expected one quote, got {:?}", converted.document.blocks);
    };
    assert_eq!(
        q.lines,
        vec![
            vec![TextRun::plain("a")],
            vec![],
            vec![TextRun::plain("b")]
        ]
    );
    assert_eq!(plain_text(&q.runs()), "a\n\nb");
}

#[test]
fn unterminated_fence_is_reported_and_kept() {
    let converted = convert_markdown("intro\n```\ncode");

    assert_snapshot!(snapshot::outline(&converted.document), @r#"
    paragraph "intro"
    code(-) "code"
    "#);
    let diag = converted
        .diagnostics
        .iter()
        .next()
        .expect("fence diagnostic");
    assert_eq!(diag.kind, DiagnosticKind::MalformedMarkdown);
    assert_eq!(diag.text, "unterminated code fence: ```");
    assert_eq!(diag.line, Some(2));
}

#[test]
fn malformed_emphasis_reports_line() {
    let converted = convert_markdown("fine\n\n**broken");

    assert_eq!(converted.document.plain_text(), "fine\n**broken");
    let lines: Vec<_> = converted.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![Some(3)]);
}

#[test]
fn plain_text_survives_conversion() {
    // Given a line mixing every inline construct
    let md = "A **bold** and *italic* [link](../x/01.md) with `code`.";

    // When converted
    let converted = convert_markdown(md);

    // Then only the styling markers are gone
    assert_eq!(
        converted.document.plain_text(),
        "A bold and italic link with `code`."
    );
}

#[test]
fn empty_document() {
    let parsed = parse_document(&xi_rope::Rope::from(""));
    assert!(parsed.document.blocks.is_empty());
    assert!(parsed.diagnostics.is_empty());
}

#[test]
fn blank_lines_only() {
    let parsed = parse_document(&xi_rope::Rope::from("\n\n\n"));
    assert!(parsed.document.blocks.is_empty());
}

#[test]
fn article_diagnostics_name_their_article() {
    // Given an article with a conversion problem
    let id = ArticleId::new(Section::Translate, "figs-metaphor");
    let article = Article::new(id.clone(), Section::Translate, "Text[^9].\n\n**open");

    // When converted
    let converted = convert_article(&article);

    // Then every diagnostic already carries the article when reported
    assert_eq!(converted.diagnostics.len(), 2);
    for diagnostic in converted.diagnostics.iter() {
        assert_eq!(diagnostic.article.as_ref(), Some(&id));
        assert!(
            diagnostic
                .to_string()
                .contains(" in translate/figs-metaphor"),
            "{diagnostic}"
        );
    }
}
