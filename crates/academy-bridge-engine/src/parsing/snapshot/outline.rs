use std::fmt::Write;

use crate::models::{Block, Document, Link, ListKind, Quote, RunMarker, TextRun};

/// One line per block, nested quotes indented by two spaces.
///
/// Runs print as `"text"` followed by `+b`/`+i` for style, `->kind(target)`
/// for links and `^fn(label)` / `!img(url)` for markers.
pub fn outline(doc: &Document) -> String {
    let mut out = String::new();
    for block in &doc.blocks {
        write_block(&mut out, block, 0);
    }
    out
}

fn write_block(out: &mut String, block: &Block, indent: usize) {
    let pad = "  ".repeat(indent);
    match block {
        Block::Heading { level, runs } => {
            let _ = writeln!(out, "{pad}heading({level}) {}", runs_line(runs));
        }
        Block::Paragraph { runs } => {
            let _ = writeln!(out, "{pad}paragraph {}", runs_line(runs));
        }
        Block::Quote(q) => write_quote(out, "quote", q, indent),
        Block::EmptyQuotePlaceholder(q) => write_quote(out, "empty-quote", q, indent),
        Block::ListItem {
            kind,
            runs,
            indent_level,
        } => {
            let kind = match kind {
                ListKind::Ordered => "ordered",
                ListKind::Unordered => "unordered",
            };
            let _ = writeln!(out, "{pad}list({kind},{indent_level}) {}", runs_line(runs));
        }
        Block::CodeBlock { language, text } => {
            let language = language.as_deref().unwrap_or("-");
            let _ = writeln!(out, "{pad}code({language}) {text:?}");
        }
        Block::ImageEmbed { url, caption } => {
            let _ = writeln!(out, "{pad}image({url}) {}", runs_line(caption));
        }
        Block::Table { header, rows } => {
            let _ = writeln!(out, "{pad}table");
            let _ = writeln!(out, "{pad}  header {}", cells_line(header));
            for row in rows {
                let _ = writeln!(out, "{pad}  row {}", cells_line(row));
            }
        }
        Block::Divider => {
            let _ = writeln!(out, "{pad}divider");
        }
        Block::FootnoteDefinition { label, text } => {
            let _ = writeln!(out, "{pad}footnote-def({label}) {text:?}");
        }
    }
}

fn write_quote(out: &mut String, name: &str, quote: &Quote, indent: usize) {
    let pad = "  ".repeat(indent);
    let _ = writeln!(out, "{pad}{name}({})", quote.depth);
    for line in &quote.lines {
        let _ = writeln!(out, "{pad}  | {}", runs_line(line));
    }
    for child in &quote.children {
        write_block(out, child, indent + 1);
    }
}

fn cells_line(cells: &[Vec<TextRun>]) -> String {
    cells
        .iter()
        .map(|c| format!("[{}]", runs_line(c)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn runs_line(runs: &[TextRun]) -> String {
    runs.iter().map(run).collect::<Vec<_>>().join(" ")
}

fn run(r: &TextRun) -> String {
    let mut s = format!("{:?}", r.text);
    if r.style.bold {
        s.push_str("+b");
    }
    if r.style.italic {
        s.push_str("+i");
    }
    match &r.link {
        Some(Link::Url(u)) => {
            let _ = write!(s, "->url({u})");
        }
        Some(Link::Reference(t)) => {
            let _ = write!(s, "->ref({t})");
        }
        Some(Link::Article(id)) => {
            let _ = write!(s, "->article({id})");
        }
        Some(Link::Asset(p)) => {
            let _ = write!(s, "->asset({p})");
        }
        None => {}
    }
    match &r.marker {
        Some(RunMarker::FootnoteRef { label }) => {
            let _ = write!(s, "^fn({label})");
        }
        Some(RunMarker::Image { url }) => {
            let _ = write!(s, "!img({url})");
        }
        None => {}
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Style;

    #[test]
    fn renders_runs_with_style_and_link() {
        let doc = Document::new(vec![Block::Paragraph {
            runs: vec![
                TextRun::plain("a "),
                TextRun::styled("b", Style::PLAIN.with_bold())
                    .with_link(Link::Url("http://x".into())),
            ],
        }]);
        assert_eq!(outline(&doc), "paragraph \"a \" \"b\"+b->url(http://x)\n");
    }

    #[test]
    fn renders_nested_quotes_indented() {
        let mut inner = Quote::new(2);
        inner.lines.push(vec![TextRun::plain("deep")]);
        let mut outer = Quote::new(1);
        outer.lines.push(vec![TextRun::plain("top")]);
        outer.children.push(Block::Quote(inner));

        let doc = Document::new(vec![Block::Quote(outer)]);
        assert_eq!(
            outline(&doc),
            "quote(1)\n  | \"top\"\n  quote(2)\n    | \"deep\"\n"
        );
    }
}
