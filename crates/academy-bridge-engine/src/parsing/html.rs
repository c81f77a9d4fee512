//! Cleanup of inline HTML found in article bodies, run before lexing.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::blocks::kinds::{BlockQuote, CodeFence};
use super::footnotes::to_superscript;

fn br_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("Invalid br regex"))
}

fn sup_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<sup>(.*?)</sup>").expect("Invalid sup regex"))
}

fn verse_note_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(\d+)\s*)?\[(\d+)\]$").expect("Invalid verse note regex")
    })
}

fn strip_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</?(?:div|span)\b[^>]*>").expect("Invalid strip regex"))
}

fn strong_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</?(?:strong|b)\s*>").expect("Invalid strong regex"))
}

fn em_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</?(?:em|i)\s*>").expect("Invalid em regex"))
}

/// Rewrites the HTML the corpus uses into plain markdown.
///
/// `<br>` becomes a paragraph break (keeping any quote prefix), `<sup>`
/// becomes Unicode superscript, `<strong>`/`<b>` and `<em>`/`<i>` become
/// `**` and `*`, and `<div>`/`<span>` tags are dropped. Fenced code is left
/// alone.
pub fn normalize_html(body: &str) -> String {
    let mut out = Vec::new();
    let mut fence = None;

    for line in body.lines() {
        let (_, idx) = BlockQuote::strip_prefixes(line);
        let sig = CodeFence::sig(&line[idx..]);
        match fence {
            Some(kind) => {
                if CodeFence::closes(kind, &line[idx..]) {
                    fence = None;
                }
                out.push(line.to_string());
                continue;
            }
            None if sig.is_some() => {
                fence = sig;
                out.push(line.to_string());
                continue;
            }
            None => {}
        }

        let mut text = sup_regex().replace_all(line, |c: &Captures| sup(&c[1])).into_owned();
        text = strip_regex().replace_all(&text, "").into_owned();
        text = strong_regex().replace_all(&text, "**").into_owned();
        text = em_regex().replace_all(&text, "*").into_owned();

        let prefix = BlockQuote::prefix_of(line).trim_end();
        let brk = if prefix.is_empty() {
            "\n\n".to_string()
        } else {
            format!("\n{prefix}\n{prefix} ")
        };
        out.push(br_regex().replace_all(&text, brk.as_str()).into_owned());
    }

    out.join("\n")
}

/// `16` → `¹⁶`, `[1]` → `⁽¹⁾`, `16 [1]` → `¹⁶⁽¹⁾`.
fn sup(inner: &str) -> String {
    let inner = inner.trim();
    if let Some(c) = verse_note_regex().captures(inner) {
        let verse = c.get(1).map_or(String::new(), |m| to_superscript(m.as_str()));
        return format!("{verse}⁽{}⁾", to_superscript(&c[2]));
    }
    to_superscript(inner)
}
