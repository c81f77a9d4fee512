use crate::models::{Link, RunMarker, Style, TextRun, merge_runs, plain_text};

use super::{
    cursor::Cursor,
    kinds::{CodeSpan, Emphasis, LinkParse, LinkSpan, LinkSyntax, is_word_byte},
};

/// Syntax the parser fell back to literal text for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineIssue {
    pub message: &'static str,
    /// Source text from the offending marker onwards.
    pub text: String,
}

/// Parses one logical line into maximal styled runs.
pub fn parse_rich_text(s: &str) -> Vec<TextRun> {
    let mut issues = vec![];
    parse_rich_text_with(s, &mut issues)
}

/// As [`parse_rich_text`], collecting malformed-syntax issues.
///
/// # Precedence
/// Escapes and code spans first, then images, footnote references, links,
/// and emphasis last. Links win over emphasis: a closing `*` is never
/// searched for inside a complete `[label](target)`. Unmatched openers stay
/// literal text.
pub fn parse_rich_text_with(s: &str, issues: &mut Vec<InlineIssue>) -> Vec<TextRun> {
    let mut out = vec![];
    parse_into(s, Style::PLAIN, None, &mut out, issues);
    merge_runs(out)
}

fn flush_text(s: &str, style: Style, link: Option<&Link>, out: &mut Vec<TextRun>) {
    if s.is_empty() {
        return;
    }
    let text = html_escape::decode_html_entities(s).into_owned();
    out.push(TextRun {
        text,
        style,
        link: link.cloned(),
        marker: None,
    });
}

fn parse_into(
    s: &str,
    style: Style,
    link: Option<&Link>,
    out: &mut Vec<TextRun>,
    issues: &mut Vec<InlineIssue>,
) {
    let mut cur = Cursor::new(s);
    let mut text_start = 0usize;

    while let Some(b) = cur.peek() {
        let at = cur.i;
        match b {
            LinkSyntax::ESCAPE if cur.peek_at(1).is_some_and(|n| n.is_ascii_punctuation()) => {
                flush_text(&s[text_start..at], style, link, out);
                text_start = at + 1;
                cur.bump_n(2);
                continue;
            }
            CodeSpan::TICK => {
                if let Some(end) = CodeSpan::end_at(s, at) {
                    // verbatim, entities included
                    flush_text(&s[text_start..at], style, link, out);
                    out.push(TextRun {
                        text: s[at..end].to_string(),
                        style,
                        link: link.cloned(),
                        marker: None,
                    });
                    cur.i = end;
                    text_start = end;
                } else {
                    cur.bump_n(cur.run_of(CodeSpan::TICK));
                }
                continue;
            }
            b'!' if link.is_none() && cur.starts_with(LinkSyntax::IMAGE) => {
                match LinkSyntax::parse_at(s, at + 1) {
                    LinkParse::Link(l) => {
                        flush_text(&s[text_start..at], style, link, out);
                        let caption = plain_text(&parse_rich_text(&s[l.label]));
                        let url = LinkSyntax::clean_target(&s[l.target]).to_string();
                        out.push(
                            TextRun::styled(caption, style).with_marker(RunMarker::Image { url }),
                        );
                        cur.i = l.end;
                        text_start = l.end;
                        continue;
                    }
                    LinkParse::Unclosed => {
                        issues.push(issue("unclosed image target", s, at));
                        cur.i = at + 2;
                        continue;
                    }
                    LinkParse::NotALink => {}
                }
            }
            LinkSyntax::OPEN => {
                if let Some((label, end)) = LinkSyntax::footnote_at(s, at) {
                    flush_text(&s[text_start..at], style, link, out);
                    let label = s[label].to_string();
                    let mut run = TextRun::styled(label.clone(), style)
                        .with_marker(RunMarker::FootnoteRef { label });
                    run.link = link.cloned();
                    out.push(run);
                    cur.i = end;
                    text_start = end;
                    continue;
                }
                if link.is_none() {
                    match LinkSyntax::parse_at(s, at) {
                        LinkParse::Link(l) => {
                            flush_text(&s[text_start..at], style, link, out);
                            emit_link(s, &l, style, out, issues);
                            cur.i = l.end;
                            text_start = l.end;
                            continue;
                        }
                        LinkParse::Unclosed => issues.push(issue("unclosed link target", s, at)),
                        LinkParse::NotALink => {}
                    }
                }
            }
            Emphasis::STAR => {
                let run = cur.run_of(Emphasis::STAR);
                let opens = cur.peek_at(run).is_some_and(|n| !n.is_ascii_whitespace());
                if opens {
                    if run >= 2
                        && let Some(close) = find_strong_close(s, at + 2)
                    {
                        flush_text(&s[text_start..at], style, link, out);
                        parse_into(&s[at + 2..close], style.with_bold(), link, out, issues);
                        cur.i = close + 2;
                        text_start = cur.i;
                        continue;
                    }
                    if let Some(close) = find_emphasis_close(s, at + 1, Emphasis::STAR) {
                        flush_text(&s[text_start..at], style, link, out);
                        parse_into(&s[at + 1..close], style.with_italic(), link, out, issues);
                        cur.i = close + 1;
                        text_start = cur.i;
                        continue;
                    }
                    if run >= 2 {
                        issues.push(issue("unclosed `**`", s, at));
                    }
                }
                cur.bump_n(run);
                continue;
            }
            Emphasis::UNDERSCORE => {
                let run = cur.run_of(Emphasis::UNDERSCORE);
                let opens = run == 1
                    && !cur.prev().is_some_and(is_word_byte)
                    && cur.peek_at(1).is_some_and(|n| !n.is_ascii_whitespace());
                if opens
                    && let Some(close) = find_emphasis_close(s, at + 1, Emphasis::UNDERSCORE)
                {
                    flush_text(&s[text_start..at], style, link, out);
                    parse_into(&s[at + 1..close], style.with_italic(), link, out, issues);
                    cur.i = close + 1;
                    text_start = cur.i;
                    continue;
                }
                cur.bump_n(run);
                continue;
            }
            _ => {}
        }
        cur.bump();
    }

    flush_text(&s[text_start..], style, link, out);
}

/// Parses the label of a link with the link applied to every resulting run.
fn emit_link(
    s: &str,
    l: &LinkSpan,
    style: Style,
    out: &mut Vec<TextRun>,
    issues: &mut Vec<InlineIssue>,
) {
    let label = &s[l.label.clone()];
    let target = LinkSyntax::clean_target(&s[l.target.clone()]);
    if target.is_empty() {
        parse_into(label, style, None, out, issues);
        return;
    }
    let link = Link::classify(target);
    if label.trim().is_empty() {
        out.push(TextRun::styled(target, style).with_link(link));
        return;
    }
    parse_into(label, style, Some(&link), out, issues);
}

/// Index of the `**` closing a strong span whose content starts at `from`.
///
/// When the closer is part of a longer star run (`***`), the last pair is
/// used so the inner star can close a nested italic.
fn find_strong_close(s: &str, from: usize) -> Option<usize> {
    scan_for_closer(s, from, Emphasis::STAR, |run, _| match run {
        1 => None,
        n => Some(n - 2),
    })
}

fn find_emphasis_close(s: &str, from: usize, delim: u8) -> Option<usize> {
    let b = s.as_bytes();
    scan_for_closer(s, from, delim, |run, j| {
        if delim == Emphasis::UNDERSCORE {
            let after = b.get(j + run).copied();
            return (run == 1 && !after.is_some_and(is_word_byte)).then_some(0);
        }
        match run {
            1 => Some(0),
            2 => None,
            n => Some(n - 1),
        }
    })
}

/// Walks `s` from `from` looking for a run of `delim` that can close.
///
/// `pick(run_len, run_start)` returns the closer's offset inside the run, or
/// `None` to skip the run. Escapes, code spans and complete links are
/// stepped over so their contents never close anything.
fn scan_for_closer(
    s: &str,
    from: usize,
    delim: u8,
    pick: impl Fn(usize, usize) -> Option<usize>,
) -> Option<usize> {
    let b = s.as_bytes();
    let mut j = from;
    while j < b.len() {
        match b[j] {
            LinkSyntax::ESCAPE => {
                j += 2;
                continue;
            }
            CodeSpan::TICK => {
                if let Some(end) = CodeSpan::end_at(s, j) {
                    j = end;
                    continue;
                }
            }
            LinkSyntax::OPEN => {
                if let LinkParse::Link(l) = LinkSyntax::parse_at(s, j) {
                    j = l.end;
                    continue;
                }
            }
            c if c == delim => {
                let run = b[j..].iter().take_while(|x| **x == delim).count();
                let after_text = j > from && !b[j - 1].is_ascii_whitespace();
                if after_text && let Some(offset) = pick(run, j) {
                    return Some(j + offset);
                }
                j += run;
                continue;
            }
            _ => {}
        }
        j += 1;
    }
    None
}

fn issue(message: &'static str, s: &str, at: usize) -> InlineIssue {
    InlineIssue {
        message,
        text: s[at..].chars().take(40).collect(),
    }
}
