use std::sync::OnceLock;

use regex::Regex;

use crate::models::ListKind;

/// List item markers: `*`, `-`, `+`, `1.`, `1)` and `(1)`.
pub struct ListItem;

impl ListItem {
    /// Columns a tab counts for when measuring indentation.
    pub const TAB_WIDTH: usize = 4;

    fn regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r"^(?:(?P<bullet>[*+-])|(?P<num>\d{1,9}[.)])|(?P<paren>\(\d{1,9}\)))(?:[ \t]+|$)")
                .expect("Invalid list marker regex")
        })
    }

    /// Returns (kind, indent, text) when the line starts a list item.
    pub fn parse(line: &str) -> Option<(ListKind, usize, &str)> {
        let indent = Self::indent_of(line);
        let t = line.trim_start();
        let caps = Self::regex().captures(t)?;
        let kind = if caps.name("bullet").is_some() {
            ListKind::Unordered
        } else {
            ListKind::Ordered
        };
        let end = caps.get(0).map_or(0, |m| m.end());
        Some((kind, indent, t[end..].trim_end()))
    }

    pub fn indent_of(line: &str) -> usize {
        line.chars()
            .take_while(|c| matches!(c, ' ' | '\t'))
            .map(|c| if c == '\t' { Self::TAB_WIDTH } else { 1 })
            .sum()
    }
}
