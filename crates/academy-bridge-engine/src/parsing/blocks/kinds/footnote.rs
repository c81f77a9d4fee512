use std::sync::OnceLock;

use regex::Regex;

/// `[^label]: text` footnote definitions.
pub struct FootnoteDefinition;

impl FootnoteDefinition {
    fn regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r"^\s{0,3}\[\^([^\]\s]+)\]:\s*(.*)$").expect("Invalid footnote definition regex")
        })
    }

    pub fn parse(line: &str) -> Option<(&str, &str)> {
        let caps = Self::regex().captures(line)?;
        let label = caps.get(1)?.as_str();
        let text = caps.get(2).map_or("", |m| m.as_str().trim_end());
        Some((label, text))
    }
}
