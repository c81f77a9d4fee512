use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// Column holding the article topic each row describes.
pub const TOPIC_COLUMN: &str = "Topic translationAcademy";

/// Placeholder the spreadsheet uses for "no value yet".
const SENTINEL: &str = "XXXXX";

fn forge_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https?://git\.door43\.org/[^/]+/en_ta/src/branch/[^/]+/[^/]+/")
            .expect("Invalid forge prefix regex")
    })
}

/// A tab-separated enrichment table; the first row names the columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TsvTable {
    pub fn parse(text: &str) -> Self {
        let mut lines = text.lines().map(|l| l.trim_end_matches('\r'));
        let headers = lines
            .next()
            .map(|h| h.split('\t').map(|c| c.trim().to_string()).collect())
            .unwrap_or_default();
        let rows = lines
            .map(|l| l.split('\t').map(str::to_string).collect::<Vec<_>>())
            .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn topic_index(&self) -> Option<usize> {
        self.headers.iter().position(|h| h == TOPIC_COLUMN)
    }

    /// Properties of the first row whose topic matches `title`.
    ///
    /// Topics match case-insensitively either as written or with the forge
    /// URL prefix and `/01.md` suffix removed. Empty cells and the `XXXXX`
    /// placeholder are left out.
    pub fn lookup(&self, title: &str) -> Option<BTreeMap<String, String>> {
        let topic_idx = self.topic_index()?;
        let row = self.rows.iter().find(|row| {
            row.get(topic_idx)
                .is_some_and(|topic| topic_matches(topic, title))
        })?;

        Some(
            self.headers
                .iter()
                .zip(row)
                .filter_map(|(header, cell)| {
                    let value = cell.trim();
                    (!value.is_empty() && value != SENTINEL)
                        .then(|| (header.clone(), value.to_string()))
                })
                .collect(),
        )
    }
}

fn topic_matches(topic: &str, title: &str) -> bool {
    let topic = topic.trim();
    let title = title.trim();
    if topic.is_empty() || title.is_empty() {
        return false;
    }
    let title = title.to_lowercase();
    if topic.to_lowercase() == title {
        return true;
    }
    let cleaned = forge_prefix_regex().replace(topic, "");
    cleaned.trim_end_matches("/01.md").to_lowercase() == title
}
