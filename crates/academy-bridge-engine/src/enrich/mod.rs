//! Writer-facing properties derived from an article and its place in the
//! graph.

pub mod tsv;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::graph::CrossReferenceGraph;
use crate::models::{Article, ArticleId, Section};

pub use tsv::TsvTable;

const REPOSITORY: &str = "en_ta";
const FORGE_URL: &str = "https://git.door43.org/unfoldingWord/en_ta/src/branch/master";
const OBJECTIVE_LEN: usize = 200;
const DEFAULT_OBJECTIVE: &str = "Learn about translation concepts and techniques.";
const OBJECTIVE_KEYWORDS: [&str; 4] = ["learn", "understand", "objective", "goal"];
const SECTION_SLUGS: [&str; 4] = ["intro-checking", "intro-share", "intro-publishing", "ta-intro"];

/// Concept name, slug prefix implying it, and body keywords implying it.
const KEY_CONCEPTS: [(&str, Option<&str>, &[&str]); 8] = [
    ("Figures of Speech", Some("figs-"), &["metaphor", "simile"]),
    ("Grammar", Some("grammar-"), &["verb", "sentence"]),
    (
        "Translation Principles",
        None,
        &["translation", "translate", "meaning"],
    ),
    ("Quality Assurance", None, &["check", "review", "accuracy"]),
    ("Team Management", None, &["team", "leader", "collaborate"]),
    ("Cultural Context", None, &["culture", "cultural", "context"]),
    ("Church Involvement", None, &["church", "pastor", "leader"]),
    (
        "Source Texts",
        None,
        &["source", "original", "hebrew", "greek"],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentType {
    Module,
    Section,
    Topic,
}

impl ContentType {
    pub fn for_slug(slug: &str) -> Self {
        if slug.starts_with("figs-") || slug.starts_with("grammar-") {
            ContentType::Module
        } else if SECTION_SLUGS.contains(&slug) {
            ContentType::Section
        } else {
            ContentType::Topic
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn from_prerequisites(count: usize) -> Self {
        match count {
            0 => Difficulty::Beginner,
            1..=3 => Difficulty::Intermediate,
            _ => Difficulty::Advanced,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Complete,
    #[serde(rename = "Needs Review")]
    NeedsReview,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Complete => f.write_str("Complete"),
            Status::NeedsReview => f.write_str("Needs Review"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleMetadata {
    pub id: ArticleId,
    pub title: String,
    pub summary: String,
    pub manual: &'static str,
    pub slug: String,
    pub repository_path: String,
    pub original_url: String,
    pub content_type: ContentType,
    pub difficulty: Difficulty,
    pub key_concepts: Vec<&'static str>,
    pub target_audience: Vec<&'static str>,
    pub learning_objective: String,
    pub status: Status,
    /// Properties from an enrichment table, keyed by column name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl ArticleMetadata {
    pub fn derive(article: &Article, graph: &CrossReferenceGraph<'_>) -> Self {
        let slug = article.id.slug().to_string();
        let content = format!("{}\n{}", article.body, article.subtitle);
        let lower = content.to_lowercase();

        Self {
            id: article.id.clone(),
            title: article.display_title().to_string(),
            summary: article.subtitle.clone(),
            manual: article.manual().display_name(),
            repository_path: format!("{REPOSITORY}/{}", article.id),
            original_url: format!("{FORGE_URL}/{}/01.md", article.id),
            content_type: ContentType::for_slug(&slug),
            difficulty: Difficulty::from_prerequisites(
                graph.prerequisites_of(&article.id).count(),
            ),
            key_concepts: key_concepts(&slug, &lower),
            target_audience: target_audience(article.section, &lower),
            learning_objective: learning_objective(&content),
            status: if article.body.trim().is_empty() {
                Status::NeedsReview
            } else {
                Status::Complete
            },
            extra: BTreeMap::new(),
            slug,
        }
    }

    /// Attaches the enrichment row matching this article's title, if any.
    pub fn with_tsv(mut self, table: &TsvTable) -> Self {
        if let Some(extra) = table.lookup(&self.title) {
            log::debug!("Enriched {} with {} properties", self.id, extra.len());
            self.extra = extra;
        }
        self
    }
}

fn key_concepts(slug: &str, lower: &str) -> Vec<&'static str> {
    KEY_CONCEPTS
        .iter()
        .filter(|(_, prefix, words)| {
            prefix.is_some_and(|p| slug.contains(p)) || words.iter().any(|w| lower.contains(w))
        })
        .map(|(name, _, _)| *name)
        .collect()
}

fn target_audience(section: Section, lower: &str) -> Vec<&'static str> {
    let mut audience = vec![];
    match section {
        Section::Translate => audience.push("Translators"),
        Section::Checking => audience.push("Checkers"),
        Section::Process => audience.push("Team Leaders"),
        Section::Intro => {}
    }
    if ["train", "teaching"].iter().any(|w| lower.contains(w)) {
        audience.push("Trainers");
    }
    if ["church", "pastor"].iter().any(|w| lower.contains(w)) {
        audience.push("Church Leaders");
    }
    if audience.is_empty() {
        audience.push("Translators");
    }
    audience
}

/// First early line that states an objective, else the first paragraph.
fn learning_objective(content: &str) -> String {
    if let Some(line) = content
        .lines()
        .take(10)
        .find(|l| {
            let l = l.to_lowercase();
            OBJECTIVE_KEYWORDS.iter().any(|k| l.contains(k))
        })
    {
        return truncate(line.trim(), OBJECTIVE_LEN);
    }

    let paragraph = content
        .split("\n\n")
        .filter(|p| !p.starts_with('#'))
        .map(str::trim)
        .find(|p| !p.is_empty());
    match paragraph {
        Some(p) if p.chars().count() > OBJECTIVE_LEN => {
            format!("{}...", truncate(p, OBJECTIVE_LEN))
        }
        Some(p) => p.to_string(),
        None => DEFAULT_OBJECTIVE.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
