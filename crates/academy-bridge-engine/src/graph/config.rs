use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{ArticleId, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RelationshipKind {
    Prerequisite,
    ParentChild,
    Related,
}

/// One declared relationship; `target` is a bare slug or a path reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEntry {
    pub target: String,
    pub kind: RelationshipKind,
}

/// Declared relationships per source article, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RelationshipConfig {
    entries: BTreeMap<ArticleId, Vec<RelationshipEntry>>,
}

/// `<section>/config.yaml` entry for one article.
#[derive(Debug, Default, Deserialize)]
struct ArticleConfig {
    #[serde(default, deserialize_with = "null_as_empty")]
    dependencies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    recommended: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `<section>/toc.yaml` node. Grouping nodes have no `link`.
#[derive(Debug, Default, Deserialize)]
struct TocNode {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    sections: Vec<TocNode>,
}

impl RelationshipConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, source: ArticleId, target: impl Into<String>, kind: RelationshipKind) {
        self.entries
            .entry(source)
            .or_default()
            .push(RelationshipEntry {
                target: target.into(),
                kind,
            });
    }

    pub fn entries_for(&self, source: &ArticleId) -> &[RelationshipEntry] {
        self.entries.get(source).map_or(&[], Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArticleId, &RelationshipEntry)> {
        self.entries
            .iter()
            .flat_map(|(source, entries)| entries.iter().map(move |e| (source, e)))
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry whose source is rejected by `keep`.
    pub fn retain_sources(&mut self, mut keep: impl FnMut(&ArticleId) -> bool) {
        self.entries.retain(|source, _| keep(source));
    }

    pub fn merge(&mut self, other: RelationshipConfig) {
        for (source, entries) in other.entries {
            self.entries.entry(source).or_default().extend(entries);
        }
    }

    /// Reads one section's `config.yaml` and `toc.yaml` contents.
    ///
    /// `dependencies` become prerequisites and `recommended` become related
    /// entries. Every linked toc node under a linked ancestor becomes a
    /// parent/child entry; unlinked grouping nodes pass their parent through.
    pub fn from_section_yaml(
        section: Section,
        config_yaml: Option<&str>,
        toc_yaml: Option<&str>,
    ) -> Result<Self, serde_yaml::Error> {
        let mut config = Self::new();

        if let Some(yaml) = config_yaml {
            let articles: Option<BTreeMap<String, Option<ArticleConfig>>> =
                serde_yaml::from_str(yaml)?;
            for (slug, article) in articles.unwrap_or_default() {
                let article = article.unwrap_or_default();
                let source = ArticleId::new(section, &slug);
                for dep in article.dependencies {
                    config.add(source.clone(), dep, RelationshipKind::Prerequisite);
                }
                for rec in article.recommended {
                    config.add(source.clone(), rec, RelationshipKind::Related);
                }
            }
        }

        if let Some(yaml) = toc_yaml {
            let toc: Option<TocNode> = serde_yaml::from_str(yaml)?;
            if let Some(toc) = toc {
                config.add_toc(section, &toc.sections, None);
            }
        }

        Ok(config)
    }

    fn add_toc(&mut self, section: Section, nodes: &[TocNode], parent: Option<&str>) {
        for node in nodes {
            // A grouping node whose first child repeats its title is that article.
            let (own, children) = match (&node.link, node.sections.split_first()) {
                (None, Some((first, rest)))
                    if first.link.is_some()
                        && first.sections.is_empty()
                        && first.title.is_some()
                        && first.title == node.title =>
                {
                    (first.link.as_deref(), rest)
                }
                _ => (node.link.as_deref(), node.sections.as_slice()),
            };

            if let (Some(p), Some(child)) = (parent, own)
                && p != child
            {
                self.add(
                    ArticleId::new(section, p),
                    child,
                    RelationshipKind::ParentChild,
                );
            }
            self.add_toc(section, children, own.or(parent));
        }
    }
}
