//! Whole-corpus pass: resolves in-corpus links and declared relationships
//! into a [`CrossReferenceGraph`].
//!
//! Each article is resolved on its own into a partial result, then all
//! partial results are merged once. Parsed documents are never modified; the
//! link-resolved copies are returned in [`GraphBuild::documents`].

pub mod config;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::models::{ArticleId, Block, Corpus, Document, Link, TextRun};
use crate::parsing::ConvertedArticle;
use crate::resolve::{Resolution, resolve_reference};

pub use config::{RelationshipConfig, RelationshipEntry, RelationshipKind};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RelationshipEdge {
    pub from: ArticleId,
    pub to: ArticleId,
    pub kind: RelationshipKind,
}

/// A body link whose reference resolved inside the corpus.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResolvedLink {
    pub source: ArticleId,
    pub target: Resolution,
    /// The reference exactly as written in the source body.
    pub reference: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrossReferenceGraph<'a> {
    #[serde(skip)]
    corpus: &'a Corpus,
    edges: BTreeSet<RelationshipEdge>,
    links: BTreeSet<ResolvedLink>,
}

impl<'a> CrossReferenceGraph<'a> {
    pub fn corpus(&self) -> &'a Corpus {
        self.corpus
    }

    pub fn edges(&self) -> impl Iterator<Item = &RelationshipEdge> {
        self.edges.iter()
    }

    pub fn links(&self) -> impl Iterator<Item = &ResolvedLink> {
        self.links.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn contains_edge(&self, from: &ArticleId, to: &ArticleId, kind: RelationshipKind) -> bool {
        self.edges.contains(&RelationshipEdge {
            from: from.clone(),
            to: to.clone(),
            kind,
        })
    }

    fn targets(
        &self,
        from: &ArticleId,
        kind: RelationshipKind,
    ) -> impl Iterator<Item = &ArticleId> {
        self.edges
            .iter()
            .filter(move |e| e.kind == kind && &e.from == from)
            .map(|e| &e.to)
    }

    fn sources(&self, to: &ArticleId, kind: RelationshipKind) -> impl Iterator<Item = &ArticleId> {
        self.edges
            .iter()
            .filter(move |e| e.kind == kind && &e.to == to)
            .map(|e| &e.from)
    }

    /// Articles `id` declares as prerequisites.
    pub fn prerequisites_of(&self, id: &ArticleId) -> impl Iterator<Item = &ArticleId> {
        self.targets(id, RelationshipKind::Prerequisite)
    }

    /// Articles that list `id` as a prerequisite.
    pub fn dependents_of(&self, id: &ArticleId) -> impl Iterator<Item = &ArticleId> {
        self.sources(id, RelationshipKind::Prerequisite)
    }

    pub fn children_of(&self, id: &ArticleId) -> impl Iterator<Item = &ArticleId> {
        self.targets(id, RelationshipKind::ParentChild)
    }

    pub fn parents_of(&self, id: &ArticleId) -> impl Iterator<Item = &ArticleId> {
        self.sources(id, RelationshipKind::ParentChild)
    }

    pub fn related_to(&self, id: &ArticleId) -> impl Iterator<Item = &ArticleId> {
        self.targets(id, RelationshipKind::Related)
    }

    pub fn links_from(&self, id: &ArticleId) -> impl Iterator<Item = &ResolvedLink> {
        self.links.iter().filter(move |l| &l.source == id)
    }

    /// Links from anywhere in the corpus that land on article `id`.
    pub fn links_to(&self, id: &ArticleId) -> impl Iterator<Item = &ResolvedLink> {
        self.links
            .iter()
            .filter(move |l| matches!(&l.target, Resolution::Article(t) if t == id))
    }
}

impl PartialEq for CrossReferenceGraph<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.edges == other.edges && self.links == other.links
    }
}

impl Eq for CrossReferenceGraph<'_> {}

/// Output of [`build_graph`].
#[derive(Debug)]
pub struct GraphBuild<'a> {
    pub graph: CrossReferenceGraph<'a>,
    /// Copies of the converted documents with references rewritten to
    /// resolved targets.
    pub documents: BTreeMap<ArticleId, Document>,
    /// Problems found while linking; conversion diagnostics stay with their
    /// [`ConvertedArticle`].
    pub diagnostics: Diagnostics,
}

/// What one article contributes before merging.
#[derive(Debug, Default)]
struct PartialResolution {
    document: Option<Document>,
    links: Vec<ResolvedLink>,
    edges: Vec<RelationshipEdge>,
    diagnostics: Diagnostics,
}

pub fn build_graph<'a>(
    corpus: &'a Corpus,
    converted: &BTreeMap<ArticleId, ConvertedArticle>,
    config: &RelationshipConfig,
) -> GraphBuild<'a> {
    let partials: Vec<(ArticleId, PartialResolution)> = corpus
        .ids()
        .map(|id| {
            let partial = resolve_article(id, converted.get(id), corpus, config);
            (id.clone(), partial)
        })
        .collect();

    let mut edges = BTreeSet::new();
    let mut links = BTreeSet::new();
    let mut documents = BTreeMap::new();
    let mut diagnostics = Diagnostics::new();

    for (id, partial) in partials {
        edges.extend(partial.edges);
        links.extend(partial.links);
        diagnostics.extend(partial.diagnostics);
        if let Some(document) = partial.document {
            documents.insert(id, document);
        }
    }

    for (source, entry) in config.iter().filter(|(s, _)| !corpus.contains(s)) {
        diagnostics.push(
            Diagnostic::new(
                DiagnosticKind::BrokenReference,
                format!("{:?} relationship source {source}", entry.kind),
            )
            .for_article(source),
        );
    }

    diagnostics.log();
    log::info!(
        "Built graph: {} edges, {} resolved links, {} diagnostics",
        edges.len(),
        links.len(),
        diagnostics.len()
    );

    GraphBuild {
        graph: CrossReferenceGraph {
            corpus,
            edges,
            links,
        },
        documents,
        diagnostics,
    }
}

fn resolve_article(
    id: &ArticleId,
    converted: Option<&ConvertedArticle>,
    corpus: &Corpus,
    config: &RelationshipConfig,
) -> PartialResolution {
    let mut partial = PartialResolution::default();

    if let Some(converted) = converted {
        let mut document = converted.document.clone();
        for block in &mut document.blocks {
            block.visit_runs_mut(&mut |runs| resolve_runs(id, runs, corpus, &mut partial));
            resolve_images(id, block, corpus, &mut partial);
        }
        partial.document = Some(document);
    } else {
        log::debug!("No converted document for {id}");
    }

    for entry in config.entries_for(id) {
        let Some(target) = resolve_config_target(id, &entry.target, corpus) else {
            partial.diagnostics.push(
                Diagnostic::new(DiagnosticKind::BrokenReference, entry.target.clone())
                    .for_article(id),
            );
            continue;
        };
        if &target == id {
            continue;
        }
        if entry.kind == RelationshipKind::Related {
            partial.edges.push(RelationshipEdge {
                from: target.clone(),
                to: id.clone(),
                kind: entry.kind,
            });
        }
        partial.edges.push(RelationshipEdge {
            from: id.clone(),
            to: target,
            kind: entry.kind,
        });
    }

    partial
}

/// Rewrites every reference link in `runs`.
///
/// A link label split into several runs is one occurrence, so neighbouring
/// runs with the same reference are reported once.
fn resolve_runs(
    id: &ArticleId,
    runs: &mut [TextRun],
    corpus: &Corpus,
    partial: &mut PartialResolution,
) {
    let mut previous: Option<String> = None;
    for run in runs.iter_mut() {
        let Some(reference) = run.link.as_ref().and_then(Link::as_reference) else {
            previous = None;
            continue;
        };
        let reference = reference.to_string();
        let repeated = previous.as_deref() == Some(reference.as_str());

        match resolve_reference(id, &reference, corpus) {
            Ok(resolution) => {
                run.link = Some(match &resolution {
                    Resolution::Article(a) => Link::Article(a.clone()),
                    Resolution::Asset(p) => Link::Asset(p.clone()),
                });
                partial.links.push(ResolvedLink {
                    source: id.clone(),
                    target: resolution,
                    reference: reference.clone(),
                });
            }
            Err(e) => {
                if !repeated {
                    log::debug!("{e}");
                    partial.diagnostics.push(
                        Diagnostic::new(DiagnosticKind::BrokenReference, reference.clone())
                            .for_article(id),
                    );
                }
            }
        }
        previous = Some(reference);
    }
}

/// Rewrites relative image urls to their corpus paths.
fn resolve_images(
    id: &ArticleId,
    block: &mut Block,
    corpus: &Corpus,
    partial: &mut PartialResolution,
) {
    match block {
        Block::ImageEmbed { url, .. } => {
            let Some(reference) = Link::classify(url).as_reference().map(str::to_string) else {
                return;
            };
            match resolve_reference(id, &reference, corpus) {
                Ok(resolution) => {
                    if let Resolution::Asset(path) = &resolution {
                        *url = path.to_string();
                    }
                    partial.links.push(ResolvedLink {
                        source: id.clone(),
                        target: resolution,
                        reference,
                    });
                }
                Err(e) => {
                    log::debug!("{e}");
                    partial.diagnostics.push(
                        Diagnostic::new(DiagnosticKind::BrokenReference, reference).for_article(id),
                    );
                }
            }
        }
        Block::Quote(q) | Block::EmptyQuotePlaceholder(q) => {
            for child in &mut q.children {
                resolve_images(id, child, corpus, partial);
            }
        }
        _ => {}
    }
}

/// Full identifiers such as `checking/check-level1` are taken as is. Bare
/// slugs are looked up by name, preferring the source's own section. Any
/// other target is resolved as a path relative to the source.
fn resolve_config_target(from: &ArticleId, target: &str, corpus: &Corpus) -> Option<ArticleId> {
    let target = target.trim();
    if !target.contains('/') {
        return corpus.find_slug(target, from.section()).cloned();
    }
    let id = ArticleId::from(target);
    if corpus.contains(&id) {
        return Some(id);
    }
    match resolve_reference(from, target, corpus) {
        Ok(Resolution::Article(id)) => Some(id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, Section};
    use crate::parsing::convert_corpus;
    use pretty_assertions::assert_eq;

    fn article(id: &str, body: &str) -> Article {
        let id = ArticleId::from(id);
        let section = id.section().unwrap();
        Article::new(id, section, body)
    }

    fn corpus() -> Corpus {
        [
            article(
                "translate/figs-metaphor",
                "See [simile](../figs-simile/01.md) and [checking](../../checking/check-level1).\n\
                 Broken [here](../nonexistent).\n\
                 ![chart](../../images/chart.png)",
            ),
            article("translate/figs-simile", "A simile is like a [metaphor](../figs-metaphor)."),
            article("checking/check-level1", "Level one."),
            article("intro/ta-intro", "Welcome."),
        ]
        .into_iter()
        .collect()
    }

    fn config() -> RelationshipConfig {
        let mut config = RelationshipConfig::new();
        let metaphor = ArticleId::from("translate/figs-metaphor");
        config.add(metaphor.clone(), "figs-simile", RelationshipKind::Prerequisite);
        config.add(metaphor.clone(), "check-level1", RelationshipKind::Related);
        config.add(metaphor.clone(), "figs-metaphor", RelationshipKind::Related);
        config.add(metaphor.clone(), "no-such-slug", RelationshipKind::Prerequisite);
        config.add(
            ArticleId::from("intro/ta-intro"),
            "../../translate/figs-metaphor",
            RelationshipKind::ParentChild,
        );
        config
    }

    #[test]
    fn resolves_links_and_edges() {
        // Given a small corpus and relationship config
        let corpus = corpus();
        let converted = convert_corpus(&corpus);
        let config = config();

        // When the graph is built
        let build = build_graph(&corpus, &converted, &config);

        // Then links resolve relative to each article
        let metaphor = ArticleId::from("translate/figs-metaphor");
        let targets: Vec<_> = build
            .graph
            .links_from(&metaphor)
            .map(|l| l.target.clone())
            .collect();
        assert_eq!(
            targets,
            vec![
                Resolution::Article(ArticleId::from("checking/check-level1")),
                Resolution::Article(ArticleId::from("translate/figs-simile")),
                Resolution::Asset("images/chart.png".into()),
            ]
        );
        assert_eq!(
            build
                .graph
                .links_to(&metaphor)
                .map(|l| l.source.to_string())
                .collect::<Vec<_>>(),
            vec!["translate/figs-simile"]
        );

        // And edges come from the config
        let simile = ArticleId::from("translate/figs-simile");
        let check = ArticleId::from("checking/check-level1");
        assert_eq!(
            build.graph.prerequisites_of(&metaphor).collect::<Vec<_>>(),
            vec![&simile]
        );
        assert_eq!(
            build.graph.dependents_of(&simile).collect::<Vec<_>>(),
            vec![&metaphor]
        );
        assert_eq!(
            build.graph.related_to(&check).collect::<Vec<_>>(),
            vec![&metaphor]
        );
        assert_eq!(
            build.graph.related_to(&metaphor).collect::<Vec<_>>(),
            vec![&check]
        );
        assert_eq!(
            build
                .graph
                .children_of(&ArticleId::from("intro/ta-intro"))
                .collect::<Vec<_>>(),
            vec![&metaphor]
        );
        assert_eq!(build.graph.edge_count(), 4);
    }

    #[test]
    fn broken_references_are_reported_and_skipped() {
        let corpus = corpus();
        let converted = convert_corpus(&corpus);
        let build = build_graph(&corpus, &converted, &config());

        let broken: Vec<_> = build
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::BrokenReference)
            .map(|d| d.text.as_str())
            .collect();
        assert_eq!(broken, vec!["../nonexistent", "no-such-slug"]);
        assert!(
            build
                .diagnostics
                .iter()
                .all(|d| d.article == Some(ArticleId::from("translate/figs-metaphor")))
        );
    }

    #[test]
    fn output_documents_are_rewritten_copies() {
        // Given a converted corpus
        let corpus = corpus();
        let converted = convert_corpus(&corpus);

        // When the graph is built
        let build = build_graph(&corpus, &converted, &RelationshipConfig::new());

        // Then the output copy carries resolved targets
        let metaphor = ArticleId::from("translate/figs-metaphor");
        let links = build.documents[&metaphor].links();
        assert!(links.contains(&&Link::Article(ArticleId::from("translate/figs-simile"))));
        assert!(links.contains(&&Link::Reference("../nonexistent".into())));

        // And the parsed tree still holds the raw references
        let original = converted[&metaphor].document.references();
        assert_eq!(
            original,
            vec![
                "../figs-simile/01.md",
                "../../checking/check-level1",
                "../nonexistent"
            ]
        );
    }

    #[test]
    fn build_is_idempotent() {
        let corpus = corpus();
        let converted = convert_corpus(&corpus);
        let config = config();

        let first = build_graph(&corpus, &converted, &config);
        let second = build_graph(&corpus, &converted, &config);

        assert_eq!(first.graph, second.graph);
        assert_eq!(first.documents, second.documents);
        assert_eq!(first.diagnostics, second.diagnostics);
    }

    #[test]
    fn split_link_label_is_one_broken_occurrence() {
        let corpus: Corpus = [article("translate/a", "[**bold** rest](../missing)")]
            .into_iter()
            .collect();
        let converted = convert_corpus(&corpus);

        let build = build_graph(&corpus, &converted, &RelationshipConfig::new());

        assert_eq!(build.diagnostics.count(DiagnosticKind::BrokenReference), 1);
    }

    #[test]
    fn duplicate_config_entries_collapse() {
        let corpus = corpus();
        let mut config = RelationshipConfig::new();
        let metaphor = ArticleId::from("translate/figs-metaphor");
        config.add(metaphor.clone(), "figs-simile", RelationshipKind::Related);
        config.add(
            ArticleId::from("translate/figs-simile"),
            "figs-metaphor",
            RelationshipKind::Related,
        );

        let build = build_graph(&corpus, &BTreeMap::new(), &config);

        assert_eq!(build.graph.edge_count(), 2);
        assert!(build.documents.is_empty());
    }

    #[test]
    fn full_identifier_target_resolves_across_sections() {
        // Given a prerequisite written as a full corpus identifier
        let corpus = corpus();
        let metaphor = ArticleId::from("translate/figs-metaphor");
        let check = ArticleId::from("checking/check-level1");
        let mut config = RelationshipConfig::new();
        config.add(
            metaphor.clone(),
            "checking/check-level1",
            RelationshipKind::Prerequisite,
        );

        // When the graph is built
        let build = build_graph(&corpus, &BTreeMap::new(), &config);

        // Then the edge points at that article
        assert_eq!(build.graph.edge_count(), 1);
        assert!(build.graph.contains_edge(&metaphor, &check, RelationshipKind::Prerequisite));
        assert!(build.diagnostics.is_empty());
    }

    #[test]
    fn image_urls_resolve_to_assets() {
        // Given an article embedding a relative image and a remote one
        let corpus: Corpus = [article(
            "translate/figs-metaphor",
            "![chart](../../images/chart.png)\n\n> ![remote](https://cdn.example.org/x.png)",
        )]
        .into_iter()
        .collect();
        let converted = convert_corpus(&corpus);

        // When the graph is built
        let build = build_graph(&corpus, &converted, &RelationshipConfig::new());

        // Then the relative image is rewritten and recorded as an asset link
        let metaphor = ArticleId::from("translate/figs-metaphor");
        let urls: Vec<_> = build.documents[&metaphor]
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::ImageEmbed { url, .. } => Some(url.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(urls, vec!["images/chart.png", "https://cdn.example.org/x.png"]);
        assert_eq!(
            build.graph.links().cloned().collect::<Vec<_>>(),
            vec![ResolvedLink {
                source: metaphor.clone(),
                target: Resolution::Asset("images/chart.png".into()),
                reference: "../../images/chart.png".into(),
            }]
        );

        // And the parsed tree keeps the url as written
        assert!(matches!(
            &converted[&metaphor].document.blocks[0],
            Block::ImageEmbed { url, .. } if url == "../../images/chart.png"
        ));
    }

    #[test]
    fn unknown_config_source_is_reported() {
        let corpus = corpus();
        let mut config = RelationshipConfig::new();
        config.add(
            ArticleId::new(Section::Process, "gone"),
            "ta-intro",
            RelationshipKind::Prerequisite,
        );

        let build = build_graph(&corpus, &BTreeMap::new(), &config);

        assert_eq!(build.graph.edge_count(), 0);
        assert_eq!(build.diagnostics.count(DiagnosticKind::BrokenReference), 1);
    }
}
