//! Reads a local checkout of the corpus.
//!
//! Layout: `<root>/<section>/<slug>/{title.md,sub-title.md,01.md}` plus
//! `<root>/<section>/{config.yaml,toc.yaml}`.

use crate::enrich::TsvTable;
use crate::graph::RelationshipConfig;
use crate::models::{Article, ArticleId, Corpus, Section};
use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};

const TITLE_FILE: &str = "title.md";
const SUBTITLE_FILE: &str = "sub-title.md";
const BODY_FILE: &str = "01.md";
const CONFIG_FILE: &str = "config.yaml";
const TOC_FILE: &str = "toc.yaml";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid corpus directory: {0}")]
    InvalidCorpusDir(String),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Read a corpus file, failing if it does not exist
pub fn read_file(relative_path: &RelativePath, root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

fn read_optional(relative_path: &RelativePath, root: &Path) -> Result<Option<String>, IoError> {
    match read_file(relative_path, root) {
        Ok(content) => Ok(Some(content)),
        Err(IoError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn validate_corpus_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidCorpusDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}

/// Load one article; `None` when its directory has no body file.
pub fn load_article(root: &Path, id: &ArticleId) -> Result<Option<Article>, IoError> {
    let Some(section) = id.section() else {
        return Err(IoError::InvalidCorpusDir(format!(
            "{id} is not under a known section"
        )));
    };
    let dir = id.as_path();

    let Some(body) = read_optional(&dir.join(BODY_FILE), root)? else {
        log::warn!("Skipping {id}: no {BODY_FILE}");
        return Ok(None);
    };
    let title = read_optional(&dir.join(TITLE_FILE), root)?.unwrap_or_default();
    let subtitle = read_optional(&dir.join(SUBTITLE_FILE), root)?.unwrap_or_default();

    Ok(Some(
        Article::new(id.clone(), section, body).with_title(title.trim(), subtitle.trim()),
    ))
}

/// Load every article of the given sections.
///
/// Missing sections are skipped with a warning.
pub fn load_corpus(root: &Path, sections: &[Section]) -> Result<Corpus, IoError> {
    validate_corpus_dir(root)?;

    let mut corpus = Corpus::new();
    for &section in sections {
        let section_dir = root.join(section.as_str());
        if !section_dir.is_dir() {
            log::warn!("Section directory {} not found", section_dir.display());
            continue;
        }

        for slug in article_dirs(&section_dir)? {
            let id = ArticleId::new(section, &slug);
            if let Some(article) = load_article(root, &id)? {
                corpus.insert(article);
            }
        }
    }

    log::info!("Loaded {} articles from {}", corpus.len(), root.display());
    Ok(corpus)
}

fn article_dirs(section_dir: &Path) -> Result<Vec<String>, IoError> {
    let mut slugs = Vec::new();
    for entry in fs::read_dir(section_dir).map_err(IoError::Io)? {
        let entry = entry.map_err(IoError::Io)?;
        let file_name = entry.file_name();
        if entry.path().is_dir()
            && let Some(name) = file_name.to_str()
            && !name.starts_with('.')
        {
            slugs.push(name.to_string());
        }
    }
    slugs.sort();
    Ok(slugs)
}

/// Load `config.yaml` and `toc.yaml` of every given section.
pub fn load_relationships(
    root: &Path,
    sections: &[Section],
) -> Result<RelationshipConfig, IoError> {
    validate_corpus_dir(root)?;

    let mut config = RelationshipConfig::new();
    for &section in sections {
        let dir = RelativePath::new(section.as_str());
        let config_yaml = read_optional(&dir.join(CONFIG_FILE), root)?;
        let toc_yaml = read_optional(&dir.join(TOC_FILE), root)?;
        config.merge(RelationshipConfig::from_section_yaml(
            section,
            config_yaml.as_deref(),
            toc_yaml.as_deref(),
        )?);
    }

    log::debug!("Loaded {} relationship entries", config.len());
    Ok(config)
}

pub fn read_tsv(path: &Path) -> Result<TsvTable, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(IoError::Io)?;
    Ok(TsvTable::parse(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RelationshipKind;
    use crate::tests::{create_test_article, create_test_corpus_dir, create_test_file};

    #[test]
    fn test_load_corpus() {
        // Given a corpus with two sections
        let corpus_dir = create_test_corpus_dir();
        create_test_article(
            &corpus_dir,
            "translate/figs-metaphor",
            "Metaphor\n",
            "What is a metaphor?\n",
            "# Description\n",
        );
        create_test_article(&corpus_dir, "checking/check-level1", "Level 1", "", "Body");
        create_test_file(&corpus_dir, "checking/notes.txt", "not an article");

        // When loading both sections
        let corpus = load_corpus(corpus_dir.path(), &Section::ALL).unwrap();

        // Then both articles are present with trimmed titles
        assert_eq!(corpus.len(), 2);
        let metaphor = corpus
            .get(&ArticleId::from("translate/figs-metaphor"))
            .unwrap();
        assert_eq!(metaphor.title, "Metaphor");
        assert_eq!(metaphor.subtitle, "What is a metaphor?");
        assert_eq!(metaphor.body, "# Description\n");
        assert_eq!(metaphor.section, Section::Translate);
    }

    #[test]
    fn test_missing_title_files_default_to_empty() {
        let corpus_dir = create_test_corpus_dir();
        create_test_file(&corpus_dir, "intro/ta-intro/01.md", "Welcome");

        let corpus = load_corpus(corpus_dir.path(), &[Section::Intro]).unwrap();

        let article = corpus.get(&ArticleId::from("intro/ta-intro")).unwrap();
        assert_eq!(article.title, "");
        assert_eq!(article.display_title(), "ta-intro");
    }

    #[test]
    fn test_article_without_body_is_skipped() {
        let corpus_dir = create_test_corpus_dir();
        create_test_file(&corpus_dir, "process/draft/title.md", "Draft");

        let corpus = load_corpus(corpus_dir.path(), &[Section::Process]).unwrap();

        assert!(corpus.is_empty());
    }

    #[test]
    fn test_only_requested_sections_load() {
        let corpus_dir = create_test_corpus_dir();
        create_test_article(&corpus_dir, "intro/ta-intro", "Intro", "", "x");
        create_test_article(&corpus_dir, "process/setup", "Setup", "", "x");

        let corpus = load_corpus(corpus_dir.path(), &[Section::Process]).unwrap();

        assert_eq!(
            corpus.ids().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["process/setup"]
        );
    }

    #[test]
    fn test_invalid_corpus_dir() {
        let result = load_corpus(Path::new("/this/path/does/not/exist"), &Section::ALL);
        assert!(matches!(result, Err(IoError::InvalidCorpusDir(_))));
    }

    #[test]
    fn test_load_relationships() {
        // Given section config and toc files
        let corpus_dir = create_test_corpus_dir();
        create_test_file(
            &corpus_dir,
            "translate/config.yaml",
            "figs-metaphor:\n  dependencies: [figs-simile]\n  recommended: [figs-idiom]\n",
        );
        create_test_file(
            &corpus_dir,
            "translate/toc.yaml",
            "sections:\n  - title: Figures\n    link: figs-intro\n    sections:\n      - title: Metaphor\n        link: figs-metaphor\n",
        );

        // When loading relationships
        let config = load_relationships(corpus_dir.path(), &Section::ALL).unwrap();

        // Then entries from both files are merged
        let kinds: Vec<_> = config.iter().map(|(_, e)| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RelationshipKind::ParentChild,
                RelationshipKind::Prerequisite,
                RelationshipKind::Related,
            ]
        );
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let corpus_dir = create_test_corpus_dir();
        create_test_file(&corpus_dir, "intro/config.yaml", "a: [b");

        let result = load_relationships(corpus_dir.path(), &[Section::Intro]);

        assert!(matches!(result, Err(IoError::Yaml(_))));
    }

    #[test]
    fn test_read_tsv() {
        let corpus_dir = create_test_corpus_dir();
        let path = create_test_file(
            &corpus_dir,
            "index.tsv",
            "Order\tTopic translationAcademy\n1\tMetaphor\n",
        );

        let table = read_tsv(&path).unwrap();
        assert_eq!(table.len(), 1);

        let missing = read_tsv(&corpus_dir.path().join("missing.tsv"));
        assert!(matches!(missing, Err(IoError::NotFound(_))));
    }
}
