use std::collections::BTreeMap;
use std::fmt;

use relative_path::{RelativePath, RelativePathBuf};
use serde::{Deserialize, Serialize};

/// One of the four manuals the corpus is split into.
///
/// The declaration order is the canonical search order used when a bare
/// slug has to be located in "any section".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Intro,
    Process,
    Translate,
    Checking,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Intro,
        Section::Process,
        Section::Translate,
        Section::Checking,
    ];

    /// Directory name of the section inside the corpus checkout.
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Intro => "intro",
            Section::Process => "process",
            Section::Translate => "translate",
            Section::Checking => "checking",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    pub fn manual(self) -> Manual {
        match self {
            Section::Intro => Manual::Introduction,
            Section::Process => Manual::Process,
            Section::Translate => Manual::Translation,
            Section::Checking => Manual::Checking,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The published manual an article belongs to, derived from its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Manual {
    Introduction,
    Process,
    Translation,
    Checking,
}

impl Manual {
    pub fn display_name(self) -> &'static str {
        match self {
            Manual::Introduction => "Introduction",
            Manual::Process => "Process Manual",
            Manual::Translation => "Translation Manual",
            Manual::Checking => "Checking Manual",
        }
    }
}

/// Corpus-relative identity of an article, e.g. `translate/figs-metaphor`.
///
/// The article is a directory in the corpus (holding `title.md`,
/// `sub-title.md` and `01.md`), so relative references inside its body are
/// resolved against the identifier itself, not against its parent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(RelativePathBuf);

impl ArticleId {
    pub fn new(section: Section, slug: &str) -> Self {
        Self(RelativePathBuf::from(format!("{}/{}", section.as_str(), slug)))
    }

    pub fn as_path(&self) -> &RelativePath {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Path segments, skipping empty ones produced by stray separators.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.as_str().split('/').filter(|s| !s.is_empty())
    }

    /// The section named by the first segment, if it is a known one.
    pub fn section(&self) -> Option<Section> {
        self.segments().next().and_then(Section::from_name)
    }

    /// Final segment of the identifier (the article directory name).
    pub fn slug(&self) -> &str {
        self.0.file_name().unwrap_or_else(|| self.0.as_str())
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for ArticleId {
    fn from(path: &str) -> Self {
        Self(RelativePathBuf::from(path.trim_matches('/')))
    }
}

impl From<RelativePathBuf> for ArticleId {
    fn from(path: RelativePathBuf) -> Self {
        Self(path)
    }
}

/// A source article as delivered by the corpus provider.
///
/// Never mutated by the conversion pipeline; everything derived from it is a
/// new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub section: Section,
}

impl Article {
    pub fn new(id: ArticleId, section: Section, body: impl Into<String>) -> Self {
        Self {
            id,
            title: String::new(),
            subtitle: String::new(),
            body: body.into(),
            section,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        self.title = title.into();
        self.subtitle = subtitle.into();
        self
    }

    pub fn manual(&self) -> Manual {
        self.section.manual()
    }

    /// Title if present, otherwise the slug.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            self.id.slug()
        } else {
            &self.title
        }
    }
}

/// Lookup of the identifiers that exist in a corpus snapshot.
pub trait KnownArticles {
    fn contains_article(&self, id: &ArticleId) -> bool;
}

/// The full set of articles of one corpus snapshot, ordered by identifier.
#[derive(Debug, Default, Clone)]
pub struct Corpus {
    articles: BTreeMap<ArticleId, Article>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an article; a later article with the same identifier replaces the
    /// earlier one.
    pub fn insert(&mut self, article: Article) {
        self.articles.insert(article.id.clone(), article);
    }

    pub fn get(&self, id: &ArticleId) -> Option<&Article> {
        self.articles.get(id)
    }

    pub fn contains(&self, id: &ArticleId) -> bool {
        self.articles.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ArticleId> {
        self.articles.keys()
    }

    pub fn articles(&self) -> impl Iterator<Item = &Article> {
        self.articles.values()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Locates a bare slug, preferring `preferred` and then falling back to the
    /// other sections in canonical order.
    pub fn find_slug(&self, slug: &str, preferred: Option<Section>) -> Option<&ArticleId> {
        let order = preferred
            .into_iter()
            .chain(Section::ALL.into_iter().filter(|s| Some(*s) != preferred));
        for section in order {
            let candidate = ArticleId::new(section, slug);
            if let Some((id, _)) = self.articles.get_key_value(&candidate) {
                return Some(id);
            }
        }
        None
    }

    /// Keeps only the articles accepted by `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&Article) -> bool) {
        self.articles.retain(|_, article| keep(article));
    }
}

impl KnownArticles for Corpus {
    fn contains_article(&self, id: &ArticleId) -> bool {
        self.contains(id)
    }
}

impl KnownArticles for std::collections::BTreeSet<ArticleId> {
    fn contains_article(&self, id: &ArticleId) -> bool {
        self.contains(id)
    }
}

impl FromIterator<Article> for Corpus {
    fn from_iter<T: IntoIterator<Item = Article>>(iter: T) -> Self {
        let mut corpus = Corpus::new();
        for article in iter {
            corpus.insert(article);
        }
        corpus
    }
}
