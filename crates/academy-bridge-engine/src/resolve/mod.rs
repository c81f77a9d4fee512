//! Resolution of in-corpus references to canonical identifiers.

use relative_path::RelativePathBuf;
use serde::Serialize;
use thiserror::Error;

use crate::models::{ArticleId, KnownArticles};
use crate::parsing::images::has_image_extension;

const ARTICLE_FILE: &str = "01.md";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("reference {reference:?} from {from} climbs above the corpus root")]
    EscapesCorpus { from: ArticleId, reference: String },
    #[error("reference {reference:?} from {from} names unknown article {target}")]
    UnknownArticle {
        from: ArticleId,
        reference: String,
        target: ArticleId,
    },
}

/// What a reference points at once resolved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Resolution {
    Article(ArticleId),
    /// An image path; accepted without checking it exists.
    Asset(RelativePathBuf),
}

/// Strips a `#fragment`, a trailing `01.md` component and trailing slashes.
pub fn normalize_reference(reference: &str) -> &str {
    let r = reference.trim();
    let r = r.split('#').next().unwrap_or(r);
    let r = r.strip_suffix(ARTICLE_FILE).unwrap_or(r);
    r.trim_end_matches('/')
}

/// Joins `reference` onto the location of `from`.
///
/// An article is a directory, so its own identifier is the base: `../x`
/// from `translate/a` names `translate/x`. `..` pops one segment, `.` is a
/// no-op, and a leading `/` starts from the corpus root.
pub fn resolve_path(from: &ArticleId, reference: &str) -> Result<RelativePathBuf, ResolveError> {
    let normalized = normalize_reference(reference);
    let mut segments: Vec<&str> = if normalized.starts_with('/') {
        vec![]
    } else {
        from.segments().collect()
    };

    for token in normalized.split('/') {
        match token {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(ResolveError::EscapesCorpus {
                        from: from.clone(),
                        reference: reference.to_string(),
                    });
                }
            }
            name => segments.push(name),
        }
    }

    Ok(RelativePathBuf::from(segments.join("/")))
}

/// Resolves a reference and checks the target exists.
///
/// Image paths resolve to opaque assets; everything else must name a known
/// article.
pub fn resolve_reference(
    from: &ArticleId,
    reference: &str,
    known: &impl KnownArticles,
) -> Result<Resolution, ResolveError> {
    let path = resolve_path(from, reference)?;
    if has_image_extension(path.as_str()) {
        return Ok(Resolution::Asset(path));
    }
    let target = ArticleId::from(path);
    if known.contains_article(&target) {
        Ok(Resolution::Article(target))
    } else {
        Err(ResolveError::UnknownArticle {
            from: from.clone(),
            reference: reference.to_string(),
            target,
        })
    }
}
