pub mod diagnostics;
pub mod enrich;
pub mod graph;
pub mod io;
pub mod models;
pub mod parsing;
pub mod resolve;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use enrich::{ArticleMetadata, TsvTable};
pub use graph::{
    CrossReferenceGraph, GraphBuild, RelationshipConfig, RelationshipEdge, RelationshipKind,
    ResolvedLink, build_graph,
};
pub use io::*;
pub use models::*;
pub use parsing::{ConvertedArticle, convert_article, convert_corpus, convert_markdown};
pub use resolve::{Resolution, ResolveError, resolve_reference};
