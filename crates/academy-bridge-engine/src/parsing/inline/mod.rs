//! # Inline Parsing
//!
//! Turns one logical line into styled [`TextRun`](crate::models::TextRun)s.
//!
//! - **`kinds`**: constructs and the delimiters they own (code spans,
//!   emphasis, links/images/footnote references)
//! - **`cursor`**: byte `Cursor` used by the parser
//! - **`parser`**: `parse_rich_text()` entry point
//!
//! Code spans are raw zones. Links take precedence over emphasis, and the
//! link target is attached to every run produced from the label.

pub mod cursor;
pub mod kinds;
pub mod parser;

pub use parser::{InlineIssue, parse_rich_text, parse_rich_text_with};
