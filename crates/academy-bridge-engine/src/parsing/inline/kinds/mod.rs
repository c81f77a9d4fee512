//! Inline constructs and the delimiters they own. The parser refers to
//! these constants and never hardcodes `[`, `**` or backticks itself.

pub mod code_span;
pub mod emphasis;
pub mod link;

pub use code_span::CodeSpan;
pub use emphasis::{Emphasis, is_word_byte};
pub use link::{LinkParse, LinkSpan, LinkSyntax};
