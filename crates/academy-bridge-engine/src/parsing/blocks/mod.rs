//! # Block Parsing
//!
//! Two phases:
//!
//! 1. **Line classification** (`classify`): each line becomes a `LexedLine`
//!    with a `LineGroup` (heading, quote line, list line, fence, table row,
//!    blank, plain ...). Only fence state is carried between lines.
//! 2. **Tree building** (`builder`): a `BlockBuilder` groups lines into
//!    blocks, nests quotes through a `QuoteStack` and list items through a
//!    `ListStack`, and parses inline text as it goes.
//!
//! Syntax knowledge for each block kind lives in `kinds`.

pub mod builder;
pub mod classify;
pub mod containers;
pub mod kinds;
pub mod types;

pub use builder::BlockBuilder;
pub use classify::{MarkdownLineClassifier, lex};
pub use types::{LexedLine, LineGroup};
