//! # Snapshot Testing Support
//!
//! - **`outline`**: renders a `Document` as a stable indented text outline,
//!   used with `insta` inline snapshots and by the CLI `convert` command
//! - **`invariants`**: structural checks every converted document must pass

pub mod invariants;
pub mod outline;

pub use invariants::check as invariants;
pub use outline::outline;
