#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";

    pub fn sig(line: &str) -> Option<FenceKind> {
        let t = line.trim();
        if t.starts_with(Self::BACKTICKS) {
            Some(FenceKind::Backticks)
        } else if t.starts_with(Self::TILDES) {
            Some(FenceKind::Tildes)
        } else {
            None
        }
    }

    /// Info string after an opening fence, e.g. `rust` in "```rust".
    pub fn language(line: &str) -> Option<String> {
        let t = line.trim();
        let info = t.trim_start_matches(['`', '~']).trim();
        info.split_whitespace().next().map(str::to_string)
    }

    pub fn closes(kind: FenceKind, line: &str) -> bool {
        let t = line.trim();
        Self::sig(t) == Some(kind) && t.trim_start_matches(['`', '~']).trim().is_empty()
    }
}
