/// Blockquote prefix handling.
pub struct BlockQuote;

impl BlockQuote {
    pub const PREFIX: char = '>';

    /// Strips blockquote prefixes from a line, returning (depth, byte_offset).
    ///
    /// Whitespace between markers is collapsed, so `> > x`, `>> x` and
    /// `>\t> x` are all depth 2.
    pub fn strip_prefixes(s: &str) -> (u8, usize) {
        let b = s.as_bytes();
        let mut i = 0usize;
        let mut depth = 0u8;

        loop {
            let mut j = i;
            while j < b.len() && matches!(b[j], b' ' | b'\t') {
                j += 1;
            }
            if j < b.len() && b[j] == (Self::PREFIX as u8) {
                depth = depth.saturating_add(1);
                i = j + 1;
                if i < b.len() && matches!(b[i], b' ' | b'\t') {
                    i += 1;
                }
            } else {
                break;
            }
        }
        (depth, i)
    }

    /// The literal `>` prefix of a line, used to keep quote context when a
    /// line is split in two.
    pub fn prefix_of(s: &str) -> &str {
        let (depth, idx) = Self::strip_prefixes(s);
        if depth == 0 { "" } else { &s[..idx] }
    }
}
