/// Backtick code spans: raw zones kept verbatim with no inline parsing inside.
pub struct CodeSpan;

impl CodeSpan {
    pub const TICK: u8 = b'`';

    /// End (exclusive) of the code span opening at `open`, matching the
    /// opening backtick run length.
    pub fn end_at(s: &str, open: usize) -> Option<usize> {
        let b = s.as_bytes();
        let n = b[open..].iter().take_while(|c| **c == Self::TICK).count();
        if n == 0 {
            return None;
        }
        let mut j = open + n;
        while j < b.len() {
            if b[j] == Self::TICK {
                let m = b[j..].iter().take_while(|c| **c == Self::TICK).count();
                if m == n {
                    return Some(j + m);
                }
                j += m;
            } else {
                j += 1;
            }
        }
        None
    }
}
