pub struct ThematicBreak;

impl ThematicBreak {
    /// Three or more of the same `-`, `*` or `_`, optionally space separated.
    pub fn matches(line: &str) -> bool {
        let mut marker = None;
        let mut count = 0usize;
        for c in line.trim().chars() {
            match c {
                ' ' | '\t' => continue,
                '-' | '*' | '_' if marker.is_none_or(|m| m == c) => {
                    marker = Some(c);
                    count += 1;
                }
                _ => return false,
            }
        }
        count >= 3
    }
}
