pub struct Heading;

impl Heading {
    pub const MARKER: u8 = b'#';
    pub const MAX_LEVEL: usize = 6;

    /// `#`..`######` followed by whitespace or end of line.
    pub fn parse(line: &str) -> Option<(u8, &str)> {
        let t = line.trim_start();
        let level = t.bytes().take_while(|b| *b == Self::MARKER).count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        let rest = &t[level..];
        if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
            return None;
        }
        let text = rest.trim();
        let closed = text.trim_end_matches('#');
        let text = if closed.is_empty() || closed.ends_with([' ', '\t']) {
            closed.trim_end()
        } else {
            text
        };
        Some((level as u8, text))
    }
}
