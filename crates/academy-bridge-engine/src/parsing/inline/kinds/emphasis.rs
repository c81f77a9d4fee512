/// Emphasis delimiters.
pub struct Emphasis;

impl Emphasis {
    pub const STAR: u8 = b'*';
    pub const UNDERSCORE: u8 = b'_';
}

/// Letters, digits and any non-ASCII byte count as word characters when
/// checking whether `_` sits inside a word.
pub fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b >= 0x80
}
