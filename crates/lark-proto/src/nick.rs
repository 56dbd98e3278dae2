//! Nickname validation.

/// Maximum nickname length in bytes.
pub const MAX_NICK_LEN: usize = 32;

const NICK_SPECIALS: &[char] = &['[', ']', '\\', '`', '_', '^', '{', '|', '}', '-'];

/// Nickname inspection helpers on string slices.
pub trait NickExt {
    /// Whether this string is a well-formed nickname: a leading ASCII letter
    /// followed by letters, digits, or the special characters
    /// `[ ] \ \` _ ^ { | } -`, at most [`MAX_NICK_LEN`] bytes total.
    fn is_valid_nick(&self) -> bool;
}

impl NickExt for str {
    fn is_valid_nick(&self) -> bool {
        if self.is_empty() || self.len() > MAX_NICK_LEN {
            return false;
        }
        let mut chars = self.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric() || NICK_SPECIALS.contains(&c))
    }
}
