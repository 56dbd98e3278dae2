//! Channel name validation.

/// Maximum channel name length in bytes.
pub const MAX_CHANNEL_LEN: usize = 50;

/// Channel name inspection helpers on string slices.
pub trait ChannelExt {
    /// Whether this string is a well-formed channel name: a `#` or `&` sigil
    /// followed by up to 49 bytes containing no space, comma, BEL, NUL, CR,
    /// or LF.
    fn is_channel_name(&self) -> bool;
}

impl ChannelExt for str {
    fn is_channel_name(&self) -> bool {
        if self.len() < 2 || self.len() > MAX_CHANNEL_LEN {
            return false;
        }
        let mut chars = self.chars();
        if !matches!(chars.next(), Some('#' | '&')) {
            return false;
        }
        chars.all(|c| !matches!(c, ' ' | ',' | '\u{7}' | '\0' | '\r' | '\n'))
    }
}
