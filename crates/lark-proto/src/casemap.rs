//! IRC case mapping.
//!
//! IRC comparisons are case-insensitive under the `rfc1459` mapping, where a
//! few bracket characters are additionally considered equivalent to their
//! shifted counterparts (`[`/`{`, `]`/`}`, `\`/`|`, `~`/`^`).

/// Map one character to its IRC lowercase form.
#[inline]
pub const fn irc_lower_char(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        'A'..='Z' => (c as u8 + 32) as char,
        _ => c,
    }
}

/// Lowercase a string under the RFC 1459 mapping.
pub fn irc_to_lower(s: &str) -> String {
    s.chars().map(irc_lower_char).collect()
}

/// Compare two strings case-insensitively under the RFC 1459 mapping.
pub fn irc_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.chars()
        .zip(b.chars())
        .all(|(ca, cb)| irc_lower_char(ca) == irc_lower_char(cb))
}
