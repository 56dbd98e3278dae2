//! Wire line limits and framing.

/// Maximum length of a wire line including the trailing CR LF.
pub const MAX_LINE_LEN: usize = 512;

/// Maximum length of a line's content, excluding the trailing CR LF.
pub const MAX_CONTENT_LEN: usize = MAX_LINE_LEN - 2;

/// Truncate `line` to at most [`MAX_CONTENT_LEN`] bytes without splitting a
/// UTF-8 character.
pub fn clamp_content(line: &str) -> &str {
    if line.len() <= MAX_CONTENT_LEN {
        return line;
    }
    let mut end = MAX_CONTENT_LEN;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    &line[..end]
}

/// Frame `line` for the wire: clamp to the content limit and append CR LF.
pub fn frame(line: &str) -> String {
    let mut out = String::with_capacity(line.len().min(MAX_CONTENT_LEN) + 2);
    out.push_str(clamp_content(line));
    out.push_str("\r\n");
    out
}
