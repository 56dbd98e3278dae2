//! Comma-list tokenizing for command handlers.

/// Split a comma-style list into its non-empty items.
pub fn split_list(input: &str, delim: char) -> Vec<&str> {
    input.split(delim).filter(|s| !s.is_empty()).collect()
}
