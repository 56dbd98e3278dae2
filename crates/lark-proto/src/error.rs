//! Error types for the protocol library.

use thiserror::Error;

/// Convenience alias for results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be parsed into a message.
    #[error("invalid message: {0}")]
    InvalidMessage(#[from] MessageParseError),
}

/// Errors from parsing a single protocol line.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MessageParseError {
    /// The line was empty after stripping the delimiter.
    #[error("empty message")]
    Empty,

    /// No command verb was found after the optional prefix.
    #[error("no command after prefix")]
    MissingCommand,
}
