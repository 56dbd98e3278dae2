//! Wire message parsing and serialization.

use std::fmt;
use std::str::FromStr;

use crate::error::MessageParseError;
use crate::response::Response;

/// Maximum number of parameters a message may carry. Anything past the cap
/// is not parsed.
pub const MAX_PARAMS: usize = 10;

/// A parsed protocol message: an optional prefix, a command verb, and its
/// parameters.
///
/// Parsing tolerates repeated separating spaces and treats a parameter
/// introduced by `:` as trailing, consuming the remainder of the line.
///
/// ```
/// use lark_proto::Message;
///
/// let msg: Message = ":alice PRIVMSG #rust :hello there".parse().unwrap();
/// assert_eq!(msg.prefix.as_deref(), Some("alice"));
/// assert_eq!(msg.command, "PRIVMSG");
/// assert_eq!(msg.params, vec!["#rust", "hello there"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Sender prefix, without the leading `:`.
    pub prefix: Option<String>,
    /// Command verb, as received.
    pub command: String,
    /// Positional parameters, trailing parameter last.
    pub params: Vec<String>,
}

impl Message {
    /// Build a message from a command and parameter list.
    pub fn new(
        prefix: Option<&str>,
        command: &str,
        params: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            prefix: prefix.map(str::to_owned),
            command: command.to_owned(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a server numeric reply.
    pub fn numeric(
        server: &str,
        code: Response,
        params: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::new(Some(server), &code.to_string(), params)
    }
}

impl FromStr for Message {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rest = s.trim_start_matches(' ');
        if rest.is_empty() {
            return Err(MessageParseError::Empty);
        }

        let mut prefix = None;
        if let Some(after) = rest.strip_prefix(':') {
            let (word, tail) = split_word(after);
            if word.is_empty() {
                return Err(MessageParseError::MissingCommand);
            }
            prefix = Some(word.to_owned());
            rest = tail;
        }

        let (command, mut rest) = split_word(rest);
        if command.is_empty() {
            return Err(MessageParseError::MissingCommand);
        }

        let mut params = Vec::new();
        while !rest.is_empty() && params.len() < MAX_PARAMS {
            if let Some(trailing) = rest.strip_prefix(':') {
                params.push(trailing.to_owned());
                break;
            }
            let (word, tail) = split_word(rest);
            params.push(word.to_owned());
            rest = tail;
        }

        Ok(Message {
            prefix,
            command: command.to_owned(),
            params,
        })
    }
}

/// Split off the first space-delimited word, skipping any run of spaces
/// after it.
fn split_word(s: &str) -> (&str, &str) {
    match s.find(' ') {
        Some(i) => (&s[..i], s[i..].trim_start_matches(' ')),
        None => (s, ""),
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{prefix} ")?;
        }
        f.write_str(&self.command)?;
        let last = self.params.len().saturating_sub(1);
        for (i, param) in self.params.iter().enumerate() {
            if i == last && (param.is_empty() || param.contains(' ') || param.starts_with(':')) {
                write!(f, " :{param}")?;
            } else {
                write!(f, " {param}")?;
            }
        }
        Ok(())
    }
}
