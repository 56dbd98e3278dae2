//! # lark-proto
//!
//! Protocol primitives for the larkd chat server: the IRC message grammar,
//! numeric reply codes, RFC 1459 case mapping, nickname and channel-name
//! validation, line length limits, and comma-list splitting for command
//! targets.
//!
//! With the `tokio` feature enabled the crate also provides [`LineCodec`],
//! a `tokio_util` codec implementing the framing rules.
//!
//! ## Quick start
//!
//! ```rust
//! use lark_proto::Message;
//!
//! let msg: Message = ":alice PRIVMSG #rust :hello there".parse().unwrap();
//! assert_eq!(msg.prefix.as_deref(), Some("alice"));
//! assert_eq!(msg.command, "PRIVMSG");
//! assert_eq!(msg.params, vec!["#rust", "hello there"]);
//! ```

pub mod casemap;
pub mod chan;
pub mod error;
pub mod line;
pub mod message;
pub mod nick;
pub mod response;
pub mod split;

#[cfg(feature = "tokio")]
pub mod codec;

pub use self::casemap::{irc_eq, irc_lower_char, irc_to_lower};
pub use self::chan::ChannelExt;
pub use self::error::{MessageParseError, ProtocolError};
pub use self::line::{MAX_CONTENT_LEN, MAX_LINE_LEN, clamp_content, frame};
pub use self::message::{MAX_PARAMS, Message};
pub use self::nick::{MAX_NICK_LEN, NickExt};
pub use self::response::Response;
pub use self::split::split_list;

#[cfg(feature = "tokio")]
pub use self::codec::LineCodec;
