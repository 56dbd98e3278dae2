//! Line-based codec for tokio.
//!
//! Decodes newline-terminated lines, treating `\r` and `\n` interchangeably
//! so that CRLF, bare LF, and even reversed LFCR framing all work. Runs of
//! delimiters collapse and the empty lines between them are skipped.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{ProtocolError, Result};
use crate::line::{frame, MAX_LINE_LEN};

/// Line-based codec over a byte stream.
///
/// A line that reaches [`MAX_LINE_LEN`] bytes, terminated or not, is
/// discarded in its entirety rather than delivered truncated.
#[derive(Debug, Default)]
pub struct LineCodec {
    /// Index of next byte to check for a delimiter.
    next_index: usize,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_delim(b: u8) -> bool {
    b == b'\r' || b == b'\n'
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| is_delim(*b)) else {
                // No complete line yet. Remember where we stopped, and drop
                // the buffer outright once it can no longer hold a framed
                // line.
                self.next_index = src.len();
                if src.len() >= MAX_LINE_LEN {
                    src.clear();
                    self.next_index = 0;
                }
                return Ok(None);
            };

            let end = self.next_index + offset;
            let line = src.split_to(end);
            self.next_index = 0;

            // Consume the whole delimiter run.
            let run = src.iter().take_while(|b| is_delim(**b)).count();
            let _ = src.split_to(run);

            if line.is_empty() {
                continue;
            }
            // A line that would not have fit in the input buffer is dropped
            // whole, even when its terminator arrived in the same read.
            if line.len() >= MAX_LINE_LEN {
                continue;
            }
            return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> Result<()> {
        dst.extend_from_slice(frame(&msg).as_bytes());
        Ok(())
    }
}
