//! Per-connection outbound queue.

use std::collections::VecDeque;
use std::io;

use bytes::Bytes;
use lark_proto::frame;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Queue of framed lines awaiting delivery on one connection.
///
/// A partial write leaves the head line in place with `offset` recording how
/// far into it delivery got, so the next flush resumes mid-line. Lines always
/// go out complete and in order.
#[derive(Debug, Default)]
pub struct SendQueue {
    lines: VecDeque<Bytes>,
    offset: usize,
}

impl SendQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Frame `line` and append it to the queue.
    pub fn push(&mut self, line: &str) {
        self.lines.push_back(Bytes::from(frame(line)));
    }

    /// Write queued lines to `writer` until the queue drains or the writer
    /// errors. A short write updates the head offset and keeps going.
    pub async fn flush<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while let Some(head) = self.lines.front() {
            let n = writer.write(&head[self.offset..]).await?;
            if n == 0 {
                return Err(io::ErrorKind::WriteZero.into());
            }
            self.offset += n;
            if self.offset == head.len() {
                self.lines.pop_front();
                self.offset = 0;
            }
        }
        writer.flush().await
    }
}
