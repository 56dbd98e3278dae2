//! Per-connection reader and writer tasks.

use futures_util::StreamExt;
use lark_proto::LineCodec;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_util::codec::FramedRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::server::Event;
use crate::state::ClientId;

use super::SendQueue;

/// Start the reader and writer tasks for an accepted connection.
///
/// The reader turns wire lines into [`Event::Line`] and reports EOF or a
/// read error as [`Event::Closed`]. The writer drains the returned channel
/// through a [`SendQueue`]. Cancelling `token` makes the writer flush what
/// it holds and shut the socket down.
pub fn spawn_connection(
    id: ClientId,
    stream: TcpStream,
    events: UnboundedSender<Event>,
    token: CancellationToken,
) -> UnboundedSender<String> {
    let (read_half, mut write_half) = stream.into_split();
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();

    let reader_token = token.clone();
    let reader_events = events.clone();
    tokio::spawn(async move {
        let mut framed = FramedRead::new(read_half, LineCodec::new());
        loop {
            tokio::select! {
                () = reader_token.cancelled() => break,
                next = framed.next() => match next {
                    Some(Ok(line)) => {
                        trace!(client = %id, %line, "line received");
                        if reader_events.send(Event::Line { id, line }).is_err() {
                            break;
                        }
                    }
                    Some(Err(err)) => {
                        debug!(client = %id, %err, "read error");
                        let _ = reader_events.send(Event::Closed { id });
                        break;
                    }
                    None => {
                        debug!(client = %id, "connection closed by peer");
                        let _ = reader_events.send(Event::Closed { id });
                        break;
                    }
                },
            }
        }
    });

    tokio::spawn(async move {
        let mut queue = SendQueue::new();
        loop {
            tokio::select! {
                () = token.cancelled() => {
                    // Final flush so QUIT errors and goodbyes still land.
                    while let Ok(more) = line_rx.try_recv() {
                        queue.push(&more);
                    }
                    let _ = queue.flush(&mut write_half).await;
                    let _ = write_half.shutdown().await;
                    break;
                }
                line = line_rx.recv() => {
                    let Some(line) = line else {
                        let _ = queue.flush(&mut write_half).await;
                        let _ = write_half.shutdown().await;
                        break;
                    };
                    queue.push(&line);
                    while let Ok(more) = line_rx.try_recv() {
                        queue.push(&more);
                    }
                    if let Err(err) = queue.flush(&mut write_half).await {
                        debug!(client = %id, %err, "write error");
                        let _ = events.send(Event::Closed { id });
                        break;
                    }
                }
            }
        }
    });

    line_tx
}
