//! Per-connection client state.

use std::net::SocketAddr;

use lark_proto::Message;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Opaque connection identifier, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u64);

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Maximum stored length of a username in bytes.
pub const MAX_USER_LEN: usize = 31;

/// A connected client.
///
/// Identity fields stay `None` until the corresponding command arrives;
/// `registered` flips once both a nick and user info are present.
#[derive(Debug)]
pub struct Client {
    pub id: ClientId,
    pub addr: SocketAddr,
    /// Reverse-resolved hostname, or the textual address as a fallback.
    pub hostname: String,
    pub nick: Option<String>,
    pub user: Option<String>,
    pub realname: Option<String>,
    pub registered: bool,
    /// IRC-lowercased name of the channel this client is in, if any.
    pub channel: Option<String>,
    sender: UnboundedSender<String>,
    shutdown: CancellationToken,
}

impl Client {
    pub fn new(
        id: ClientId,
        addr: SocketAddr,
        hostname: String,
        sender: UnboundedSender<String>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            id,
            addr,
            hostname,
            nick: None,
            user: None,
            realname: None,
            registered: false,
            channel: None,
            sender,
            shutdown,
        }
    }

    /// The nick to show in replies before one is set.
    pub fn display_nick(&self) -> &str {
        self.nick.as_deref().unwrap_or("*")
    }

    /// Queue a raw line for delivery. Framing happens in the writer task.
    pub fn send_line(&self, line: impl Into<String>) {
        let line = line.into();
        trace!(client = %self.id, %line, "queueing line");
        // The writer task only goes away at teardown; a failed send just
        // means the connection is already closing.
        let _ = self.sender.send(line);
    }

    /// Queue a message for delivery.
    pub fn send(&self, msg: &Message) {
        self.send_line(msg.to_string());
    }

    /// Tell the connection tasks to flush and shut down.
    pub fn close(&self) {
        self.shutdown.cancel();
    }
}
