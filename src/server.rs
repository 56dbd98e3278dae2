//! The event loop: single owner of all server state.
//!
//! Connection tasks never touch the registry. They translate socket
//! activity into [`Event`]s and everything else happens here, one event at
//! a time, so handlers see a consistent world without locks.

use std::net::SocketAddr;

use lark_proto::{Message, MessageParseError, Response};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::handlers::{CommandTable, Context, HandlerError};
use crate::network::{spawn_connection, Listener};
use crate::state::{Client, ClientId, Registry};

/// What the connection tasks report to the event loop.
pub enum Event {
    /// A connection was accepted and its hostname resolved.
    Accepted {
        id: ClientId,
        stream: TcpStream,
        addr: SocketAddr,
        hostname: String,
    },
    /// A complete line arrived from a client.
    Line { id: ClientId, line: String },
    /// The connection ended: EOF, read error, or write error.
    Closed { id: ClientId },
}

/// The server: listener plus the event loop over all state.
pub struct Server {
    listener: Listener,
    state: EventLoop,
    events_rx: UnboundedReceiver<Event>,
    shutdown: CancellationToken,
}

impl Server {
    /// Bind the listen socket and prepare the event loop.
    pub async fn bind(config: Config) -> std::io::Result<Self> {
        let listener = Listener::bind(config.listen.address).await?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Ok(Self {
            listener,
            state: EventLoop {
                registry: Registry::new(config.limits.max_clients, config.limits.max_channels),
                table: CommandTable::new(),
                server_name: config.server.name,
                motd: config.server.motd,
                events_tx,
            },
            events_rx,
            shutdown: CancellationToken::new(),
        })
    }

    /// Address actually bound, useful when configured with port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// A token that stops the server when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run the accept loop and the event loop until shut down.
    pub async fn run(self) {
        let Server {
            listener,
            mut state,
            mut events_rx,
            shutdown,
        } = self;
        tokio::spawn(listener.run(state.events_tx.clone(), shutdown.clone()));

        info!(server = %state.server_name, "event loop running");
        loop {
            let event = tokio::select! {
                () = shutdown.cancelled() => break,
                event = events_rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };
            match event {
                Event::Accepted {
                    id,
                    stream,
                    addr,
                    hostname,
                } => state.on_accepted(id, stream, addr, hostname),
                Event::Line { id, line } => state.on_line(id, &line),
                Event::Closed { id } => state.on_closed(id),
            }
        }
    }
}

/// The state-owning half of the server.
struct EventLoop {
    registry: Registry,
    table: CommandTable,
    server_name: String,
    motd: Vec<String>,
    events_tx: UnboundedSender<Event>,
}

impl EventLoop {
    fn on_accepted(&mut self, id: ClientId, stream: TcpStream, addr: SocketAddr, hostname: String) {
        if self.registry.at_capacity() {
            warn!(%addr, "at capacity, dropping connection");
            drop(stream);
            return;
        }
        let token = CancellationToken::new();
        let sender = spawn_connection(id, stream, self.events_tx.clone(), token.clone());
        self.registry
            .insert(Client::new(id, addr, hostname, sender, token));
    }

    fn on_line(&mut self, id: ClientId, line: &str) {
        if self.registry.get(id).is_none() {
            return;
        }
        let msg: Message = match line.parse() {
            Ok(msg) => msg,
            Err(MessageParseError::Empty) => return,
            Err(MessageParseError::MissingCommand) => {
                let ctx = Context {
                    registry: &mut self.registry,
                    server_name: &self.server_name,
                    motd: &self.motd,
                    client_id: id,
                };
                ctx.reply(Response::ERR_UNKNOWNCOMMAND, ["No Command Specified"]);
                return;
            }
        };
        let mut ctx = Context {
            registry: &mut self.registry,
            server_name: &self.server_name,
            motd: &self.motd,
            client_id: id,
        };
        match self.table.dispatch(&mut ctx, &msg) {
            Ok(()) => {}
            Err(HandlerError::Quit(_)) => self.teardown(id),
        }
    }

    /// EOF and socket errors go through the same path as an explicit QUIT so
    /// channel peers always hear about the departure.
    fn on_closed(&mut self, id: ClientId) {
        if self.registry.get(id).is_none() {
            return;
        }
        debug!(client = %id, "connection lost");
        if self.registry.get(id).is_some_and(|c| c.registered) {
            let quit = Message::new(None, "QUIT", ["Connection closed"]);
            let mut ctx = Context {
                registry: &mut self.registry,
                server_name: &self.server_name,
                motd: &self.motd,
                client_id: id,
            };
            let _ = self.table.dispatch(&mut ctx, &quit);
        }
        self.teardown(id);
    }

    fn teardown(&mut self, id: ClientId) {
        if let Some(client) = self.registry.remove_client(id) {
            client.close();
        }
    }
}
