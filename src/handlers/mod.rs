//! Command handlers and dispatch.
//!
//! Every command is a [`Handler`] registered in the [`CommandTable`] with
//! its registration and arity requirements. The table performs those checks
//! so the handlers themselves only deal with command semantics.

mod channel;
mod connection;
mod messaging;
mod user_query;

use std::collections::HashMap;

use lark_proto::{Message, Response};
use thiserror::Error;
use tracing::debug;

use crate::state::{ClientId, Registry};

pub use channel::{JoinHandler, ListHandler, PartHandler};
pub use connection::{NickHandler, QuitHandler, UserHandler};
pub use messaging::PrivmsgHandler;
pub use user_query::WhoHandler;

/// Why a handler tore the connection down.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The client quit; the connection should be closed after the handler
    /// returns. Carries the reason already broadcast to channel peers.
    #[error("client quit: {}", .0.as_deref().unwrap_or("no reason"))]
    Quit(Option<String>),
}

pub type HandlerResult = Result<(), HandlerError>;

/// Everything a handler may touch while processing one command.
pub struct Context<'a> {
    pub registry: &'a mut Registry,
    pub server_name: &'a str,
    pub motd: &'a [String],
    pub client_id: ClientId,
}

impl Context<'_> {
    /// Send a numeric reply to the current client.
    pub fn reply(&self, code: Response, params: impl IntoIterator<Item = impl Into<String>>) {
        if let Some(client) = self.registry.get(self.client_id) {
            client.send(&Message::numeric(self.server_name, code, params));
        }
    }

    /// Flip the client to registered once both NICK and USER have arrived,
    /// then greet it with the message of the day.
    pub fn try_complete_registration(&mut self) {
        let Some(client) = self.registry.get_mut(self.client_id) else {
            return;
        };
        if client.registered || client.nick.is_none() || client.user.is_none() {
            return;
        }
        client.registered = true;
        debug!(client = %self.client_id, nick = ?client.nick, "client registered");
        self.send_motd();
    }

    /// Send the 375/372/376 MOTD sequence.
    pub fn send_motd(&self) {
        self.reply(
            Response::RPL_MOTDSTART,
            [format!("- {} Message of the day - ", self.server_name)],
        );
        for line in self.motd {
            self.reply(Response::RPL_MOTD, [line.as_str()]);
        }
        self.reply(Response::RPL_ENDOFMOTD, ["End of /MOTD command"]);
    }
}

/// One command's implementation.
pub trait Handler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult;
}

struct CommandSpec {
    /// Whether the client must be registered before this command runs.
    needs_registration: bool,
    /// Minimum parameter count, checked before the handler runs.
    min_params: usize,
    handler: Box<dyn Handler + Send>,
}

/// The dispatch table mapping verbs to handlers.
pub struct CommandTable {
    commands: HashMap<&'static str, CommandSpec>,
}

impl CommandTable {
    /// Build the table with every supported command.
    pub fn new() -> Self {
        let mut table = Self {
            commands: HashMap::new(),
        };
        table.register("NICK", false, 0, Box::new(NickHandler));
        table.register("USER", false, 4, Box::new(UserHandler));
        table.register("QUIT", true, 0, Box::new(QuitHandler));
        table.register("JOIN", true, 1, Box::new(JoinHandler));
        table.register("PART", true, 1, Box::new(PartHandler));
        table.register("LIST", true, 0, Box::new(ListHandler));
        table.register("PRIVMSG", true, 0, Box::new(PrivmsgHandler));
        table.register("WHO", true, 0, Box::new(WhoHandler));
        table
    }

    fn register(
        &mut self,
        verb: &'static str,
        needs_registration: bool,
        min_params: usize,
        handler: Box<dyn Handler + Send>,
    ) {
        self.commands.insert(
            verb,
            CommandSpec {
                needs_registration,
                min_params,
                handler,
            },
        );
    }

    /// Look up and run the handler for `msg`, applying the registration and
    /// arity gates first.
    pub fn dispatch(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let verb = msg.command.to_ascii_uppercase();
        let Some(spec) = self.commands.get(verb.as_str()) else {
            debug!(client = %ctx.client_id, %verb, "unknown command");
            ctx.reply(
                Response::ERR_UNKNOWNCOMMAND,
                [verb.as_str(), "Unknown Command"],
            );
            return Ok(());
        };

        let registered = ctx
            .registry
            .get(ctx.client_id)
            .is_some_and(|c| c.registered);
        if spec.needs_registration && !registered {
            ctx.reply(Response::ERR_NOTREGISTERED, ["You have not registered"]);
            return Ok(());
        }
        if msg.params.len() < spec.min_params {
            ctx.reply(
                Response::ERR_NEEDMOREPARAMS,
                [verb.as_str(), "Not enough parameters"],
            );
            return Ok(());
        }

        spec.handler.handle(ctx, msg)
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}
