//! Connection lifecycle commands: NICK, USER, QUIT.

use lark_proto::{Message, NickExt, Response};
use tracing::info;

use crate::state::MAX_USER_LEN;

use super::{Context, Handler, HandlerError, HandlerResult};

/// NICK: claim or change a nickname.
pub struct NickHandler;

impl Handler for NickHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Some(nick) = msg.params.first() else {
            ctx.reply(Response::ERR_NONICKNAMEGIVEN, ["No nickname given"]);
            return Ok(());
        };
        if !nick.is_valid_nick() {
            ctx.reply(
                Response::ERR_ERRONEUSNICKNAME,
                [nick.as_str(), "Erroneus nickname"],
            );
            return Ok(());
        }
        let taken_by_other = ctx
            .registry
            .by_nick(nick)
            .is_some_and(|c| c.id != ctx.client_id);
        if taken_by_other {
            ctx.reply(
                Response::ERR_NICKNAMEINUSE,
                [nick.as_str(), "Nickname is already in use"],
            );
            return Ok(());
        }

        // A registered client changing nick announces it to channel peers.
        if let Some(client) = ctx.registry.get(ctx.client_id) {
            if client.registered {
                if let (Some(old), Some(key)) = (&client.nick, client.channel.clone()) {
                    let notice = format!(":{old} NICK {nick}");
                    ctx.registry
                        .broadcast(&key, &notice, Some(ctx.client_id));
                }
            }
        }

        ctx.registry.set_nick(ctx.client_id, nick);
        ctx.try_complete_registration();
        Ok(())
    }
}

/// USER: supply username and real name.
pub struct UserHandler;

impl Handler for UserHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let already_set = ctx
            .registry
            .get(ctx.client_id)
            .is_some_and(|c| c.user.is_some());
        if already_set {
            ctx.reply(Response::ERR_ALREADYREGISTRED, ["You may not register"]);
            return Ok(());
        }
        if let Some(client) = ctx.registry.get_mut(ctx.client_id) {
            let mut user = msg.params[0].clone();
            if user.len() > MAX_USER_LEN {
                let mut end = MAX_USER_LEN;
                while !user.is_char_boundary(end) {
                    end -= 1;
                }
                user.truncate(end);
            }
            client.user = Some(user);
            client.realname = Some(msg.params[3].clone());
        }
        ctx.try_complete_registration();
        Ok(())
    }
}

/// QUIT: leave the server, telling channel peers why.
pub struct QuitHandler;

impl Handler for QuitHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let reason = msg
            .params
            .first()
            .cloned()
            .unwrap_or_else(|| "Bye Bye".to_owned());
        if let Some(client) = ctx.registry.get(ctx.client_id) {
            info!(client = %ctx.client_id, nick = ?client.nick, %reason, "client quitting");
            if let (Some(nick), Some(key)) = (&client.nick, client.channel.clone()) {
                let notice = format!(":{nick} QUIT :{reason}");
                ctx.registry.broadcast(&key, &notice, Some(ctx.client_id));
            }
        }
        Err(HandlerError::Quit(Some(reason)))
    }
}
