//! User queries: WHO.

use lark_proto::{split_list, Message, Response};

use super::{Context, Handler, HandlerResult};
use crate::state::{Client, ClientId};

/// WHO: list visible users.
///
/// With no arguments, lists every client not sharing a channel with the
/// sender. With arguments, each name that matches a channel is expanded to
/// its members; every name gets an ending 315 either way.
pub struct WhoHandler;

fn who_reply(ctx: &Context<'_>, target: &str, subject: &Client) {
    let trailing = format!("0 {}", subject.realname.as_deref().unwrap_or("*"));
    ctx.reply(
        Response::RPL_WHOREPLY,
        [
            target,
            subject.user.as_deref().unwrap_or("*"),
            subject.hostname.as_str(),
            ctx.server_name,
            subject.display_nick(),
            "H",
            trailing.as_str(),
        ],
    );
}

fn end_of_who(ctx: &Context<'_>, target: &str) {
    ctx.reply(Response::RPL_ENDOFWHO, [target, "End of/WHO list"]);
}

impl Handler for WhoHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        if msg.params.is_empty() {
            let own_channel = ctx
                .registry
                .get(ctx.client_id)
                .and_then(|c| c.channel.clone());
            let mut ids: Vec<ClientId> = ctx
                .registry
                .clients()
                .filter(|c| c.channel.is_none() || c.channel != own_channel)
                .map(|c| c.id)
                .collect();
            ids.sort();
            for id in ids {
                if let Some(subject) = ctx.registry.get(id) {
                    who_reply(ctx, "*", subject);
                }
            }
            end_of_who(ctx, "*");
            return Ok(());
        }

        for name in split_list(&msg.params[0], ',') {
            let members = ctx
                .registry
                .channel(name)
                .map(|c| c.members.clone())
                .unwrap_or_default();
            for id in members {
                if let Some(subject) = ctx.registry.get(id) {
                    who_reply(ctx, name, subject);
                }
            }
            end_of_who(ctx, name);
        }
        Ok(())
    }
}
