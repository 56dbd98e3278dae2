//! Message delivery: PRIVMSG.

use lark_proto::{irc_to_lower, split_list, Message, Response};

use super::{Context, Handler, HandlerResult};

/// PRIVMSG: deliver text to nicks and channels.
///
/// Channel delivery fans out to every member except the sender. Unknown
/// targets each get their own 401.
pub struct PrivmsgHandler;

impl Handler for PrivmsgHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        if msg.params.is_empty() {
            ctx.reply(Response::ERR_NORECIPIENT, ["No Recipient given (PRIVMSG)"]);
            return Ok(());
        }
        if msg.params.len() < 2 {
            ctx.reply(Response::ERR_NOTEXTTOSEND, ["No text to send"]);
            return Ok(());
        }
        let text = &msg.params[1];
        let sender = ctx
            .registry
            .get(ctx.client_id)
            .map_or_else(|| "*".to_owned(), |c| c.display_nick().to_owned());

        for target in split_list(&msg.params[0], ',') {
            if let Some(peer) = ctx.registry.by_nick(target) {
                peer.send_line(format!(":{sender} PRIVMSG {target} :{text}"));
                continue;
            }
            let key = irc_to_lower(target);
            if ctx.registry.channel(&key).is_some() {
                ctx.registry.broadcast(
                    &key,
                    &format!(":{sender} PRIVMSG {target} :{text}"),
                    Some(ctx.client_id),
                );
                continue;
            }
            ctx.reply(Response::ERR_NOSUCHNICK, [target, "No such nick/channel"]);
        }
        Ok(())
    }
}
