//! Channel commands: JOIN, PART, LIST.

use lark_proto::{irc_to_lower, split_list, ChannelExt, Message, Response};
use tracing::debug;

use super::{Context, Handler, HandlerResult};

/// Leave the named channel, announcing the departure to every member
/// including the one leaving. Replies 442 and leaves state untouched if the
/// client is not actually in that channel.
fn leave_channel(ctx: &mut Context<'_>, name: &str) -> bool {
    let key = irc_to_lower(name);
    let Some(client) = ctx.registry.get(ctx.client_id) else {
        return false;
    };
    if client.channel.as_deref() != Some(key.as_str()) {
        ctx.reply(
            Response::ERR_NOTONCHANNEL,
            [name, "You're not on that channel"],
        );
        return false;
    }
    let nick = client.display_nick().to_owned();
    let shown = ctx
        .registry
        .channel(&key)
        .map_or_else(|| name.to_owned(), |c| c.name.clone());
    ctx.registry
        .broadcast(&key, &format!(":{nick} PART {shown}"), None);
    ctx.registry.remove_member(&key, ctx.client_id);
    true
}

/// JOIN: enter a channel, creating it on first use. A client is in at most
/// one channel, so joining implicitly parts the previous one. Only the
/// first name in a comma-separated list is honored.
pub struct JoinHandler;

impl Handler for JoinHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Some(&name) = split_list(&msg.params[0], ',').first() else {
            return Ok(());
        };
        let key = irc_to_lower(name);

        let already_in = ctx
            .registry
            .get(ctx.client_id)
            .is_some_and(|c| c.channel.as_deref() == Some(key.as_str()));
        if already_in {
            return Ok(());
        }
        if !name.is_channel_name() {
            ctx.reply(Response::ERR_NOSUCHCHANNEL, [name, "No such channel"]);
            return Ok(());
        }
        if ctx.registry.channel(name).is_none() && !ctx.registry.create_channel(name) {
            ctx.reply(
                Response::ERR_TOOMANYCHANNELS,
                [name, "Cannot join channel (+l)"],
            );
            return Ok(());
        }

        // Implicit part of the previous channel.
        let previous = ctx
            .registry
            .get(ctx.client_id)
            .and_then(|c| c.channel.clone());
        if let Some(prev) = previous {
            leave_channel(ctx, &prev);
        }

        ctx.registry.add_member(name, ctx.client_id);
        debug!(client = %ctx.client_id, channel = %key, "joined channel");

        let (nick, shown, names) = {
            let Some(channel) = ctx.registry.channel(name) else {
                return Ok(());
            };
            let names = channel
                .members
                .iter()
                .filter_map(|id| ctx.registry.get(*id))
                .map(|c| c.display_nick().to_owned())
                .collect::<Vec<_>>()
                .join(" ");
            let nick = ctx
                .registry
                .get(ctx.client_id)
                .map_or_else(|| "*".to_owned(), |c| c.display_nick().to_owned());
            (nick, channel.name.clone(), names)
        };
        ctx.reply(Response::RPL_NAMREPLY, [shown.as_str(), names.as_str()]);
        ctx.reply(
            Response::RPL_ENDOFNAMES,
            [shown.as_str(), "End of /NAMES list"],
        );
        ctx.registry
            .broadcast(&key, &format!(":{nick} JOIN {shown}"), None);
        Ok(())
    }
}

/// PART: leave one or more channels.
pub struct PartHandler;

impl Handler for PartHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        for name in split_list(&msg.params[0], ',') {
            if ctx.registry.channel(name).is_none() {
                ctx.reply(Response::ERR_NOSUCHCHANNEL, [name, "No such channel"]);
                continue;
            }
            leave_channel(ctx, name);
        }
        Ok(())
    }
}

/// LIST: enumerate every channel with its member count.
pub struct ListHandler;

impl Handler for ListHandler {
    fn handle(&self, ctx: &mut Context<'_>, _msg: &Message) -> HandlerResult {
        ctx.reply(Response::RPL_LISTSTART, ["Channel", "Users Name"]);
        let mut lines = ctx
            .registry
            .channels()
            .map(|c| (c.name.clone(), c.members.len().to_string()))
            .collect::<Vec<_>>();
        lines.sort();
        for (name, count) in lines {
            ctx.reply(Response::RPL_LIST, [name, count]);
        }
        ctx.reply(Response::RPL_LISTEND, ["End of /LIST"]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::Harness;

    #[test]
    fn join_sends_names_before_the_broadcast() {
        let mut h = Harness::new();
        let alice = h.register("alice");
        h.send(alice, "JOIN #rust").unwrap();
        assert_eq!(
            h.drain(alice),
            vec![
                ":lark.test 353 #rust alice",
                ":lark.test 366 #rust :End of /NAMES list",
                ":alice JOIN #rust",
            ]
        );
    }

    #[test]
    fn join_is_announced_to_existing_members() {
        let mut h = Harness::new();
        let alice = h.register("alice");
        let bob = h.register("bob");
        h.send(alice, "JOIN #rust").unwrap();
        h.drain(alice);

        h.send(bob, "JOIN #rust").unwrap();
        assert_eq!(h.drain(alice), vec![":bob JOIN #rust"]);
        assert_eq!(
            h.drain(bob),
            vec![
                ":lark.test 353 #rust :alice bob",
                ":lark.test 366 #rust :End of /NAMES list",
                ":bob JOIN #rust",
            ]
        );
    }

    #[test]
    fn join_rejects_invalid_names() {
        let mut h = Harness::new();
        let alice = h.register("alice");
        h.send(alice, "JOIN rust").unwrap();
        assert_eq!(h.drain(alice), vec![":lark.test 403 rust :No such channel"]);
    }

    #[test]
    fn join_uses_only_the_first_listed_channel() {
        let mut h = Harness::new();
        let alice = h.register("alice");
        h.send(alice, "JOIN #one,#two").unwrap();
        assert!(h.registry.channel("#one").is_some());
        assert!(h.registry.channel("#two").is_none());
    }

    #[test]
    fn rejoining_the_same_channel_is_a_noop() {
        let mut h = Harness::new();
        let alice = h.register("alice");
        h.send(alice, "JOIN #rust").unwrap();
        h.drain(alice);
        h.send(alice, "JOIN #RUST").unwrap();
        assert!(h.drain(alice).is_empty());
    }

    #[test]
    fn joining_a_second_channel_parts_the_first() {
        let mut h = Harness::new();
        let alice = h.register("alice");
        let bob = h.register("bob");
        h.send(alice, "JOIN #one").unwrap();
        h.send(bob, "JOIN #one").unwrap();
        h.drain(alice);
        h.drain(bob);

        h.send(alice, "JOIN #two").unwrap();
        assert_eq!(h.drain(bob), vec![":alice PART #one"]);
        assert_eq!(
            h.drain(alice),
            vec![
                ":alice PART #one",
                ":lark.test 353 #two alice",
                ":lark.test 366 #two :End of /NAMES list",
                ":alice JOIN #two",
            ]
        );
    }

    #[test]
    fn channel_cap_replies_405() {
        let mut h = Harness::with_limits(512, 1);
        let alice = h.register("alice");
        let bob = h.register("bob");
        h.send(bob, "JOIN #only").unwrap();
        h.drain(bob);

        h.send(alice, "JOIN #overflow").unwrap();
        assert_eq!(
            h.drain(alice),
            vec![":lark.test 405 #overflow :Cannot join channel (+l)"]
        );
        // Joining the existing channel still works at the cap.
        h.send(alice, "JOIN #only").unwrap();
        assert!(h.drain(alice).iter().any(|l| l.contains(" 366 ")));
    }

    #[test]
    fn part_leaves_and_deletes_empty_channel() {
        let mut h = Harness::new();
        let alice = h.register("alice");
        h.send(alice, "JOIN #rust").unwrap();
        h.drain(alice);
        h.send(alice, "PART #rust").unwrap();
        assert_eq!(h.drain(alice), vec![":alice PART #rust"]);
        assert!(h.registry.channel("#rust").is_none());
    }

    #[test]
    fn part_unknown_channel_gets_403() {
        let mut h = Harness::new();
        let alice = h.register("alice");
        h.send(alice, "PART #void").unwrap();
        assert_eq!(
            h.drain(alice),
            vec![":lark.test 403 #void :No such channel"]
        );
    }

    #[test]
    fn part_channel_not_joined_gets_442() {
        let mut h = Harness::new();
        let alice = h.register("alice");
        let bob = h.register("bob");
        h.send(bob, "JOIN #rust").unwrap();
        h.drain(bob);
        h.send(alice, "PART #rust").unwrap();
        assert_eq!(
            h.drain(alice),
            vec![":lark.test 442 #rust :You're not on that channel"]
        );
        assert_eq!(h.registry.channel("#rust").map(|c| c.members.len()), Some(1));
    }

    #[test]
    fn part_processes_every_listed_channel() {
        let mut h = Harness::new();
        let alice = h.register("alice");
        h.send(alice, "JOIN #two").unwrap();
        h.drain(alice);
        h.send(alice, "PART #one,#two").unwrap();
        let lines = h.drain(alice);
        assert_eq!(lines[0], ":lark.test 403 #one :No such channel");
        assert_eq!(lines[1], ":alice PART #two");
    }

    #[test]
    fn list_enumerates_channels() {
        let mut h = Harness::new();
        let alice = h.register("alice");
        let bob = h.register("bob");
        h.send(alice, "JOIN #a").unwrap();
        h.send(bob, "JOIN #b").unwrap();
        h.drain(alice);
        h.drain(bob);

        h.send(alice, "LIST").unwrap();
        assert_eq!(
            h.drain(alice),
            vec![
                ":lark.test 321 Channel :Users Name",
                ":lark.test 322 #a 1",
                ":lark.test 322 #b 1",
                ":lark.test 323 :End of /LIST",
            ]
        );
    }

    #[test]
    fn list_on_empty_server_has_only_start_and_end() {
        let mut h = Harness::new();
        let alice = h.register("alice");
        h.send(alice, "LIST").unwrap();
        assert_eq!(
            h.drain(alice),
            vec![
                ":lark.test 321 Channel :Users Name",
                ":lark.test 323 :End of /LIST",
            ]
        );
    }
}
