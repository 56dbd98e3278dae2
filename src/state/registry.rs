//! The registry: every connected client and every live channel.

use std::collections::HashMap;

use lark_proto::irc_to_lower;
use tracing::debug;

use super::{Channel, Client, ClientId};

/// Owner of all client and channel state.
///
/// Nick and channel lookups go through IRC-lowercased indexes, so `#Rust`
/// and `#rust` are the same channel and `Alice` cannot register while
/// `alice` is connected.
#[derive(Debug, Default)]
pub struct Registry {
    clients: HashMap<ClientId, Client>,
    /// IRC-lowercased nick to client id.
    nicks: HashMap<String, ClientId>,
    /// IRC-lowercased channel name to channel.
    channels: HashMap<String, Channel>,
    max_clients: usize,
    max_channels: usize,
}

impl Registry {
    pub fn new(max_clients: usize, max_channels: usize) -> Self {
        Self {
            max_clients,
            max_channels,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn at_capacity(&self) -> bool {
        self.clients.len() >= self.max_clients
    }

    pub fn insert(&mut self, client: Client) {
        debug!(client = %client.id, addr = %client.addr, "client connected");
        self.clients.insert(client.id, client);
    }

    pub fn get(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub fn get_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.clients.get_mut(&id)
    }

    /// Look up a client by nick, case-insensitively.
    pub fn by_nick(&self, nick: &str) -> Option<&Client> {
        let id = self.nicks.get(&irc_to_lower(nick))?;
        self.clients.get(id)
    }

    pub fn nick_in_use(&self, nick: &str) -> bool {
        self.nicks.contains_key(&irc_to_lower(nick))
    }

    /// Record `nick` for `id`, replacing any previous nick.
    pub fn set_nick(&mut self, id: ClientId, nick: &str) {
        if let Some(client) = self.clients.get_mut(&id) {
            if let Some(old) = client.nick.take() {
                self.nicks.remove(&irc_to_lower(&old));
            }
            client.nick = Some(nick.to_owned());
            self.nicks.insert(irc_to_lower(nick), id);
        }
    }

    /// Remove a client entirely: its nick index entry, its channel
    /// membership, and the channel itself when it empties out. Returns the
    /// removed client so the caller can finish the teardown.
    pub fn remove_client(&mut self, id: ClientId) -> Option<Client> {
        let client = self.clients.remove(&id)?;
        if let Some(nick) = &client.nick {
            self.nicks.remove(&irc_to_lower(nick));
        }
        if let Some(key) = &client.channel {
            self.remove_member(key, id);
        }
        debug!(client = %client.id, "client removed");
        Some(client)
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(&irc_to_lower(name))
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    /// Create a channel, or fail if the channel cap is reached.
    /// The channel keeps the casing of the first join.
    pub fn create_channel(&mut self, name: &str) -> bool {
        if self.channels.len() >= self.max_channels {
            return false;
        }
        self.channels
            .insert(irc_to_lower(name), Channel::new(name));
        true
    }

    /// Add `id` to `name`'s member list and point the client at it.
    pub fn add_member(&mut self, name: &str, id: ClientId) {
        let key = irc_to_lower(name);
        if let Some(channel) = self.channels.get_mut(&key) {
            if !channel.members.contains(&id) {
                channel.members.push(id);
            }
        }
        if let Some(client) = self.clients.get_mut(&id) {
            client.channel = Some(key);
        }
    }

    /// Remove `id` from the channel under the lowercased key `key`,
    /// deleting the channel once its last member leaves.
    pub fn remove_member(&mut self, key: &str, id: ClientId) {
        let mut now_empty = false;
        if let Some(channel) = self.channels.get_mut(key) {
            channel.members.retain(|m| *m != id);
            now_empty = channel.members.is_empty();
        }
        if now_empty {
            debug!(channel = %key, "deleting empty channel");
            self.channels.remove(key);
        }
        if let Some(client) = self.clients.get_mut(&id) {
            if client.channel.as_deref() == Some(key) {
                client.channel = None;
            }
        }
    }

    /// Send a line to every member of the channel, optionally excluding one.
    pub fn broadcast(&self, key: &str, line: &str, exclude: Option<ClientId>) {
        let Some(channel) = self.channels.get(key) else {
            return;
        };
        for member in &channel.members {
            if exclude == Some(*member) {
                continue;
            }
            if let Some(client) = self.clients.get(member) {
                client.send_line(line);
            }
        }
    }
}
