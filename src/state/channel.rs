//! Channel state.

use super::ClientId;

/// A chat channel and its membership.
#[derive(Debug)]
pub struct Channel {
    /// Name with original casing, as first created.
    pub name: String,
    /// Members in join order.
    pub members: Vec<ClientId>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn has_member(&self, id: ClientId) -> bool {
        self.members.contains(&id)
    }
}
