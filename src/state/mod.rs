//! In-memory server state.
//!
//! All state lives in a single [`Registry`] owned by the event loop, so
//! mutation never needs locking.

mod channel;
mod client;
mod registry;

pub use channel::Channel;
pub use client::{Client, ClientId, MAX_USER_LEN};
pub use registry::Registry;
