//! Socket handling: listener, per-connection tasks, and the outbound queue.

mod connection;
mod listener;
mod sendq;

pub use connection::spawn_connection;
pub use listener::Listener;
pub use sendq::SendQueue;
