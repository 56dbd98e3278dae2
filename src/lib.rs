//! larkd, a small line-oriented chat server.
//!
//! One event-loop task owns every piece of server state; per-connection
//! tasks only shuttle bytes. The wire protocol lives in the `lark-proto`
//! crate.

pub mod config;
pub mod handlers;
pub mod network;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
