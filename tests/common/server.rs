//! In-process server for integration tests.

use std::net::SocketAddr;

use larkd::{Config, Server};
use tokio_util::sync::CancellationToken;

#[allow(dead_code)]
pub const SERVER_NAME: &str = "lark.test";

/// A server bound to an ephemeral port, torn down on drop.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: CancellationToken,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start with a hook to tweak the config before binding.
    pub async fn start_with(tweak: impl FnOnce(&mut Config)) -> Self {
        let mut config = Config::default();
        config.server.name = SERVER_NAME.to_owned();
        config.server.motd = vec!["- welcome to the test net".to_owned()];
        config.listen.address = "127.0.0.1:0".parse().unwrap();
        tweak(&mut config);

        let server = Server::bind(config).await.expect("bind test server");
        let addr = server.local_addr().expect("local addr");
        let shutdown = server.shutdown_token();
        tokio::spawn(server.run());
        Self { addr, shutdown }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
