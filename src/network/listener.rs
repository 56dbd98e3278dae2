//! Accept loop and reverse DNS for incoming connections.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use tokio::net::TcpListener;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::server::Event;
use crate::state::ClientId;

const RESOLVE_TIMEOUT: Duration = Duration::from_secs(2);

/// Accepts connections and hands them to the event loop.
pub struct Listener {
    inner: TcpListener,
    resolver: Arc<TokioResolver>,
    next_id: u64,
}

impl Listener {
    pub async fn bind(addr: SocketAddr) -> std::io::Result<Self> {
        let inner = TcpListener::bind(addr).await?;
        info!(addr = %inner.local_addr()?, "listening");
        let resolver = TokioResolver::builder_tokio()
            .map(|b| b.build())
            .unwrap_or_else(|_| {
                TokioResolver::builder_with_config(
                    ResolverConfig::default(),
                    TokioConnectionProvider::default(),
                )
                .build()
            });
        Ok(Self {
            inner,
            resolver: Arc::new(resolver),
            next_id: 0,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// Accept connections until `token` is cancelled. Each accepted socket
    /// gets its hostname resolved off the accept path, then arrives at the
    /// event loop as [`Event::Accepted`].
    pub async fn run(mut self, events: UnboundedSender<Event>, token: CancellationToken) {
        loop {
            let (stream, addr) = tokio::select! {
                () = token.cancelled() => break,
                accepted = self.inner.accept() => match accepted {
                    Ok(pair) => pair,
                    Err(err) => {
                        debug!(%err, "accept failed");
                        continue;
                    }
                },
            };
            let id = ClientId(self.next_id);
            self.next_id += 1;

            let resolver = Arc::clone(&self.resolver);
            let events = events.clone();
            tokio::spawn(async move {
                let hostname = resolve_hostname(&resolver, addr.ip()).await;
                debug!(client = %id, %addr, %hostname, "accepted connection");
                let _ = events.send(Event::Accepted {
                    id,
                    stream,
                    addr,
                    hostname,
                });
            });
        }
    }
}

/// Reverse-resolve `ip`, falling back to its textual form.
async fn resolve_hostname(resolver: &TokioResolver, ip: IpAddr) -> String {
    let lookup = tokio::time::timeout(RESOLVE_TIMEOUT, resolver.reverse_lookup(ip)).await;
    match lookup {
        Ok(Ok(names)) => names
            .iter()
            .next()
            .map(|name| name.to_string().trim_end_matches('.').to_owned())
            .unwrap_or_else(|| ip.to_string()),
        _ => ip.to_string(),
    }
}
