//! Scripted test client.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);
const QUIET_WINDOW: Duration = Duration::from_millis(200);

pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    nick: Option<String>,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect");
        let (read_half, writer) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer,
            nick: None,
        }
    }

    /// Send one line, CRLF-terminated.
    pub async fn send(&mut self, line: &str) {
        self.send_raw(&format!("{line}\r\n")).await;
    }

    /// Send bytes exactly as given, with no framing added.
    pub async fn send_raw(&mut self, data: &str) {
        self.writer
            .write_all(data.as_bytes())
            .await
            .expect("write to server");
    }

    /// Receive the next line, stripped of its terminator.
    pub async fn recv(&mut self) -> String {
        tokio::time::timeout(RECV_TIMEOUT, self.read_line())
            .await
            .expect("timed out waiting for a line")
            .expect("server closed the connection")
    }

    /// Receive lines until one contains `needle`, returning all of them.
    pub async fn recv_until(&mut self, needle: &str) -> Vec<String> {
        let mut lines = Vec::new();
        loop {
            let line = self.recv().await;
            let done = line.contains(needle);
            lines.push(line);
            if done {
                return lines;
            }
        }
    }

    /// Wait for the server to close the connection.
    pub async fn expect_closed(&mut self) {
        loop {
            let got = tokio::time::timeout(RECV_TIMEOUT, self.read_line())
                .await
                .expect("timed out waiting for close");
            if got.is_none() {
                return;
            }
        }
    }

    /// Assert nothing arrives within a short window.
    pub async fn assert_silent(&mut self) {
        let got = tokio::time::timeout(QUIET_WINDOW, self.read_line()).await;
        if let Ok(Some(line)) = got {
            panic!("expected silence, got: {line}");
        }
    }

    /// Run NICK/USER registration and consume the MOTD.
    pub async fn register(&mut self, nick: &str) {
        self.send(&format!("NICK {nick}")).await;
        self.send(&format!("USER {nick} host server :Test User"))
            .await;
        self.recv_until(" 376 ").await;
        self.nick = Some(nick.to_owned());
    }

    /// Join a channel, consuming the names replies and the echoed JOIN.
    pub async fn join(&mut self, channel: &str) {
        let nick = self.nick.clone().expect("join before register");
        self.send(&format!("JOIN {channel}")).await;
        self.recv_until(&format!(":{nick} JOIN {channel}")).await;
    }

    /// Read one line, tolerating CR, LF, and CRLF terminators.
    /// Returns None on EOF.
    async fn read_line(&mut self) -> Option<String> {
        let mut line = Vec::new();
        loop {
            let byte = self.reader.read_u8().await.ok()?;
            match byte {
                b'\n' | b'\r' => {
                    if line.is_empty() {
                        continue;
                    }
                    return Some(String::from_utf8_lossy(&line).into_owned());
                }
                other => line.push(other),
            }
        }
    }
}
