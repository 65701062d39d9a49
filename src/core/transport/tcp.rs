//! TCP transport implementation.
//!
//! Raw TCP socket transport with JSON-RPC messages (line-delimited). Each
//! accepted connection runs its own session; ordering holds per connection.

use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::session::{SessionEnd, run_session};
use super::{TransportError, TransportResult, config::TcpConfig};
use crate::core::{McpServer, ShutdownSignal};

/// TCP transport handler.
pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    /// Create a new TCP transport with the given config.
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Bind and run the TCP transport.
    pub async fn run(self, server: McpServer, shutdown: ShutdownSignal) -> TransportResult<()> {
        let addr = self.address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} (JSON-RPC over TCP)", addr);
        serve(listener, server, shutdown).await
    }
}

/// Accept connections until shutdown, then wait for open sessions to finish.
pub async fn serve(
    listener: TcpListener,
    server: McpServer,
    mut shutdown: ShutdownSignal,
) -> TransportResult<()> {
    let mut sessions = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            _ = shutdown.wait() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer_addr)) => {
                    info!("Accepted connection from {}", peer_addr);

                    // Set TCP_NODELAY to disable Nagle's algorithm
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!("Failed to set TCP_NODELAY for {}: {}", peer_addr, e);
                    }

                    sessions.spawn(handle_connection(
                        server.clone(),
                        stream,
                        peer_addr,
                        shutdown.clone(),
                    ));
                }
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    // Small delay to avoid spinning on persistent errors
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
            },
        }
    }

    info!("TCP listener stopped, waiting for {} open session(s)", sessions.len());
    while sessions.join_next().await.is_some() {}
    Ok(())
}

/// Handle a single TCP connection.
async fn handle_connection(
    server: McpServer,
    stream: TcpStream,
    peer_addr: std::net::SocketAddr,
    shutdown: ShutdownSignal,
) {
    let (reader, writer) = stream.into_split();

    match run_session(&server, reader, writer, shutdown).await {
        Ok(SessionEnd::ChannelClosed) => info!("Client {} disconnected cleanly", peer_addr),
        Ok(SessionEnd::Shutdown) => info!("Closed session with {} for shutdown", peer_addr),
        Err(e) => warn!("Error while serving client {}: {}", peer_addr, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, Shutdown};
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    #[tokio::test]
    async fn test_tcp_session_roundtrip_and_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = McpServer::new(Config::default()).unwrap();
        let shutdown = Shutdown::new();
        let handle = tokio::spawn(serve(listener, server, shutdown.signal()));

        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        writer
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/list\"}\n")
            .await
            .unwrap();
        let line = lines.next_line().await.unwrap().unwrap();
        let response: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(response["result"]["tools"][0]["name"], "get_weather");

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("listener should stop")
            .unwrap()
            .unwrap();
    }

    #[test]
    fn test_address() {
        let transport = TcpTransport::new(TcpConfig {
            port: 4100,
            host: "0.0.0.0".to_string(),
        });
        assert_eq!(transport.address(), "0.0.0.0:4100");
    }
}
