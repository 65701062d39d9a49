//! Newline-delimited JSON-RPC session.
//!
//! Runs one logical connection over any duplex byte stream: each line is a
//! JSON-RPC message, each response is written as a single compact JSON line.
//! Messages are handled strictly one at a time, so responses leave in the
//! order requests arrived. The stdio and TCP transports are thin wrappers
//! around [`run_session`].

use std::fmt;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use super::TransportResult;
use crate::core::McpServer;
use crate::core::protocol::{JsonRpcRequest, JsonRpcResponse};
use crate::core::shutdown::ShutdownSignal;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Starting,
    Listening,
    Dispatching,
    ShuttingDown,
    Stopped,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Starting => "STARTING",
            Self::Listening => "LISTENING",
            Self::Dispatching => "DISPATCHING",
            Self::ShuttingDown => "SHUTTING_DOWN",
            Self::Stopped => "STOPPED",
        };
        f.write_str(name)
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The peer closed its side of the channel.
    ChannelClosed,
    /// The shutdown token was triggered.
    Shutdown,
}

/// Tracks and logs state transitions.
struct Lifecycle {
    state: SessionState,
}

impl Lifecycle {
    fn new() -> Self {
        debug!("Session state: {}", SessionState::Starting);
        Self {
            state: SessionState::Starting,
        }
    }

    fn enter(&mut self, next: SessionState) {
        if self.state != next {
            debug!("Session state: {} -> {}", self.state, next);
            self.state = next;
        }
    }
}

/// Serve one session until the channel closes or shutdown is triggered.
///
/// A line that fails to decode, including one that is not valid UTF-8, is
/// reported on the diagnostic log and skipped; the session keeps going. Read and write failures are fatal and
/// returned to the caller.
pub async fn run_session<R, W>(
    server: &McpServer,
    reader: R,
    mut writer: W,
    mut shutdown: ShutdownSignal,
) -> TransportResult<SessionEnd>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lifecycle = Lifecycle::new();
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    let end = loop {
        lifecycle.enter(SessionState::Listening);
        buf.clear();

        // Lines are read as raw bytes; text decoding happens in `dispatch_line`
        // so invalid UTF-8 is a decode failure, not a channel failure.
        let read = tokio::select! {
            biased;
            _ = shutdown.wait() => break SessionEnd::Shutdown,
            read = reader.read_until(b'\n', &mut buf) => read,
        };

        if read? == 0 {
            info!("Channel closed by peer");
            break SessionEnd::ChannelClosed;
        }

        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }

        lifecycle.enter(SessionState::Dispatching);
        if let Some(response) = dispatch_line(server, line).await {
            write_response(&mut writer, &response).await?;
        }
    };

    lifecycle.enter(SessionState::ShuttingDown);
    if let Err(e) = writer.flush().await {
        debug!("Final flush failed: {}", e);
    }
    lifecycle.enter(SessionState::Stopped);

    Ok(end)
}

/// Decode one line and hand it to the server.
async fn dispatch_line(server: &McpServer, line: &[u8]) -> Option<JsonRpcResponse> {
    debug!("Received: {}", String::from_utf8_lossy(line));

    let request: JsonRpcRequest = match serde_json::from_slice(line) {
        Ok(request) => request,
        Err(e) => {
            error!("[MCP Error] Failed to decode message: {}", e);
            return None;
        }
    };

    server.handle_request(request).await
}

/// Encode a response as one line and flush it.
async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> TransportResult<()>
where
    W: AsyncWrite + Unpin,
{
    let mut bytes = serde_json::to_vec(response)?;
    bytes.push(b'\n');

    writer.write_all(&bytes).await?;
    writer.flush().await?;

    debug!("Sent {} bytes", bytes.len());
    Ok(())
}
