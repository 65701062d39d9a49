//! STDIO transport implementation.
//!
//! Standard input/output transport for MCP - the default and recommended mode.
//! Exactly one session runs for the lifetime of the process.

use tracing::info;

use super::TransportResult;
use super::session::{SessionEnd, run_session};
use crate::core::{McpServer, ShutdownSignal};

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the STDIO transport until stdin closes or shutdown is triggered.
    pub async fn run(server: McpServer, shutdown: ShutdownSignal) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");

        let end = run_session(&server, tokio::io::stdin(), tokio::io::stdout(), shutdown).await?;

        match end {
            SessionEnd::ChannelClosed => info!("STDIO transport finished: stdin closed"),
            SessionEnd::Shutdown => info!("STDIO transport finished: shutdown requested"),
        }
        Ok(())
    }
}
