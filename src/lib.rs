//! Weather MCP Server Library
//!
//! A small Model Context Protocol (MCP) tool server. It advertises a fixed
//! set of tools over a newline-delimited JSON-RPC transport and executes
//! them by name. The built-in tool, `get_weather`, answers from a static
//! city table.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the JSON-RPC protocol layer,
//!   shutdown coordination and the transports (stdio, tcp, http)
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: the tool registry, the `ToolHandler` trait and tool definitions
//!
//! # Example
//!
//! ```rust,no_run
//! use weather_mcp_server::core::{Config, McpServer, Shutdown, TransportService};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> weather_mcp_server::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     let shutdown = Shutdown::new();
//!     TransportService::new(config.transport)
//!         .run(server, shutdown.signal())
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
