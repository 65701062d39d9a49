//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, the JSON-RPC protocol layer,
//! shutdown coordination and transport implementations.

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod shutdown;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
pub use shutdown::{Shutdown, ShutdownSignal, SignalGuard};
pub use transport::{TransportConfig, TransportService};
