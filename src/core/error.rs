//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type that can represent errors from
//! the tools domain and the transport layer.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// Error originating from the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transport::TransportError;
    use crate::domains::tools::ToolError;

    #[test]
    fn test_wrapped_errors_keep_their_message() {
        let err: Error = ToolError::duplicate("get_weather").into();
        assert!(matches!(err, Error::Tool(_)));
        assert!(err.to_string().starts_with("Tool error: "));

        let err: Error = TransportError::http("server stopped").into();
        assert!(matches!(err, Error::Transport(_)));
        assert!(err.to_string().contains("server stopped"));
    }
}
