//! Tool handler capability.
//!
//! Every tool the server exposes implements [`ToolHandler`]. The registry
//! stores handlers as trait objects keyed by name, so adding a tool never
//! touches the dispatch code.

use rmcp::model::{CallToolResult, JsonObject, Tool};
use serde::de::DeserializeOwned;

use super::ToolError;

/// Trait implemented by every tool.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// The descriptor advertised to clients.
    ///
    /// Called once at registration; the registry keeps the returned value
    /// for the lifetime of the process.
    fn descriptor(&self) -> Tool;

    /// Execute the tool with the given arguments.
    ///
    /// Domain-level non-results (for example an unknown lookup key) are
    /// returned as `Ok` with an error-flagged [`CallToolResult`]. Only
    /// malformed arguments should surface as [`ToolError::InvalidArguments`].
    async fn invoke(&self, arguments: JsonObject) -> Result<CallToolResult, ToolError>;
}

/// Deserialize a tool's arguments mapping into its typed parameters.
pub fn parse_arguments<P: DeserializeOwned>(arguments: JsonObject) -> Result<P, ToolError> {
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Whether a descriptor's input schema lists at least one required parameter.
pub fn requires_arguments(tool: &Tool) -> bool {
    tool.input_schema
        .get("required")
        .and_then(|v| v.as_array())
        .is_some_and(|required| !required.is_empty())
}
