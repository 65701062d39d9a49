//! MCP Server implementation.
//!
//! This module contains the main server handler. It routes decoded JSON-RPC
//! requests to the MCP methods the server supports and delegates tool work
//! to the [`ToolRegistry`]. Transports own the framing; they hand every
//! decoded request to [`McpServer::handle_request`] and write back whatever
//! response it returns.

use rmcp::{
    ErrorData as McpError,
    model::{
        CallToolRequestParam, CallToolResult, EmptyObject, ErrorCode, Implementation,
        InitializeResult, JsonObject, ListToolsResult, ProtocolVersion, ServerCapabilities,
        Tool,
    },
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::config::Config;
use super::protocol::{
    JSONRPC_VERSION, JsonRpcRequest, JsonRpcResponse, methods, negotiate_protocol_version,
};
use crate::domains::tools::ToolRegistry;

/// The main MCP server handler.
///
/// Cheap to clone; the TCP and HTTP transports hand a clone to every
/// connection.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registered tools.
    tools: Arc<ToolRegistry>,
}

impl McpServer {
    /// Create a new MCP server with the built-in tools.
    pub fn new(config: Config) -> crate::Result<Self> {
        let tools = ToolRegistry::with_builtin_tools()?;
        Ok(Self::with_registry(config, tools))
    }

    /// Create a server around an explicit tool registry.
    pub fn with_registry(config: Config, tools: ToolRegistry) -> Self {
        Self {
            config: Arc::new(config),
            tools: Arc::new(tools),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// List all available tools.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.list_tools()
    }

    /// Call a tool by name.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        self.tools
            .call_tool(name, arguments)
            .await
            .map_err(McpError::from)
    }

    /// Handle one decoded JSON-RPC message.
    ///
    /// Returns `None` for notifications, which must not be answered.
    #[instrument(skip_all, fields(method = %request.method))]
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        let JsonRpcRequest {
            jsonrpc,
            id,
            method,
            params,
        } = request;

        if jsonrpc != JSONRPC_VERSION {
            warn!("Rejecting request with jsonrpc version {:?}", jsonrpc);
            return Some(JsonRpcResponse::error(
                id,
                McpError::new(
                    ErrorCode::INVALID_REQUEST,
                    format!("Unsupported jsonrpc version: {}", jsonrpc),
                    None,
                ),
            ));
        }

        if id.as_ref().is_some_and(serde_json::Value::is_null) {
            warn!("Rejecting {} request with null id", method);
            return Some(JsonRpcResponse::error(
                id,
                McpError::new(ErrorCode::INVALID_REQUEST, "Request id must not be null", None),
            ));
        }

        let outcome = match method.as_str() {
            methods::INITIALIZE => to_result(self.initialize(params.as_ref())),
            methods::PING => to_result(EmptyObject {}),
            methods::TOOLS_LIST => to_result(self.tools_list()),
            methods::TOOLS_CALL => self.tools_call(params).await.and_then(to_result),
            _ => {
                warn!("Unknown method: {}", method);
                Err(McpError::new(
                    ErrorCode::METHOD_NOT_FOUND,
                    format!("Method not found: {}", method),
                    None,
                ))
            }
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    /// Build the `initialize` result.
    ///
    /// Only `protocolVersion` is read from the params; a client that omits
    /// its capabilities or info still gets an answer.
    pub fn initialize(&self, params: Option<&serde_json::Value>) -> InitializeResult {
        let requested = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(|v| ProtocolVersion::deserialize(v).ok());
        let protocol_version = negotiate_protocol_version(requested.as_ref());
        info!("Initializing session (protocol {})", protocol_version);

        InitializeResult {
            protocol_version,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Implementation::default()
            },
            instructions: self.config.server.instructions.clone(),
        }
    }

    /// Build the `tools/list` result. The whole list fits in one page.
    pub fn tools_list(&self) -> ListToolsResult {
        debug!("Listing tools");
        ListToolsResult::with_all_items(self.list_tools())
    }

    async fn tools_call(
        &self,
        params: Option<serde_json::Value>,
    ) -> Result<CallToolResult, McpError> {
        let Some(params) = params else {
            return Err(McpError::invalid_params("Missing params", None));
        };
        let params: CallToolRequestParam = serde_json::from_value(params)
            .map_err(|e| McpError::invalid_params(format!("Invalid tools/call params: {}", e), None))?;

        info!("Calling tool: {}", params.name);
        self.call_tool(&params.name, params.arguments).await
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            methods::INITIALIZED => info!("Client sent initialized notification"),
            method if method.starts_with(methods::NOTIFICATION_PREFIX) => {
                debug!("Received notification: {}", method)
            }
            method => warn!("Ignoring request without id: {}", method),
        }
    }
}

/// Serialize an rmcp result payload into the response's `result` slot.
fn to_result<T: Serialize>(payload: T) -> Result<serde_json::Value, McpError> {
    serde_json::to_value(payload).map_err(|e| McpError::internal_error(e.to_string(), None))
}
