//! JSON-RPC 2.0 envelopes and MCP method names.
//!
//! Every transport decodes incoming messages into [`JsonRpcRequest`] and
//! encodes [`JsonRpcResponse`] back; the error object is rmcp's
//! [`ErrorData`](rmcp::ErrorData) so codes and messages match the MCP model.
//! Result payloads are rmcp model types serialized into the `result` slot.

use rmcp::{ErrorData as McpError, model::ProtocolVersion};
use serde::{Deserialize, Deserializer, Serialize};

/// JSON-RPC protocol version accepted and emitted by the server.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol versions the server can speak, oldest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[ProtocolVersion] = &[
    ProtocolVersion::V_2024_11_05,
    ProtocolVersion::V_2025_03_26,
    ProtocolVersion::V_2025_06_18,
];

/// Protocol version returned when the client asks for one we do not know.
pub const LATEST_PROTOCOL_VERSION: ProtocolVersion = ProtocolVersion::V_2025_06_18;

/// MCP method names handled by the server.
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const INITIALIZED: &str = "notifications/initialized";
    pub const PING: &str = "ping";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const TOOLS_CALL: &str = "tools/call";
    pub const NOTIFICATION_PREFIX: &str = "notifications/";
}

/// JSON-RPC request structure.
///
/// A request without an `id` is a notification and never gets a response.
/// An explicit `"id": null` is kept as `Some(Value::Null)` so it can be
/// told apart from a missing id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(
        default,
        deserialize_with = "present_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Build a request with the given id.
    pub fn new(
        id: impl Into<serde_json::Value>,
        method: impl Into<String>,
        params: Option<serde_json::Value>,
    ) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    /// Whether this message is a notification.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

fn present_id<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<serde_json::Value>, error: McpError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Pick the protocol version to answer an `initialize` request with.
pub fn negotiate_protocol_version(requested: Option<&ProtocolVersion>) -> ProtocolVersion {
    match requested {
        Some(version) if SUPPORTED_PROTOCOL_VERSIONS.contains(version) => version.clone(),
        _ => LATEST_PROTOCOL_VERSION,
    }
}
