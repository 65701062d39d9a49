//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - An ordered registry of all available tools
//! - Discovery (`tools/list`) in registration order
//! - Dispatch of tool calls to the matching [`ToolHandler`]
//!
//! Discovery and dispatch read the same entries, so the advertised tool set
//! and the accepted tool names can never drift apart.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use tracing::{debug, error, instrument, warn};

use super::definitions::{GetWeatherTool, WeatherTable};
use super::handler::{ToolHandler, requires_arguments};
use super::ToolError;

/// A registered tool: its frozen descriptor plus the handler behind it.
struct RegisteredTool {
    descriptor: Tool,
    handler: Arc<dyn ToolHandler>,
}

/// Tool registry - manages all available tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in tool.
    pub fn with_builtin_tools() -> Result<Self, ToolError> {
        let mut registry = Self::new();
        registry.register(GetWeatherTool::new(Arc::new(WeatherTable::builtin())))?;
        Ok(registry)
    }

    /// Register a tool handler.
    ///
    /// The handler's descriptor is captured once and never re-read.
    pub fn register(&mut self, handler: impl ToolHandler + 'static) -> Result<(), ToolError> {
        let descriptor = handler.descriptor();
        let name = descriptor.name.to_string();

        if name.is_empty() {
            return Err(ToolError::invalid_arguments("Tool name must not be empty"));
        }
        if self.by_name.contains_key(&name) {
            return Err(ToolError::duplicate(name));
        }

        debug!("Registering tool: {}", name);
        self.by_name.insert(name, self.tools.len());
        self.tools.push(RegisteredTool {
            descriptor,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools
            .iter()
            .map(|t| t.descriptor.name.as_ref())
            .collect()
    }

    /// Get all tools as Tool models (metadata), in registration order.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.descriptor.clone()).collect()
    }

    /// Whether a tool with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry holds no tools.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a tool call to the appropriate handler.
    ///
    /// Returns `Err` only for protocol-level failures: an unknown tool or
    /// unusable arguments. Handler failures and panics are folded into an
    /// error-flagged [`CallToolResult`].
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ToolError> {
        if name.is_empty() {
            return Err(ToolError::invalid_arguments("Tool name must not be empty"));
        }

        let Some(tool) = self.by_name.get(name).map(|&i| &self.tools[i]) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };

        let arguments = match arguments {
            Some(args) if !args.is_empty() => args,
            _ if requires_arguments(&tool.descriptor) => {
                warn!("Tool {} called without arguments", name);
                return Err(ToolError::invalid_arguments("Arguments are required"));
            }
            _ => JsonObject::new(),
        };

        let outcome = AssertUnwindSafe(tool.handler.invoke(arguments))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(ToolError::InvalidArguments(msg))) => Err(ToolError::InvalidArguments(msg)),
            Ok(Err(e)) => {
                error!("Tool {} failed: {}", name, e);
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            }
            Err(_) => {
                error!("Tool {} panicked", name);
                Ok(CallToolResult::error(vec![Content::text(format!(
                    "Tool {} failed unexpectedly",
                    name
                ))]))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    /// A tool with no required parameters that echoes how many it got.
    struct CountArgsTool;

    #[async_trait::async_trait]
    impl ToolHandler for CountArgsTool {
        fn descriptor(&self) -> Tool {
            Tool {
                name: "count_args".into(),
                description: Some("Count arguments".into()),
                input_schema: Arc::new(JsonObject::new()),
                annotations: None,
                output_schema: None,
                icons: None,
                meta: None,
                title: None,
            }
        }

        async fn invoke(&self, arguments: JsonObject) -> Result<CallToolResult, ToolError> {
            Ok(CallToolResult::success(vec![Content::text(
                arguments.len().to_string(),
            )]))
        }
    }

    /// A tool whose handler misbehaves in a configurable way.
    enum FaultyTool {
        Fails,
        Panics,
    }

    #[async_trait::async_trait]
    impl ToolHandler for FaultyTool {
        fn descriptor(&self) -> Tool {
            let name = match self {
                Self::Fails => "fails",
                Self::Panics => "panics",
            };
            Tool {
                name: name.into(),
                description: None,
                input_schema: Arc::new(JsonObject::new()),
                annotations: None,
                output_schema: None,
                icons: None,
                meta: None,
                title: None,
            }
        }

        async fn invoke(&self, _arguments: JsonObject) -> Result<CallToolResult, ToolError> {
            match self {
                Self::Fails => Err(ToolError::execution_failed("backend unavailable")),
                Self::Panics => panic!("handler bug"),
            }
        }
    }

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    fn city_args(city: &str) -> Option<JsonObject> {
        let mut args = JsonObject::new();
        args.insert("city".into(), city.into());
        Some(args)
    }

    #[test]
    fn test_builtin_tool_names() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();
        assert_eq!(registry.tool_names(), vec!["get_weather"]);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("get_weather"));
        assert!(!registry.contains("get_forecast"));
    }

    #[test]
    fn test_list_matches_names_and_is_stable() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();

        let first = registry.list_tools();
        let second = registry.list_tools();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );

        let listed: Vec<_> = first.iter().map(|t| t.name.as_ref()).collect();
        assert_eq!(listed, registry.tool_names());
        for name in listed {
            assert!(registry.contains(name));
        }
    }

    #[test]
    fn test_registration_order_is_kept() {
        let mut registry = ToolRegistry::new();
        registry.register(FaultyTool::Panics).unwrap();
        registry.register(CountArgsTool).unwrap();
        registry.register(FaultyTool::Fails).unwrap();
        assert_eq!(registry.tool_names(), vec!["panics", "count_args", "fails"]);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(CountArgsTool).unwrap();
        let err = registry.register(CountArgsTool).unwrap_err();
        assert!(matches!(err, ToolError::Duplicate(name) if name == "count_args"));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();
        let err = registry
            .call_tool("get_forecast", city_args("東京"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(name) if name == "get_forecast"));
    }

    #[tokio::test]
    async fn test_call_empty_name() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();
        let err = registry.call_tool("", city_args("東京")).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_call_without_required_arguments() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();

        let err = registry.call_tool("get_weather", None).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(ref m) if m == "Arguments are required"));

        let err = registry
            .call_tool("get_weather", Some(JsonObject::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_call_with_mistyped_argument() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();
        let mut args = JsonObject::new();
        args.insert("city".into(), serde_json::json!(["東京"]));
        let err = registry.call_tool("get_weather", Some(args)).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_call_without_arguments_when_none_required() {
        let mut registry = ToolRegistry::new();
        registry.register(CountArgsTool).unwrap();
        let result = registry.call_tool("count_args", None).await.unwrap();
        assert_eq!(text_of(&result), "0");
    }

    #[tokio::test]
    async fn test_call_dispatches_to_weather() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();
        let result = registry
            .call_tool("get_weather", city_args("パリ"))
            .await
            .unwrap();
        assert_ne!(result.is_error, Some(true));
        assert!(text_of(&result).contains("\"cloudy\""));
    }

    #[tokio::test]
    async fn test_execution_failure_becomes_flagged_result() {
        let mut registry = ToolRegistry::new();
        registry.register(FaultyTool::Fails).unwrap();
        let result = registry.call_tool("fails", None).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("backend unavailable"));
    }

    #[tokio::test]
    async fn test_panic_becomes_flagged_result() {
        let mut registry = ToolRegistry::new();
        registry.register(FaultyTool::Panics).unwrap();
        let result = registry.call_tool("panics", None).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "Tool panics failed unexpectedly");
    }
}
