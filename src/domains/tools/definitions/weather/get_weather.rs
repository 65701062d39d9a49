//! Get weather tool definition.
//!
//! Looks up the current weather for a city in the static [`WeatherTable`].

use std::sync::Arc;

use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, Content, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::table::WeatherTable;
use crate::domains::tools::ToolError;
use crate::domains::tools::handler::{ToolHandler, parse_arguments};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the get weather tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetWeatherParams {
    /// 都市名
    pub city: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Get weather tool - returns the weather record for a city.
pub struct GetWeatherTool {
    table: Arc<WeatherTable>,
}

impl GetWeatherTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_weather";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "指定された都市の天気情報を取得します";

    pub fn new(table: Arc<WeatherTable>) -> Self {
        Self { table }
    }

    /// Execute the tool logic.
    ///
    /// A city missing from the table is a domain miss: the result is
    /// flagged with `isError` but the call itself succeeds.
    #[instrument(skip_all, fields(city = %params.city))]
    pub fn execute(&self, params: &GetWeatherParams) -> Result<CallToolResult, ToolError> {
        let Some(report) = self.table.lookup(&params.city) else {
            warn!("City not found: {}", params.city);
            return Ok(CallToolResult::error(vec![Content::text(format!(
                "City not found: {}",
                params.city
            ))]));
        };

        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        info!("Weather found for {}", report.city);
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetWeatherParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for GetWeatherTool {
    fn descriptor(&self) -> Tool {
        Self::to_tool()
    }

    async fn invoke(&self, arguments: JsonObject) -> Result<CallToolResult, ToolError> {
        let params: GetWeatherParams = parse_arguments(arguments)?;
        self.execute(&params)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    fn tool() -> GetWeatherTool {
        GetWeatherTool::new(Arc::new(WeatherTable::builtin()))
    }

    fn params(city: &str) -> GetWeatherParams {
        GetWeatherParams {
            city: city.to_string(),
        }
    }

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_every_city_returns_its_record() {
        let expected = [
            ("東京", "sunny", 25),
            ("大阪", "sunny", 26),
            ("福岡", "sunny", 24),
            ("ロンドン", "rainy", 15),
            ("シアトル", "rainy", 14),
            ("パリ", "cloudy", 18),
            ("ニューヨーク", "cloudy", 20),
        ];

        let tool = tool();
        for (city, weather, temperature) in expected {
            let result = tool.execute(&params(city)).unwrap();
            assert_ne!(result.is_error, Some(true), "{city} flagged as error");
            assert_eq!(result.content.len(), 1);

            let record: serde_json::Value = serde_json::from_str(text_of(&result)).unwrap();
            assert_eq!(
                record,
                serde_json::json!({
                    "city": city,
                    "weather": weather,
                    "temperature": temperature
                })
            );
        }
    }

    #[test]
    fn test_record_is_pretty_printed() {
        let result = tool().execute(&params("東京")).unwrap();
        assert_eq!(
            text_of(&result),
            "{\n  \"city\": \"東京\",\n  \"weather\": \"sunny\",\n  \"temperature\": 25\n}"
        );
    }

    #[test]
    fn test_unknown_city_is_flagged_miss() {
        let tool = tool();
        for city in ["札幌", "Tokyo", "", "東京 "] {
            let result = tool.execute(&params(city)).unwrap();
            assert_eq!(result.is_error, Some(true));
            assert_eq!(text_of(&result), format!("City not found: {city}"));
        }
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let tool = tool();
        let first = serde_json::to_vec(&tool.execute(&params("東京")).unwrap()).unwrap();
        for _ in 0..5 {
            let again = serde_json::to_vec(&tool.execute(&params("東京")).unwrap()).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_to_tool_schema_requires_city() {
        let descriptor = GetWeatherTool::to_tool();
        assert_eq!(descriptor.name, GetWeatherTool::NAME);

        let schema = &descriptor.input_schema;
        assert_eq!(schema.get("type"), Some(&serde_json::json!("object")));
        assert!(schema["properties"].get("city").is_some());
        assert_eq!(schema.get("required"), Some(&serde_json::json!(["city"])));
    }

    #[test]
    fn test_descriptor_text_seen_by_clients() {
        let descriptor = GetWeatherTool::to_tool();
        assert_eq!(
            descriptor.description.as_deref(),
            Some("指定された都市の天気情報を取得します")
        );
        assert_eq!(
            descriptor.input_schema["properties"]["city"]["description"],
            serde_json::json!("都市名")
        );
        assert_eq!(
            descriptor.input_schema["properties"]["city"]["type"],
            serde_json::json!("string")
        );
    }

    #[tokio::test]
    async fn test_invoke_parses_arguments() {
        let mut args = JsonObject::new();
        args.insert("city".into(), "シアトル".into());
        let result = tool().invoke(args).await.unwrap();
        assert!(text_of(&result).contains("\"rainy\""));
    }

    #[tokio::test]
    async fn test_invoke_missing_city() {
        let mut args = JsonObject::new();
        args.insert("town".into(), "大阪".into());
        let result = tool().invoke(args).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }
}
