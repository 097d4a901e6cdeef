//! Tool payloads built on `rmcp::model`

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, RawContent, Tool};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Build a tool definition; `schema` must be a JSON object
pub fn tool_definition(name: &'static str, description: impl Into<String>, schema: Value) -> Tool {
    let schema = match schema {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Tool::new(name, description.into(), Arc::new(schema))
}

/// Success payload rendered as pretty-printed JSON text
pub fn success<T: Serialize>(payload: &T) -> CallToolResult {
    match serde_json::to_string_pretty(payload) {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => failure(format!("Failed to serialize result: {}", e)),
    }
}

/// Error payload: `{"error": message}` with `isError` set
pub fn failure(message: impl Into<String>) -> CallToolResult {
    let body = json!({ "error": message.into() });
    let text = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());
    CallToolResult::error(vec![Content::text(text)])
}

pub fn is_failure(result: &CallToolResult) -> bool {
    result.is_error.unwrap_or(false)
}

/// Text parts joined by newlines
pub fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn parse_result<T: DeserializeOwned>(result: &CallToolResult) -> Result<T, serde_json::Error> {
    serde_json::from_str(&result_text(result))
}
