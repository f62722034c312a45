//! Common utilities shared across tool definitions.
//!
//! Response-shaping helpers used by every tool: error formatting plus the
//! two-part success payload (human summary first, structured JSON second).

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a success result carrying a one-line summary followed by
/// pretty-printed structured data.
pub fn structured_result<T: Serialize>(summary: String, data: T) -> CallToolResult {
    match serde_json::to_string_pretty(&data) {
        Ok(json) => CallToolResult::success(vec![Content::text(summary), Content::text(json)]),
        Err(e) => error_result(&format!("Failed to serialize result: {}", e)),
    }
}

/// Standard success payload for a set of entity records.
pub fn rows_result(entity: &str, rows: Vec<Value>) -> CallToolResult {
    let summary = format!("Found {} {} record(s)", rows.len(), entity);
    structured_result(
        summary,
        serde_json::json!({
            "entity": entity,
            "count": rows.len(),
            "records": rows,
        }),
    )
}

/// Extract a required string argument for HTTP handlers.
#[cfg(feature = "http")]
pub fn require_str_arg(arguments: &Value, name: &str) -> Result<String, String> {
    arguments
        .get(name)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| format!("Missing or invalid '{}' parameter", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;
    use serde_json::json;

    fn text_of(result: &CallToolResult, index: usize) -> &str {
        match &result.content[index].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_error_result_is_flagged() {
        let result = error_result("boom");
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(text_of(&result, 0), "boom");
    }

    #[test]
    fn test_structured_result_has_summary_then_json() {
        let result = structured_result("2 things".to_string(), json!({"a": 1}));
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(text_of(&result, 0), "2 things");
        assert!(text_of(&result, 1).contains("\"a\": 1"));
    }

    #[test]
    fn test_rows_result_counts_records() {
        let result = rows_result("Customer", vec![json!({"Id": "1"}), json!({"Id": "2"})]);
        assert_eq!(text_of(&result, 0), "Found 2 Customer record(s)");
        let data: serde_json::Value = serde_json::from_str(text_of(&result, 1)).unwrap();
        assert_eq!(data["count"], 2);
        assert_eq!(data["records"][1]["Id"], "2");
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_require_str_arg() {
        let args = json!({"entity": "Customer", "limit": 5});
        assert_eq!(require_str_arg(&args, "entity").unwrap(), "Customer");
        assert!(require_str_arg(&args, "limit").is_err());
        assert!(require_str_arg(&args, "missing").is_err());
    }
}
