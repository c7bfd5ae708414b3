//! Tool result module - the uniform output record of every tool

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Output of a tool: rendered text plus an optional structured payload
///
/// Both server facades consume these uniformly; a single call may yield
/// several (one per listed row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Human-readable rendering (markdown)
    pub text: String,
    /// Structured payload, when the tool exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ToolResult {
    /// Text-only result
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: None,
        }
    }

    /// Result carrying a structured payload
    pub fn with_data(text: impl Into<String>, data: Value) -> Self {
        Self {
            text: text.into(),
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_only_omits_data() {
        let value = serde_json::to_value(ToolResult::text("hola")).unwrap();
        assert_eq!(value, json!({"text": "hola"}));
    }

    #[test]
    fn test_with_data() {
        let result = ToolResult::with_data("x", json!({"identifier": "BOE-A-1978-31229"}));
        assert_eq!(result.data.unwrap()["identifier"], "BOE-A-1978-31229");
    }
}
