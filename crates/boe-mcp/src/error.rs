//! Error types for MCP server operations.

use boe_tools::ToolError;
use serde_json::{json, Value};
use thiserror::Error;

/// MCP server error types
#[derive(Error, Debug)]
pub enum McpError {
    /// Malformed JSON-RPC envelope
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Method parameters missing or of the wrong shape
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Unknown JSON-RPC method
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Unknown resource URI
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Tool invocation failed
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl McpError {
    /// Convert to JSON-RPC error code
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::InvalidRequest(_) => -32600,
            McpError::InvalidParams(_) => -32602,
            McpError::MethodNotFound(_) => -32601,
            McpError::ResourceNotFound(_) => -32002,
            McpError::Tool(e) => match e {
                ToolError::ToolNotFound(_) => -32601,
                ToolError::Validation(_) | ToolError::Schema(_) => -32602,
                _ => -32000,
            },
            McpError::Config(_) => -32000,
            McpError::JsonError(_) => -32700,
            McpError::IoError(_) => -32000,
        }
    }

    /// Extra error data: the tool error kind and any upstream status
    pub fn data(&self) -> Option<Value> {
        match self {
            McpError::Tool(e) => {
                let mut data = json!({"kind": e.kind()});
                if let Some(status) = e.upstream_status() {
                    data["upstream_status"] = json!(status);
                }
                Some(data)
            }
            McpError::InvalidParams(_) => Some(json!({"kind": "SchemaError"})),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_codes() {
        let err = McpError::from(ToolError::ToolNotFound("x".into()));
        assert_eq!(err.error_code(), -32601);
        assert_eq!(err.data().unwrap()["kind"], "ToolNotFoundError");

        let err = McpError::from(ToolError::Validation("bad date".into()));
        assert_eq!(err.error_code(), -32602);
        assert_eq!(err.to_string(), "Validation error: bad date");
    }

    #[test]
    fn test_upstream_status_is_kept() {
        let err = McpError::from(ToolError::Upstream {
            status: 404,
            body: "No encontrado".into(),
        });
        assert_eq!(err.error_code(), -32000);
        let data = err.data().unwrap();
        assert_eq!(data["kind"], "UpstreamError");
        assert_eq!(data["upstream_status"], 404);
    }

    #[test]
    fn test_protocol_errors_have_no_tool_kind() {
        assert!(McpError::MethodNotFound("foo".into()).data().is_none());
        assert_eq!(McpError::ResourceNotFound("boe://x".into()).error_code(), -32002);
    }
}
