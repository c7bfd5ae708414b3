//! MCP protocol types (JSON-RPC 2.0)

use boe_tools::ToolDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::McpError;

/// MCP revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC request
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,
    /// Request ID, absent for notifications
    #[serde(default)]
    pub id: Option<Value>,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default)]
    pub params: Value,
}

/// JSON-RPC response (success)
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,
    /// Request ID
    pub id: Option<Value>,
    /// Result data
    pub result: Value,
}

/// JSON-RPC error response
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,
    /// Request ID
    pub id: Option<Value>,
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Error kind and upstream status, for tool errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Either response shape, as written to the transport
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    /// Success
    Success(JsonRpcResponse),
    /// Failure
    Failure(JsonRpcError),
}

impl JsonRpcResponse {
    /// Create a new success response
    pub fn new(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result,
        }
    }
}

impl JsonRpcError {
    /// Create a new error response
    pub fn new(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            error: ErrorDetail {
                code,
                message,
                data: None,
            },
        }
    }

    /// Error response for a server error
    pub fn from_error(id: Option<Value>, error: &McpError) -> Self {
        let mut response = Self::new(id, error.error_code(), error.to_string());
        response.error.data = error.data();
        response
    }
}

/// MCP tool list response
#[derive(Debug, Serialize)]
pub struct ToolListResponse {
    /// Available tools
    pub tools: Vec<ToolDefinition>,
}

/// One text block of a tool call result
#[derive(Debug, Serialize)]
pub struct TextContent {
    /// Always `text`
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Rendered text
    pub text: String,
}

impl TextContent {
    /// Text block
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: "text",
            text: text.into(),
        }
    }
}

/// `tools/call` result
#[derive(Debug, Serialize)]
pub struct ToolCallResponse {
    /// One text block per tool result
    pub content: Vec<TextContent>,
    /// The tool results themselves, as `{"results": [...]}`
    #[serde(rename = "structuredContent")]
    pub structured_content: Value,
}

/// Resource descriptor for `resources/list`
#[derive(Debug, Serialize)]
pub struct ResourceDefinition {
    /// Resource URI
    pub uri: &'static str,
    /// Short name
    pub name: &'static str,
    /// Description
    pub description: &'static str,
    /// Content type
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
}

/// `resources/list` result
#[derive(Debug, Serialize)]
pub struct ResourceListResponse {
    /// Available resources
    pub resources: Vec<ResourceDefinition>,
}

/// Contents of one resource
#[derive(Debug, Serialize)]
pub struct ResourceContents {
    /// Resource URI
    pub uri: String,
    /// Content type
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
    /// Resource text
    pub text: String,
}

/// `resources/read` result
#[derive(Debug, Serialize)]
pub struct ResourceReadResponse {
    /// Resource contents
    pub contents: Vec<ResourceContents>,
}

/// MCP server info
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

/// Initialize response
#[derive(Debug, Serialize)]
pub struct InitializeResponse {
    /// Protocol version
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Server info
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
    /// Capabilities
    pub capabilities: Capabilities,
    /// Usage hint shown to the client
    pub instructions: String,
}

/// Server capabilities
#[derive(Debug, Serialize)]
pub struct Capabilities {
    /// Tools capability
    pub tools: ListCapability,
    /// Resources capability
    pub resources: ResourcesCapability,
}

/// Capability whose list never changes at runtime
#[derive(Debug, Serialize)]
pub struct ListCapability {
    /// Whether the server notifies list changes
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

/// Resources capability
#[derive(Debug, Serialize)]
pub struct ResourcesCapability {
    /// Whether resource subscriptions are supported
    pub subscribe: bool,
    /// Whether the server notifies list changes
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_without_params_or_id() {
        let request: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
                .unwrap();
        assert!(request.id.is_none());
        assert!(request.params.is_null());
    }

    #[test]
    fn test_messages_serialize_flat() {
        let ok = JsonRpcMessage::Success(JsonRpcResponse::new(Some(json!(1)), json!({})));
        assert_eq!(
            serde_json::to_value(ok).unwrap(),
            json!({"jsonrpc": "2.0", "id": 1, "result": {}})
        );

        let err = JsonRpcMessage::Failure(JsonRpcError::new(None, -32700, "Parse error".into()));
        let value = serde_json::to_value(err).unwrap();
        assert_eq!(value["error"]["code"], -32700);
        assert!(value["id"].is_null());
        assert!(value["error"].get("data").is_none());
    }

    #[test]
    fn test_text_content_type_key() {
        let value = serde_json::to_value(TextContent::new("hola")).unwrap();
        assert_eq!(value, json!({"type": "text", "text": "hola"}));
    }
}
