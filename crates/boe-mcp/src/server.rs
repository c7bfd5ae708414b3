//! MCP server implementation

use boe_client::{BoeClient, ClientConfig};
use boe_tools::BoeTools;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::McpError;
use crate::protocol::*;
use crate::resources;

/// MCP Server
///
/// Handles Model Context Protocol requests via stdio transport. Cloning is
/// cheap; every clone shares the same tool registry.
#[derive(Debug, Clone)]
pub struct McpServer {
    tools: Arc<BoeTools>,
}

impl McpServer {
    /// Create a new MCP server
    ///
    /// # Arguments
    ///
    /// * `config` - Upstream client settings
    pub fn new(config: &ClientConfig) -> Result<Self, McpError> {
        let client = BoeClient::open(config).map_err(|e| McpError::Config(e.to_string()))?;
        Ok(Self::with_tools(BoeTools::new(client)))
    }

    /// Server over an existing tool registry
    pub fn with_tools(tools: BoeTools) -> Self {
        Self {
            tools: Arc::new(tools),
        }
    }

    /// Run the MCP server (stdio transport)
    ///
    /// Reads JSON-RPC requests from stdin and writes responses to stdout.
    pub async fn run(&self) -> Result<(), McpError> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve newline-delimited JSON-RPC until `reader` reaches EOF
    ///
    /// Each request runs in its own task; a single writer task owns `writer`
    /// so responses never interleave. Responses follow completion order.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<(), McpError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        info!("MCP server started");

        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcMessage>();
        let writer_task = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                write_response(&mut writer, &message).await?;
            }
            Ok::<(), McpError>(())
        });

        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            debug!("Received request: {}", line);
            let server = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(message) = server.handle_line(&line).await {
                    if tx.send(message).is_err() {
                        warn!("Writer closed, dropping response");
                    }
                }
            });
        }

        // The writer stops once every in-flight request has answered
        drop(tx);
        writer_task
            .await
            .map_err(|e| McpError::IoError(std::io::Error::other(e)))??;

        info!("MCP server stopped");
        Ok(())
    }

    /// Handle one raw input line
    ///
    /// Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcMessage> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                Some(JsonRpcMessage::Failure(JsonRpcError::new(
                    None,
                    -32700,
                    format!("Parse error: {}", e),
                )))
            }
        }
    }

    /// Handle a JSON-RPC request
    ///
    /// Returns `None` for notifications (requests without an id).
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcMessage> {
        let Some(id) = request.id else {
            debug!(method = %request.method, "Notification received");
            return None;
        };
        let id = Some(id);

        let outcome = if request.jsonrpc != "2.0" {
            Err(McpError::InvalidRequest(format!(
                "Unsupported JSON-RPC version '{}'",
                request.jsonrpc
            )))
        } else {
            match request.method.as_str() {
                "initialize" => self.handle_initialize(),
                "ping" => Ok(json!({})),
                "tools/list" => self.handle_tools_list(),
                "tools/call" => self.handle_tool_call(request.params).await,
                "resources/list" => self.handle_resources_list(),
                "resources/read" => self.handle_resources_read(request.params).await,
                other => Err(McpError::MethodNotFound(other.to_string())),
            }
        };

        Some(match outcome {
            Ok(result) => JsonRpcMessage::Success(JsonRpcResponse::new(id, result)),
            Err(e) => {
                warn!(method = %request.method, code = e.error_code(), error = %e, "Request failed");
                JsonRpcMessage::Failure(JsonRpcError::from_error(id, &e))
            }
        })
    }

    /// Handle initialize request
    fn handle_initialize(&self) -> Result<Value, McpError> {
        to_result(&InitializeResponse {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: ServerInfo {
                name: "boe-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            capabilities: Capabilities {
                tools: ListCapability {
                    list_changed: false,
                },
                resources: ResourcesCapability {
                    subscribe: false,
                    list_changed: false,
                },
            },
            instructions: "Consulta la legislación consolidada, los sumarios diarios y las \
                           tablas auxiliares del Boletín Oficial del Estado. Lee boe://help \
                           para una guía de uso."
                .to_string(),
        })
    }

    /// Handle tools/list request
    fn handle_tools_list(&self) -> Result<Value, McpError> {
        to_result(&ToolListResponse {
            tools: self.tools.definitions(),
        })
    }

    /// Handle tools/call request
    async fn handle_tool_call(&self, params: Value) -> Result<Value, McpError> {
        let tool_name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::InvalidParams("Missing tool name".to_string()))?;

        let arguments = match params.get("arguments") {
            Some(args) => args.clone(),
            None => json!({}),
        };

        info!(tool = tool_name, "Tool call");
        let results = self.tools.call(tool_name, arguments).await?;
        debug!(tool = tool_name, results = results.len(), "Tool call finished");

        to_result(&ToolCallResponse {
            content: results.iter().map(|r| TextContent::new(r.text.clone())).collect(),
            structured_content: json!({ "results": results }),
        })
    }

    fn handle_resources_list(&self) -> Result<Value, McpError> {
        to_result(&ResourceListResponse {
            resources: resources::definitions(),
        })
    }

    async fn handle_resources_read(&self, params: Value) -> Result<Value, McpError> {
        let uri = params
            .get("uri")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::InvalidParams("Missing resource uri".to_string()))?;

        let contents = resources::read(&self.tools, uri)
            .await
            .ok_or_else(|| McpError::ResourceNotFound(uri.to_string()))?;
        to_result(&ResourceReadResponse {
            contents: vec![contents],
        })
    }
}

fn to_result<T: Serialize>(value: &T) -> Result<Value, McpError> {
    Ok(serde_json::to_value(value)?)
}

/// Write one response line
async fn write_response<W>(writer: &mut W, response: &JsonRpcMessage) -> Result<(), McpError>
where
    W: AsyncWrite + Unpin,
{
    let response_str = serde_json::to_string(response)?;
    writer.write_all(response_str.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    debug!("Sent response: {}", response_str);
    Ok(())
}
