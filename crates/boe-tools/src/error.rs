//! Error taxonomy shared by every tool and both server facades.

use boe_client::ClientError;
use thiserror::Error;

/// Tool invocation errors
#[derive(Debug, Error)]
pub enum ToolError {
    /// Caller input failed validation; no request was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream could not be reached or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream answered with a non-success status
    #[error("Upstream error (HTTP {status}): {body}")]
    Upstream {
        /// Upstream status code
        status: u16,
        /// Upstream body or explanation
        body: String,
    },

    /// Upstream response did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// No tool is registered under the requested name
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Arguments do not match the tool's declared schema
    #[error("Schema error: {0}")]
    Schema(String),
}

impl ToolError {
    /// Stable kind name reported to callers
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Validation(_) => "ValidationError",
            ToolError::Network(_) => "NetworkError",
            ToolError::Upstream { .. } => "UpstreamError",
            ToolError::Parse(_) => "ParseError",
            ToolError::ToolNotFound(_) => "ToolNotFoundError",
            ToolError::Schema(_) => "SchemaError",
        }
    }

    /// Preserved upstream status code, for upstream errors
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ToolError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        ToolError::Upstream {
            status: 404,
            body: what.into(),
        }
    }
}

impl From<ClientError> for ToolError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Network(msg) => ToolError::Network(msg),
            ClientError::Upstream { status, body } => ToolError::Upstream { status, body },
            ClientError::Parse(msg) => ToolError::Parse(msg),
            ClientError::Config(msg) => ToolError::Network(msg),
        }
    }
}
