//! Error types for the upstream client.

use thiserror::Error;

/// Longest upstream body kept in an error
const MAX_BODY_LEN: usize = 500;

/// Upstream client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection failure or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream answered with a non-success status
    #[error("Upstream returned HTTP {status}: {body}")]
    Upstream {
        /// HTTP (or envelope) status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be built from its configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Build an upstream error, truncating long bodies
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        let mut body = body.into();
        if body.len() > MAX_BODY_LEN {
            let mut cut = MAX_BODY_LEN;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
            body.push_str("...");
        }
        ClientError::Upstream { status, body }
    }

    /// Upstream reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Upstream { status: 404, .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Network(format!("Request timed out: {}", e))
        } else if e.is_connect() {
            ClientError::Network(format!("Connection failed: {}", e))
        } else if e.is_decode() {
            ClientError::Parse(e.to_string())
        } else if e.is_builder() {
            ClientError::Config(e.to_string())
        } else if let Some(status) = e.status() {
            ClientError::upstream(status.as_u16(), e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Parse(format!("JSON parsing error: {}", e))
    }
}
