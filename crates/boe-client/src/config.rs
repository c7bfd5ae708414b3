//! Client configuration.

use serde::{Deserialize, Serialize};

/// Upstream open-data API root
pub const DEFAULT_BASE_URL: &str = "https://www.boe.es/datosabiertos/api";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for [`crate::BoeClient`]
///
/// The base URL is fixed in normal operation; it is only overridden to
/// point at a mirror or a test server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at another API root
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

fn default_user_agent() -> String {
    format!("boe-mcp/{}", env!("CARGO_PKG_VERSION"))
}
