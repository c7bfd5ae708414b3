//! Client settings from the environment

use boe_client::ClientConfig;

use crate::error::McpError;

/// Overrides the upstream API root
pub const API_URL_VAR: &str = "BOE_API_URL";

/// Overrides the per-request timeout, in seconds
pub const TIMEOUT_VAR: &str = "BOE_HTTP_TIMEOUT";

/// Client settings from the process environment
pub fn client_config_from_env() -> Result<ClientConfig, McpError> {
    client_config_from(|name| std::env::var(name).ok())
}

/// Client settings from an arbitrary variable lookup
///
/// Unset or blank variables keep the defaults.
pub fn client_config_from<F>(lookup: F) -> Result<ClientConfig, McpError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ClientConfig::default();
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(url) = var(API_URL_VAR) {
        config.base_url = url.trim().to_string();
    }
    if let Some(timeout) = var(TIMEOUT_VAR) {
        config.timeout_secs = match timeout.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                return Err(McpError::Config(format!(
                    "{} must be a positive number of seconds, got '{}'",
                    TIMEOUT_VAR, timeout
                )))
            }
        };
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use boe_client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Result<ClientConfig, McpError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        client_config_from(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults_without_vars() {
        let config = from_map(&[]).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_overrides() {
        let config = from_map(&[(API_URL_VAR, "http://localhost:9000"), (TIMEOUT_VAR, "5")]).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_invalid_timeout() {
        assert!(from_map(&[(TIMEOUT_VAR, "soon")]).is_err());
        assert!(from_map(&[(TIMEOUT_VAR, "0")]).is_err());
        assert_eq!(from_map(&[(TIMEOUT_VAR, " ")]).unwrap().timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
