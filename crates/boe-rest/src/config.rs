//! Configuration file parsing for the REST wrapper.
//!
//! Loads the bind address, allowed CORS origins and upstream client settings
//! from a TOML file. Every field has a default.

use boe_client::ClientConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// REST configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A field holds an unusable value
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// REST wrapper configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RestConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (default: 8000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Origins allowed by CORS
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Upstream client settings
    #[serde(default)]
    pub client: ClientConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8080".to_string(),
        "http://127.0.0.1:8080".to_string(),
    ]
}

impl Default for RestConfig {
    fn default() -> Self {
        RestConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            cors_origins: default_cors_origins(),
            client: ClientConfig::default(),
        }
    }
}

impl RestConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: RestConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "bind_address",
                reason: "must not be empty".to_string(),
            });
        }
        if self.client.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "client.timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !self.client.base_url.starts_with("http://") && !self.client.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                field: "client.base_url",
                reason: format!("'{}' is not an http(s) URL", self.client.base_url),
            });
        }
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boe_client::DEFAULT_BASE_URL;

    #[test]
    fn test_default_config() {
        let config = RestConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = RestConfig::from_toml("").unwrap();
        assert_eq!(config.bind_port, 8000);
        assert_eq!(config.client.timeout_secs, 30);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            cors_origins = ["http://localhost:3000"]

            [client]
            timeout_secs = 10
        "#;

        let config = RestConfig::from_toml(toml).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.client.timeout_secs, 10);
        assert_eq!(config.client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_invalid_values() {
        let err = RestConfig::from_toml("[client]\ntimeout_secs = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "client.timeout_secs", .. }));

        let err = RestConfig::from_toml("[client]\nbase_url = \"boe.es\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "client.base_url", .. }));

        assert!(matches!(
            RestConfig::from_toml("bind_port = \"ocho mil\""),
            Err(ConfigError::TomlParse(_))
        ));
    }
}
