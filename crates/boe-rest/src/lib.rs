//! BOE REST Wrapper
//!
//! Plain HTTP/JSON access to the BOE open-data tools, for clients that do
//! not speak MCP. Routes are listed at `GET /`.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use boe_client::BoeClient;
use boe_tools::BoeTools;
use config::RestConfig;
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// REST server error
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Upstream client could not be created
    #[error("Client error: {0}")]
    Client(#[from] boe_client::ClientError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the application for a configuration
pub fn build_app(config: &RestConfig) -> Result<axum::Router, RestError> {
    config.validate()?;
    let client = BoeClient::open(&config.client)?;
    let state = AppState {
        tools: Arc::new(BoeTools::new(client)),
    };
    Ok(create_router(state, &config.cors_origins))
}

/// Start the REST HTTP server
///
/// Opens the upstream client and serves until the process stops.
pub async fn start_server(config: RestConfig) -> Result<(), RestError> {
    info!("Starting BOE REST wrapper");
    info!("Upstream API: {}", config.client.base_url);
    info!("CORS origins: {:?}", config.cors_origins);

    let app = build_app(&config)?;

    // Bind and serve
    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("REST wrapper listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| RestError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_app_rejects_invalid_config() {
        let mut config = RestConfig::default();
        config.client.timeout_secs = 0;
        assert!(matches!(build_app(&config), Err(RestError::Config(_))));
    }
}
