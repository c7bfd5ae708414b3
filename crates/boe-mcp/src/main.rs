//! BOE MCP Server - Main entry point

use boe_mcp::{client_config_from_env, McpServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log to stderr; stdout carries the protocol
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match client_config_from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let server = match McpServer::new(&config) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Failed to create MCP server: {}", e);
            std::process::exit(1);
        }
    };

    // Run server (until stdin closes)
    if let Err(e) = server.run().await {
        eprintln!("MCP server error: {}", e);
        std::process::exit(1);
    }
}
