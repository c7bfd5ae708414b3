//! BOE MCP Server
//!
//! Model Context Protocol server exposing the open-data API of the Spanish
//! official gazette (Boletín Oficial del Estado) to AI clients over stdio.
//!
//! Provides the 19 tools of [`boe_tools`] (consolidated legislation, daily
//! BOE/BORME summaries, auxiliary code tables and the common-law catalog)
//! plus two resources:
//! - `boe://help` - Usage guide
//! - `boe://status` - Live upstream health check
//!
//! # Example
//!
//! ```no_run
//! use boe_mcp::{client_config_from_env, McpServer};
//!
//! # async fn run() -> Result<(), boe_mcp::McpError> {
//! let server = McpServer::new(&client_config_from_env()?)?;
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
pub mod protocol;
mod resources;
mod server;

pub use config::{client_config_from, client_config_from_env, API_URL_VAR, TIMEOUT_VAR};
pub use error::McpError;
pub use server::McpServer;
