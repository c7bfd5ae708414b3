//! BOE REST wrapper CLI
//!
//! Starts the HTTP server in front of the BOE open-data tools.

use anyhow::Context;
use boe_rest::{config::RestConfig, start_server};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// REST wrapper over the BOE open-data API
#[derive(Debug, Parser)]
#[command(name = "boe-rest", version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port (overrides the config file)
    #[arg(short, long, env = "BOE_REST_PORT")]
    port: Option<u16>,

    /// Bind address (overrides the config file)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RestConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RestConfig::default(),
    };
    if let Some(port) = args.port {
        config.bind_port = port;
    }
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }

    start_server(config).await?;
    Ok(())
}
