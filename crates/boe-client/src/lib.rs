//! BOE Open-Data Client
//!
//! Async adapter over the public REST API of the Spanish official gazette
//! (`https://www.boe.es/datosabiertos/api`). It builds URLs and query
//! parameters, applies the request timeout, unwraps the `{status, data}`
//! envelope and maps failures to [`ClientError`].
//!
//! No call is retried.
//!
//! # Example
//!
//! ```no_run
//! use boe_client::{BoeClient, ClientConfig};
//! use boe_domain::{ApiDate, SummaryKind};
//!
//! # async fn run() -> Result<(), boe_client::ClientError> {
//! let client = BoeClient::open(&ClientConfig::default())?;
//! let date = ApiDate::parse("20240529").expect("valid date");
//! if let Some(summary) = client.summary(SummaryKind::Boe, date).await? {
//!     println!("{} items", summary.items.len());
//! }
//! client.close();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod config;
mod error;
pub mod models;

pub use client::{BoeClient, LawSection};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::ClientError;
pub use reqwest::Method;
