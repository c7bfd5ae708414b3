//! BOE Tools
//!
//! Domain tool modules shared by the MCP server and the REST wrapper.
//! Each tool validates its arguments, calls the upstream client and renders
//! one or more [`ToolResult`]s (Spanish text plus a structured payload).
//!
//! Tools by area:
//! - Consolidated legislation: `search_consolidated_legislation`,
//!   `get_consolidated_law`, `get_law_text_block`, `get_law_structure`,
//!   `find_related_laws`
//! - Daily summaries: `get_boe_summary`, `get_borme_summary`,
//!   `search_recent_boe`, `get_weekly_summary`
//! - Auxiliary tables: `get_departments_table`, `get_legal_ranges_table`,
//!   `get_matters_table`, `get_scopes_table`,
//!   `get_consolidation_states_table`, `search_auxiliary_data`,
//!   `get_code_description`
//! - Common laws: `list_common_laws`, `search_common_laws`,
//!   `get_recent_important_laws`
//!
//! # Example
//!
//! ```no_run
//! use boe_client::{BoeClient, ClientConfig};
//! use boe_tools::BoeTools;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let tools = BoeTools::new(BoeClient::open(&ClientConfig::default())?);
//! let results = tools
//!     .call("get_code_description", json!({"code": "7723"}))
//!     .await?;
//! println!("{}", results[0].text);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod auxiliary;
pub mod catalog;
pub mod common_laws;
mod error;
mod format;
pub mod legislation;
pub mod summaries;

pub use boe_domain::ToolResult;
pub use catalog::ToolDefinition;
pub use error::ToolError;

use boe_client::BoeClient;
use boe_domain::AuxiliaryTable;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Tool registry bound to one upstream client
///
/// Holds no state besides the client's connection pool, so it can be shared
/// behind an `Arc` and called concurrently.
#[derive(Debug, Clone)]
pub struct BoeTools {
    client: BoeClient,
}

impl BoeTools {
    /// Create the registry over an open client
    pub fn new(client: BoeClient) -> Self {
        Self { client }
    }

    /// Underlying upstream client
    pub fn client(&self) -> &BoeClient {
        &self.client
    }

    /// Definitions of every registered tool
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        catalog::definitions()
    }

    /// Invoke a tool by name
    ///
    /// `null` arguments are treated as an empty object.
    ///
    /// # Errors
    ///
    /// - [`ToolError::ToolNotFound`] for an unknown name
    /// - [`ToolError::Schema`] if the arguments do not fit the tool's schema
    /// - anything the tool itself returns
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Vec<ToolResult>, ToolError> {
        if catalog::find(name).is_none() {
            return Err(ToolError::ToolNotFound(name.to_string()));
        }
        let arguments = match arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        debug!(tool = name, %arguments, "Calling tool");

        let client = &self.client;
        match name {
            "search_consolidated_legislation" => {
                legislation::handle_search_legislation(client, parse(arguments)?).await
            }
            "get_consolidated_law" => legislation::handle_get_law(client, parse(arguments)?).await,
            "get_law_text_block" => {
                legislation::handle_get_text_block(client, parse(arguments)?).await
            }
            "get_law_structure" => legislation::handle_get_structure(client, parse(arguments)?).await,
            "find_related_laws" => legislation::handle_find_related(client, parse(arguments)?).await,

            "get_boe_summary" => summaries::handle_boe_summary(client, parse(arguments)?).await,
            "get_borme_summary" => summaries::handle_borme_summary(client, parse(arguments)?).await,
            "search_recent_boe" => summaries::handle_recent_search(client, parse(arguments)?).await,
            "get_weekly_summary" => summaries::handle_weekly_summary(client, parse(arguments)?).await,

            "get_departments_table" => auxiliary::handle_departments(client, parse(arguments)?).await,
            "get_legal_ranges_table" => {
                auxiliary::handle_legal_ranges(client, parse(arguments)?).await
            }
            "get_matters_table" => auxiliary::handle_matters(client, parse(arguments)?).await,
            "get_scopes_table" => {
                parse::<auxiliary::NoParams>(arguments)?;
                auxiliary::handle_whole_table(client, AuxiliaryTable::Scopes).await
            }
            "get_consolidation_states_table" => {
                parse::<auxiliary::NoParams>(arguments)?;
                auxiliary::handle_whole_table(client, AuxiliaryTable::ConsolidationStates).await
            }
            "search_auxiliary_data" => auxiliary::handle_search(client, parse(arguments)?).await,
            "get_code_description" => {
                auxiliary::handle_code_description(client, parse(arguments)?).await
            }

            "list_common_laws" => common_laws::handle_list(parse(arguments)?),
            "search_common_laws" => common_laws::handle_search(parse(arguments)?),
            "get_recent_important_laws" => common_laws::handle_recent(parse(arguments)?),

            _ => Err(ToolError::ToolNotFound(name.to_string())),
        }
    }
}

fn parse<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::Schema(e.to_string()))
}
