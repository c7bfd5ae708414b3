//! BOE Domain Layer
//!
//! Value records shared by the HTTP client, the tool modules and both
//! server facades. Nothing in here performs I/O; every record is
//! request-scoped except the static common-law table.
//!
//! ## Key Concepts
//!
//! - **LawId**: canonical upstream identifier (`BOE-A-1978-31229`)
//! - **ApiDate**: a publication date in the upstream `YYYYMMDD` form
//! - **SearchQuery**: validated pagination and filters for legislation search
//! - **ToolResult**: human-readable text plus optional structured payload
//! - **SummaryDocument**: one day's gazette index, flattened to items
//! - **AuxiliaryCodeEntry**: one row of an upstream code table
//! - **LawReference**: an entry of the static common-law table

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auxiliary;
pub mod common_laws;
pub mod date;
pub mod identifier;
pub mod query;
pub mod result;
pub mod summary;

// Re-exports for convenience
pub use auxiliary::{AuxiliaryCodeEntry, AuxiliaryTable};
pub use common_laws::{LawCategory, LawReference};
pub use date::ApiDate;
pub use identifier::LawId;
pub use query::SearchQuery;
pub use result::ToolResult;
pub use summary::{JournalInfo, SummaryDocument, SummaryItem, SummaryKind};
