//! Auxiliary code table tools
//!
//! Every call re-fetches the tables it needs; nothing is kept between calls.

use crate::error::ToolError;
use crate::format::{check_range, optional_text, required_text, structured, truncate_chars};
use boe_client::BoeClient;
use boe_domain::{AuxiliaryCodeEntry, AuxiliaryTable, ToolResult};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

/// Rows listed per table by search_auxiliary_data
const MAX_SEARCH_ROWS_PER_TABLE: usize = 10;

fn default_true() -> bool {
    true
}

fn default_table_limit() -> u32 {
    50
}

/// Parameters for get_departments_table and get_legal_ranges_table
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeTableParams {
    /// Filter on the description
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default = "default_true")]
    pub active_only: bool,
    #[serde(default = "default_table_limit")]
    pub limit: u32,
}

/// Parameters for get_matters_table
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MattersTableParams {
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default = "default_table_limit")]
    pub limit: u32,
}

/// Tools that take no arguments
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoParams {}

/// Parameters for search_auxiliary_data
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuxiliarySearchParams {
    /// Matched against code and description
    pub query: String,
    /// `all`, `departments`, `ranges`, `matters`, `scopes` or `states`
    #[serde(default)]
    pub table_type: Option<String>,
}

/// Parameters for get_code_description
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeDescriptionParams {
    /// Exact code, e.g. `7723`
    pub code: String,
    /// `department`, `range`, `matter`, `scope` or `state`
    #[serde(default)]
    pub code_type: Option<String>,
}

/// Handle get_departments_table
pub async fn handle_departments(
    client: &BoeClient,
    params: CodeTableParams,
) -> Result<Vec<ToolResult>, ToolError> {
    let limit = check_range("limit", params.limit, 1..=200)? as usize;
    let term = optional_text(&params.search_term);
    info!(?term, active_only = params.active_only, limit, "Listing departments");

    let mut entries = client.auxiliary_table(AuxiliaryTable::Departments).await?;
    entries.retain(|e| (!params.active_only || e.active) && term.is_none_or(|t| e.description_contains(t)));
    entries.sort_by(|a, b| a.description.cmp(&b.description));

    Ok(render_table(AuxiliaryTable::Departments, &entries, limit, term))
}

/// Handle get_legal_ranges_table, ordered by normative hierarchy
pub async fn handle_legal_ranges(
    client: &BoeClient,
    params: CodeTableParams,
) -> Result<Vec<ToolResult>, ToolError> {
    let limit = check_range("limit", params.limit, 1..=200)? as usize;
    let term = optional_text(&params.search_term);
    info!(?term, active_only = params.active_only, "Listing legal ranges");

    let mut entries = client.auxiliary_table(AuxiliaryTable::LegalRanges).await?;
    entries.retain(|e| (!params.active_only || e.active) && term.is_none_or(|t| e.description_contains(t)));
    entries.sort_by(|a, b| {
        a.hierarchy_rank()
            .cmp(&b.hierarchy_rank())
            .then_with(|| a.code.cmp(&b.code))
    });

    Ok(render_table(AuxiliaryTable::LegalRanges, &entries, limit, term))
}

/// Handle get_matters_table
pub async fn handle_matters(
    client: &BoeClient,
    params: MattersTableParams,
) -> Result<Vec<ToolResult>, ToolError> {
    let limit = check_range("limit", params.limit, 1..=200)? as usize;
    let term = optional_text(&params.search_term);
    info!(?term, limit, "Listing matters");

    let mut entries = client.auxiliary_table(AuxiliaryTable::Matters).await?;
    entries.retain(|e| term.is_none_or(|t| e.description_contains(t)));
    entries.sort_by(|a, b| a.description.cmp(&b.description));

    Ok(render_table(AuxiliaryTable::Matters, &entries, limit, term))
}

/// Handle get_scopes_table and get_consolidation_states_table
pub async fn handle_whole_table(
    client: &BoeClient,
    table: AuxiliaryTable,
) -> Result<Vec<ToolResult>, ToolError> {
    info!(%table, "Listing table");
    let mut entries = client.auxiliary_table(table).await?;
    entries.sort_by(|a, b| a.code.cmp(&b.code));
    let limit = entries.len().max(1);
    Ok(render_table(table, &entries, limit, None))
}

fn render_table(
    table: AuxiliaryTable,
    entries: &[AuxiliaryCodeEntry],
    limit: usize,
    term: Option<&str>,
) -> Vec<ToolResult> {
    if entries.is_empty() {
        let text = match term {
            Some(t) => format!("No se encontraron {} que contengan \"{}\".", table.display_name().to_lowercase(), t),
            None => format!("La tabla de {} está vacía.", table.display_name().to_lowercase()),
        };
        return vec![ToolResult::with_data(text, json!({"table": table, "count": 0}))];
    }

    let shown = entries.len().min(limit);
    let mut header = format!(
        "# {}\n\n**{} entradas** (mostrando {})",
        table.display_name(),
        entries.len(),
        shown
    );
    if let Some(t) = term {
        header.push_str(&format!(" que contienen \"{}\"", t));
    }

    let mut results = vec![ToolResult::with_data(
        header,
        json!({"table": table, "count": entries.len(), "shown": shown}),
    )];
    results.extend(entries.iter().take(limit).map(render_entry));
    if entries.len() > limit {
        results.push(ToolResult::text(format!(
            "... y {} entradas más. Usa `search_term` o aumenta `limit`.",
            entries.len() - limit
        )));
    }
    results
}

fn render_entry(entry: &AuxiliaryCodeEntry) -> ToolResult {
    let mut text = format!("- `{}` {}", entry.code, truncate_chars(&entry.description, 120));
    if !entry.active {
        text.push_str(" *(inactivo)*");
    }
    let data = structured(entry).unwrap_or_else(|_| json!({"code": entry.code}));
    ToolResult::with_data(text, data)
}

/// Fetch several tables one after the other
///
/// With more than one table, a table upstream reports as missing (404) is
/// skipped. Any other failure ends the call.
async fn fetch_tables(
    client: &BoeClient,
    tables: &[AuxiliaryTable],
) -> Result<Vec<(AuxiliaryTable, Vec<AuxiliaryCodeEntry>)>, ToolError> {
    let mut fetched = Vec::with_capacity(tables.len());
    for &table in tables {
        match client.auxiliary_table(table).await {
            Ok(entries) => fetched.push((table, entries)),
            Err(e) if tables.len() > 1 && e.is_not_found() => {
                debug!(%table, error = %e, "Skipping unavailable table");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(fetched)
}

/// Handle search_auxiliary_data
pub async fn handle_search(
    client: &BoeClient,
    params: AuxiliarySearchParams,
) -> Result<Vec<ToolResult>, ToolError> {
    let query = required_text("query", &params.query)?;
    let tables: Vec<AuxiliaryTable> = match optional_text(&params.table_type) {
        None | Some("all") => AuxiliaryTable::ALL.to_vec(),
        Some(kind) => vec![AuxiliaryTable::from_table_type(kind).ok_or_else(|| {
            ToolError::Schema(format!(
                "table_type must be one of all, departments, ranges, matters, scopes, states; got '{}'",
                kind
            ))
        })?],
    };
    info!(query, tables = tables.len(), "Searching auxiliary tables");

    let mut results = Vec::new();
    let mut total = 0usize;

    for (table, entries) in fetch_tables(client, &tables).await? {
        let matching: Vec<&AuxiliaryCodeEntry> = entries.iter().filter(|e| e.matches(query)).collect();
        if matching.is_empty() {
            continue;
        }
        total += matching.len();

        results.push(ToolResult::with_data(
            format!("## {} ({})", table.display_name(), matching.len()),
            json!({"table": table, "count": matching.len()}),
        ));
        results.extend(
            matching
                .iter()
                .take(MAX_SEARCH_ROWS_PER_TABLE)
                .map(|e| render_entry(e)),
        );
        if matching.len() > MAX_SEARCH_ROWS_PER_TABLE {
            results.push(ToolResult::text(format!(
                "*(... y {} más en {})*",
                matching.len() - MAX_SEARCH_ROWS_PER_TABLE,
                table.display_name()
            )));
        }
    }

    if total == 0 {
        return Ok(vec![ToolResult::with_data(
            format!("No se encontraron resultados para \"{}\" en las tablas auxiliares.", query),
            json!({"query": query, "count": 0}),
        )]);
    }

    results.insert(
        0,
        ToolResult::with_data(
            format!("# Búsqueda: \"{}\"\n\n**Encontrados {} resultados**", query, total),
            json!({"query": query, "count": total}),
        ),
    );
    Ok(results)
}

/// Handle get_code_description
///
/// An unknown code is reported as a result, not an error.
pub async fn handle_code_description(
    client: &BoeClient,
    params: CodeDescriptionParams,
) -> Result<Vec<ToolResult>, ToolError> {
    let code = required_text("code", &params.code)?;
    let tables: Vec<AuxiliaryTable> = match optional_text(&params.code_type) {
        None => AuxiliaryTable::ALL.to_vec(),
        Some(kind) => vec![AuxiliaryTable::from_code_type(kind).ok_or_else(|| {
            ToolError::Schema(format!(
                "code_type must be one of department, range, matter, scope, state; got '{}'",
                kind
            ))
        })?],
    };
    info!(code, tables = tables.len(), "Looking up code description");

    let found: Vec<AuxiliaryCodeEntry> = fetch_tables(client, &tables)
        .await?
        .into_iter()
        .filter_map(|(_, entries)| entries.into_iter().find(|e| e.code == code))
        .collect();

    if found.is_empty() {
        return Ok(vec![ToolResult::with_data(
            format!("No se encontró el código '{}' en las tablas auxiliares.", code),
            json!({"code": code, "found": false}),
        )]);
    }

    let mut out = vec![format!("# Código `{}`", code), String::new()];
    for entry in &found {
        let status = if entry.active { "" } else { " *(inactivo)*" };
        out.push(format!("**{}:** {}{}", entry.table.display_name(), entry.description, status));
    }

    let data = json!({
        "code": code,
        "found": true,
        "description": found[0].description,
        "matches": found,
    });
    Ok(vec![ToolResult::with_data(out.join("\n"), data)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, description: &str, active: bool) -> AuxiliaryCodeEntry {
        AuxiliaryCodeEntry {
            code: code.to_string(),
            description: description.to_string(),
            active,
            table: AuxiliaryTable::Departments,
        }
    }

    #[test]
    fn test_code_table_defaults() {
        let params: CodeTableParams = serde_json::from_str("{}").unwrap();
        assert!(params.active_only);
        assert_eq!(params.limit, 50);
        assert!(serde_json::from_str::<NoParams>(r#"{"limit": 5}"#).is_err());
    }

    #[test]
    fn test_render_table_limits_rows() {
        let entries = vec![
            entry("7723", "Jefatura del Estado", true),
            entry("9574", "Ministerio de Hacienda", true),
            entry("1000", "Ministerio de la Gobernación", false),
        ];
        let results = render_table(AuxiliaryTable::Departments, &entries, 2, None);
        // header, two rows, remainder
        assert_eq!(results.len(), 4);
        assert!(results[1].text.contains("`7723` Jefatura del Estado"));
        assert_eq!(results[1].data.as_ref().unwrap()["code"], "7723");
    }

    #[test]
    fn test_render_table_empty_with_term() {
        let results = render_table(AuxiliaryTable::Matters, &[], 10, Some("astronáutica"));
        assert_eq!(results.len(), 1);
        assert!(results[0].text.contains("astronáutica"));
    }

    #[test]
    fn test_inactive_entry_is_marked() {
        let result = render_entry(&entry("1000", "Ministerio de la Gobernación", false));
        assert!(result.text.ends_with("*(inactivo)*"));
    }
}
