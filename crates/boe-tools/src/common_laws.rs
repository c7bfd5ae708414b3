//! Tools over the static table of well-known laws
//!
//! None of these touch the network.

use crate::error::ToolError;
use crate::format::{check_range, optional_text, required_text, structured};
use boe_domain::common_laws::{self, LawCategory, LawReference};
use boe_domain::{ApiDate, ToolResult};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

fn default_true() -> bool {
    true
}

fn default_years_back() -> u32 {
    5
}

/// Parameters for list_common_laws
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListCommonLawsParams {
    /// Category key or `all`
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_true")]
    pub show_descriptions: bool,
}

/// Parameters for search_common_laws
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchCommonLawsParams {
    /// Matched against names and aliases
    pub keyword: String,
}

/// Parameters for get_recent_important_laws
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecentLawsParams {
    #[serde(default = "default_years_back")]
    pub years_back: u32,
}

/// Handle list_common_laws
pub fn handle_list(params: ListCommonLawsParams) -> Result<Vec<ToolResult>, ToolError> {
    let categories: Vec<LawCategory> = match optional_text(&params.category) {
        None | Some("all") => LawCategory::ALL.to_vec(),
        Some(key) => vec![LawCategory::from_key(key).ok_or_else(|| {
            ToolError::Schema(format!("Unknown law category '{}'", key))
        })?],
    };
    info!(categories = categories.len(), "Listing common laws");

    let mut results = vec![ToolResult::text(
        "# Leyes españolas de referencia\n\n\
         Identificadores BOE de las normas más consultadas. Úsalos con \
         `get_consolidated_law` para obtener el texto consolidado.",
    )];
    let mut count = 0usize;

    for category in categories {
        let laws: Vec<&LawReference> = common_laws::by_category(category).collect();
        if laws.is_empty() {
            continue;
        }
        count += laws.len();
        results.push(ToolResult::with_data(
            format!("## {}", category.display_name()),
            json!({"category": category, "count": laws.len()}),
        ));
        for law in laws {
            results.push(render_law(law, params.show_descriptions)?);
        }
    }

    if count == 0 {
        return Ok(vec![ToolResult::text("No hay leyes registradas en esa categoría.")]);
    }
    Ok(results)
}

/// Handle search_common_laws
pub fn handle_search(params: SearchCommonLawsParams) -> Result<Vec<ToolResult>, ToolError> {
    let keyword = required_text("keyword", &params.keyword)?;
    let matches = common_laws::search_by_keyword(keyword);
    let count = matches.clone().count();
    info!(keyword, count, "Searching common laws");

    if count == 0 {
        return Ok(vec![ToolResult::with_data(
            format!(
                "No se encontraron leyes conocidas para \"{}\". Prueba con \
                 `list_common_laws` para ver el catálogo completo.",
                keyword
            ),
            json!({"keyword": keyword, "count": 0}),
        )]);
    }

    let mut results = vec![ToolResult::with_data(
        format!("# Leyes que coinciden con \"{}\" ({})", keyword, count),
        json!({"keyword": keyword, "count": count}),
    )];
    for law in matches {
        results.push(render_law(law, true)?);
    }
    Ok(results)
}

/// Handle get_recent_important_laws relative to the current year
pub fn handle_recent(params: RecentLawsParams) -> Result<Vec<ToolResult>, ToolError> {
    recent_from(params, ApiDate::today().year())
}

/// get_recent_important_laws relative to `current_year`
pub fn recent_from(
    params: RecentLawsParams,
    current_year: i32,
) -> Result<Vec<ToolResult>, ToolError> {
    let years_back = check_range("years_back", params.years_back, 1..=20)?;
    let laws = common_laws::recent(years_back, current_year);
    let since = current_year - years_back as i32;

    if laws.is_empty() {
        return Ok(vec![ToolResult::with_data(
            format!("No hay leyes de referencia publicadas desde {}.", since),
            json!({"since": since, "count": 0}),
        )]);
    }

    let mut results = vec![ToolResult::with_data(
        format!("# Leyes importantes publicadas desde {} ({})", since, laws.len()),
        json!({"since": since, "count": laws.len()}),
    )];
    for law in laws {
        results.push(render_law(law, true)?);
    }
    Ok(results)
}

fn render_law(law: &LawReference, show_description: bool) -> Result<ToolResult, ToolError> {
    let mut lines = vec![
        format!("### {}", law.name),
        format!("- **ID BOE:** `{}`", law.identifier),
        format!("- **Fecha:** {}", law.date),
        format!("- **Categoría:** {}", law.category.display_name()),
    ];
    if !law.aliases.is_empty() {
        lines.push(format!("- **También conocida como:** {}", law.aliases.join(", ")));
    }
    if show_description {
        lines.push(format!("- **Descripción:** {}", law.description));
    }
    Ok(ToolResult::with_data(lines.join("\n"), structured(law)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_laboral() {
        let params = SearchCommonLawsParams {
            keyword: "laboral".to_string(),
        };
        let results = handle_search(params).unwrap();
        // header plus one result per match
        assert!(results.len() > 1);
        for result in &results[1..] {
            let data = result.data.as_ref().unwrap();
            let id = data["identifier"].as_str().unwrap();
            let law = common_laws::find(id).unwrap();
            assert!(law.matches_keyword("laboral"));
        }
    }

    #[test]
    fn test_search_without_matches() {
        let params = SearchCommonLawsParams {
            keyword: "norma suprema".to_string(),
        };
        let results = handle_search(params).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].data.as_ref().unwrap()["count"], 0);
    }

    #[test]
    fn test_search_requires_keyword() {
        let params = SearchCommonLawsParams {
            keyword: "  ".to_string(),
        };
        assert!(matches!(handle_search(params), Err(ToolError::Validation(_))));
    }

    #[test]
    fn test_list_single_category() {
        let params: ListCommonLawsParams =
            serde_json::from_str(r#"{"category": "organica", "show_descriptions": false}"#).unwrap();
        let results = handle_list(params).unwrap();
        // intro, category header, three laws
        assert_eq!(results.len(), 5);
        assert!(!results[2].text.contains("Descripción"));
    }

    #[test]
    fn test_list_unknown_category() {
        let params: ListCommonLawsParams =
            serde_json::from_str(r#"{"category": "fiscal"}"#).unwrap();
        assert!(matches!(handle_list(params), Err(ToolError::Schema(_))));
    }

    #[test]
    fn test_recent_from_fixed_year() {
        let results = recent_from(RecentLawsParams { years_back: 10 }, 2024).unwrap();
        assert_eq!(results.len(), 8);
        assert!(results[0].text.contains("desde 2014"));

        let err = recent_from(RecentLawsParams { years_back: 0 }, 2024).unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
    }
}
