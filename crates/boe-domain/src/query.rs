//! Search query module - consolidated legislation search parameters

use crate::date::ApiDate;
use serde_json::json;

/// Maximum page size accepted by the legislation search
pub const MAX_SEARCH_LIMIT: u32 = 100;

/// Default page size for the legislation search
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Validated consolidated-legislation search
///
/// Pagination is forwarded to upstream as-is; one query maps to one page.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Free text (upstream accepts it but does not honor it)
    pub text: Option<String>,
    /// Title text
    pub title: Option<String>,
    /// Issuing department code, e.g. `7723`
    pub department_code: Option<String>,
    /// Legal range code, e.g. `1300`
    pub legal_range_code: Option<String>,
    /// Controlled-vocabulary matter code
    pub matter_code: Option<String>,
    /// Publication date lower bound
    pub from_date: Option<ApiDate>,
    /// Publication date upper bound
    pub to_date: Option<ApiDate>,
    /// Page size
    pub limit: u32,
    /// Results to skip
    pub offset: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: None,
            title: None,
            department_code: None,
            legal_range_code: None,
            matter_code: None,
            from_date: None,
            to_date: None,
            limit: DEFAULT_SEARCH_LIMIT,
            offset: 0,
        }
    }
}

impl SearchQuery {
    /// Check bounds and date ordering
    pub fn validate(&self) -> Result<(), String> {
        if self.limit == 0 || self.limit > MAX_SEARCH_LIMIT {
            return Err(format!(
                "limit must be between 1 and {}, got {}",
                MAX_SEARCH_LIMIT, self.limit
            ));
        }
        if let (Some(from), Some(to)) = (self.from_date, self.to_date) {
            if from > to {
                return Err(format!(
                    "from_date ({}) must not be after to_date ({})",
                    from, to
                ));
            }
        }
        Ok(())
    }

    /// Whether the caller asked for text matching
    pub fn has_text(&self) -> bool {
        non_blank(&self.text).is_some() || non_blank(&self.title).is_some()
    }

    /// Text the caller searched for, if any
    pub fn search_text(&self) -> Option<&str> {
        non_blank(&self.text).or_else(|| non_blank(&self.title))
    }

    /// Structured query document for the upstream `query` parameter
    ///
    /// `None` when no text or code filter is set; date bounds alone travel
    /// as plain `from`/`to` parameters.
    pub fn to_upstream_query(&self) -> Option<String> {
        let mut clauses = Vec::new();
        if let Some(text) = non_blank(&self.text) {
            clauses.push(format!("texto:\"{}\"", escape_quotes(text)));
        }
        if let Some(title) = non_blank(&self.title) {
            clauses.push(format!("titulo:\"{}\"", escape_quotes(title)));
        }
        if let Some(code) = non_blank(&self.department_code) {
            clauses.push(format!("departamento@codigo:{}", code));
        }
        if let Some(code) = non_blank(&self.legal_range_code) {
            clauses.push(format!("rango@codigo:{}", code));
        }
        if let Some(code) = non_blank(&self.matter_code) {
            clauses.push(format!("materia@codigo:{}", code));
        }

        if clauses.is_empty() {
            return None;
        }

        let mut document = json!({
            "query": {
                "query_string": { "query": clauses.join(" AND ") }
            }
        });

        if self.from_date.is_some() || self.to_date.is_some() {
            let mut range = serde_json::Map::new();
            if let Some(from) = self.from_date {
                range.insert("gte".to_string(), json!(from.to_api_string()));
            }
            if let Some(to) = self.to_date {
                range.insert("lte".to_string(), json!(to.to_api_string()));
            }
            document["query"]["range"] = json!({ "fecha_publicacion": range });
        }

        Some(document.to_string())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn escape_quotes(value: &str) -> String {
    value.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let query = SearchQuery::default();
        assert!(query.validate().is_ok());
        assert_eq!(query.limit, 20);
        assert_eq!(query.to_upstream_query(), None);
    }

    #[test]
    fn test_limit_bounds() {
        let mut query = SearchQuery::default();
        query.limit = 0;
        assert!(query.validate().is_err());
        query.limit = 101;
        assert!(query.validate().is_err());
        query.limit = 100;
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_date_order() {
        let query = SearchQuery {
            from_date: Some(ApiDate::parse("20201231").unwrap()),
            to_date: Some(ApiDate::parse("20200101").unwrap()),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_upstream_query_joins_clauses() {
        let query = SearchQuery {
            text: Some("Constitución".to_string()),
            department_code: Some("7723".to_string()),
            legal_range_code: Some("1300".to_string()),
            from_date: Some(ApiDate::parse("19780101").unwrap()),
            ..Default::default()
        };

        let doc: serde_json::Value =
            serde_json::from_str(&query.to_upstream_query().unwrap()).unwrap();
        assert_eq!(
            doc["query"]["query_string"]["query"],
            "texto:\"Constitución\" AND departamento@codigo:7723 AND rango@codigo:1300"
        );
        assert_eq!(doc["query"]["range"]["fecha_publicacion"]["gte"], "19780101");
        assert!(doc["query"]["range"]["fecha_publicacion"].get("lte").is_none());
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let query = SearchQuery {
            text: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!query.has_text());
        assert_eq!(query.to_upstream_query(), None);
    }
}
