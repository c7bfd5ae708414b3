//! Summary module - daily gazette indexes (sumarios)

use crate::date::ApiDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Which gazette a summary belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    /// Boletín Oficial del Estado
    Boe,
    /// Boletín Oficial del Registro Mercantil
    Borme,
}

impl SummaryKind {
    /// Upstream path segment
    pub fn path(&self) -> &'static str {
        match self {
            Self::Boe => "boe",
            Self::Borme => "borme",
        }
    }
}

impl fmt::Display for SummaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boe => f.write_str("BOE"),
            Self::Borme => f.write_str("BORME"),
        }
    }
}

/// One issue (diario) published on the date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalInfo {
    /// Issue number
    pub number: String,
    /// Link to the full summary PDF
    pub pdf_url: Option<String>,
    /// Size of that PDF in kilobytes
    pub pdf_size_kb: Option<String>,
}

/// One published document, flattened out of section/department/epigraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryItem {
    /// Section code (`1`, `2A`, ...) or province code in BORME
    pub section_code: String,
    /// Section name
    pub section_name: String,
    /// Department code
    pub department_code: String,
    /// Department name
    pub department_name: String,
    /// Epigraph the item was listed under, if any
    pub epigraph: Option<String>,
    /// Document identifier, e.g. `BOE-A-2024-10866`
    pub identifier: String,
    /// Title
    pub title: String,
    /// PDF link
    pub pdf_url: Option<String>,
    /// PDF size in kilobytes
    pub pdf_size_kb: Option<String>,
    /// First and last page in the printed issue
    pub pages: Option<(String, String)>,
    /// HTML link
    pub html_url: Option<String>,
}

impl SummaryItem {
    /// The trimmed phrase appears in the title, ignoring case
    ///
    /// Blank input matches everything.
    pub fn matches_terms(&self, terms: &str) -> bool {
        self.title
            .to_lowercase()
            .contains(&terms.trim().to_lowercase())
    }
}

/// A day's summary as fetched for the current call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDocument {
    /// Gazette
    pub kind: SummaryKind,
    /// Publication date
    pub date: ApiDate,
    /// Issues published that day
    pub journals: Vec<JournalInfo>,
    /// Every item, in upstream order
    pub items: Vec<SummaryItem>,
}

impl SummaryDocument {
    /// Items passing the section and department filters
    ///
    /// `None` or `"all"` disables the section filter.
    pub fn filtered<'a>(
        &'a self,
        section: Option<&'a str>,
        department: Option<&'a str>,
    ) -> impl Iterator<Item = &'a SummaryItem> + 'a {
        let section = section.filter(|s| *s != "all");
        self.items.iter().filter(move |item| {
            section.is_none_or(|s| item.section_code == s)
                && department.is_none_or(|d| item.department_code == d)
        })
    }

    /// Item counts keyed by section name
    pub fn count_by_section(&self) -> HashMap<String, usize> {
        count_by(&self.items, |item| &item.section_name)
    }

    /// Item counts keyed by department name
    pub fn count_by_department(&self) -> HashMap<String, usize> {
        count_by(&self.items, |item| &item.department_name)
    }
}

fn count_by<F>(items: &[SummaryItem], key: F) -> HashMap<String, usize>
where
    F: Fn(&SummaryItem) -> &String,
{
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(key(item).clone()).or_insert(0) += 1;
    }
    counts
}

/// Largest counts first, ties broken by name
pub fn top_counts(counts: &HashMap<String, usize>, n: usize) -> Vec<(String, usize)> {
    let mut sorted: Vec<_> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(section: &str, department: &str, title: &str) -> SummaryItem {
        SummaryItem {
            section_code: section.to_string(),
            section_name: format!("Sección {}", section),
            department_code: department.to_string(),
            department_name: format!("Departamento {}", department),
            epigraph: None,
            identifier: "BOE-A-2024-1".to_string(),
            title: title.to_string(),
            pdf_url: None,
            pdf_size_kb: None,
            pages: None,
            html_url: None,
        }
    }

    fn document() -> SummaryDocument {
        SummaryDocument {
            kind: SummaryKind::Boe,
            date: ApiDate::parse("20240529").unwrap(),
            journals: vec![],
            items: vec![
                item("1", "7723", "Ley Orgánica de Protección de Datos Personales"),
                item("1", "9574", "Real Decreto sobre tráfico"),
                item("2A", "9574", "Nombramientos"),
            ],
        }
    }

    #[test]
    fn test_matches_terms_is_case_insensitive_phrase() {
        let i = item("1", "7723", "Ley Orgánica de Protección de Datos Personales");
        assert!(i.matches_terms("protección de datos"));
        assert!(i.matches_terms("  PROTECCIÓN DE DATOS "));
        assert!(i.matches_terms("PROTECCIÓN"));
        assert!(!i.matches_terms("protección datos"));
        assert!(!i.matches_terms("datos de protección"));
        assert!(i.matches_terms("   "));
    }

    #[test]
    fn test_filtered() {
        let doc = document();
        assert_eq!(doc.filtered(None, None).count(), 3);
        assert_eq!(doc.filtered(Some("all"), None).count(), 3);
        assert_eq!(doc.filtered(Some("1"), None).count(), 2);
        assert_eq!(doc.filtered(Some("1"), Some("9574")).count(), 1);
        assert_eq!(doc.filtered(Some("5"), None).count(), 0);
    }

    #[test]
    fn test_top_counts() {
        let doc = document();
        let top = top_counts(&doc.count_by_department(), 5);
        assert_eq!(top[0], ("Departamento 9574".to_string(), 2));
        assert_eq!(top.len(), 2);
        assert_eq!(top_counts(&doc.count_by_section(), 1).len(), 1);
    }
}
