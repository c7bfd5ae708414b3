//! Daily summary tools (BOE and BORME)

use crate::error::ToolError;
use crate::format::{check_range, optional_text, parse_date, structured, truncate_chars};
use boe_client::BoeClient;
use boe_domain::summary::top_counts;
use boe_domain::{ApiDate, SummaryDocument, SummaryItem, SummaryKind, ToolResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{debug, info};

/// Cap on items reported by search_recent_boe
const MAX_RECENT_MATCHES: usize = 100;

/// Entries listed per ranking in the weekly report
const TOP_ENTRIES: usize = 5;

/// BOE section selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionFilter {
    /// No section filter
    #[default]
    #[serde(rename = "all")]
    All,
    /// I. Disposiciones generales
    #[serde(rename = "1")]
    GeneralProvisions,
    /// II.A Nombramientos, situaciones e incidencias
    #[serde(rename = "2A")]
    Appointments,
    /// II.B Oposiciones y concursos
    #[serde(rename = "2B")]
    Competitions,
    /// III. Otras disposiciones
    #[serde(rename = "3")]
    OtherProvisions,
    /// IV. Administración de Justicia
    #[serde(rename = "4")]
    Justice,
    /// V. Anuncios (every 5x subsection)
    #[serde(rename = "5")]
    Announcements,
}

impl SectionFilter {
    fn matches(self, section_code: &str) -> bool {
        match self {
            Self::All => true,
            Self::GeneralProvisions => section_code == "1",
            Self::Appointments => section_code == "2A",
            Self::Competitions => section_code == "2B",
            Self::OtherProvisions => section_code == "3",
            Self::Justice => section_code == "4",
            Self::Announcements => section_code.starts_with('5'),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_items() -> u32 {
    50
}

fn default_days_back() -> u32 {
    7
}

/// Parameters for get_boe_summary
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoeSummaryParams {
    /// Publication date (YYYYMMDD)
    pub date: String,
    #[serde(default)]
    pub section_filter: SectionFilter,
    /// Department code, e.g. `7723`
    #[serde(default)]
    pub department_filter: Option<String>,
    #[serde(default = "default_true")]
    pub include_pdf_links: bool,
    #[serde(default = "default_max_items")]
    pub max_items: u32,
}

/// Parameters for get_borme_summary
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BormeSummaryParams {
    /// Publication date (YYYYMMDD)
    pub date: String,
    /// Province code or name
    #[serde(default)]
    pub province_filter: Option<String>,
    #[serde(default = "default_true")]
    pub include_pdf_links: bool,
    #[serde(default = "default_max_items")]
    pub max_items: u32,
}

/// Parameters for search_recent_boe
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecentSearchParams {
    #[serde(default = "default_days_back")]
    pub days_back: u32,
    /// Phrase that must appear in the title, ignoring case
    #[serde(default)]
    pub search_terms: Option<String>,
    #[serde(default)]
    pub section_filter: SectionFilter,
    #[serde(default)]
    pub department_filter: Option<String>,
}

/// Parameters for get_weekly_summary
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeeklySummaryParams {
    /// First day of the week (YYYYMMDD)
    pub start_date: String,
    #[serde(default = "default_true")]
    pub include_statistics: bool,
}

/// Handle get_boe_summary
pub async fn handle_boe_summary(
    client: &BoeClient,
    params: BoeSummaryParams,
) -> Result<Vec<ToolResult>, ToolError> {
    let date = parse_date("date", &params.date)?;
    let max_items = check_range("max_items", params.max_items, 1..=100)? as usize;
    let department = optional_text(&params.department_filter);
    info!(%date, section = ?params.section_filter, ?department, "Fetching BOE summary");

    let doc = fetch_summary(client, SummaryKind::Boe, date).await?;
    let items: Vec<&SummaryItem> = doc
        .filtered(None, department)
        .filter(|item| params.section_filter.matches(&item.section_code))
        .collect();

    Ok(render_summary(&doc, &items, max_items, params.include_pdf_links))
}

/// Handle get_borme_summary
pub async fn handle_borme_summary(
    client: &BoeClient,
    params: BormeSummaryParams,
) -> Result<Vec<ToolResult>, ToolError> {
    let date = parse_date("date", &params.date)?;
    let max_items = check_range("max_items", params.max_items, 1..=100)? as usize;
    let province = optional_text(&params.province_filter);
    info!(%date, ?province, "Fetching BORME summary");

    let doc = fetch_summary(client, SummaryKind::Borme, date).await?;
    let items: Vec<&SummaryItem> = doc
        .items
        .iter()
        .filter(|item| province.is_none_or(|p| matches_province(item, p)))
        .collect();

    Ok(render_summary(&doc, &items, max_items, params.include_pdf_links))
}

/// Province given as code or (part of) a name
fn matches_province(item: &SummaryItem, province: &str) -> bool {
    let needle = province.to_lowercase();
    item.department_code.eq_ignore_ascii_case(province)
        || item.department_name.to_lowercase().contains(&needle)
        || item.title.to_lowercase().contains(&needle)
}

async fn fetch_summary(
    client: &BoeClient,
    kind: SummaryKind,
    date: ApiDate,
) -> Result<SummaryDocument, ToolError> {
    client.summary(kind, date).await?.ok_or_else(|| {
        ToolError::not_found(format!(
            "No hay sumario del {} publicado el {}",
            kind,
            date.short()
        ))
    })
}

fn render_summary(
    doc: &SummaryDocument,
    items: &[&SummaryItem],
    max_items: usize,
    include_pdf_links: bool,
) -> Vec<ToolResult> {
    let shown = items.len().min(max_items);

    let mut header = vec![format!(
        "# Sumario del {} del {} {}",
        doc.kind,
        doc.date.weekday_es(),
        doc.date.long_es()
    )];
    for journal in &doc.journals {
        let mut line = format!("- **Número:** {}", journal.number);
        if include_pdf_links {
            if let Some(url) = &journal.pdf_url {
                line.push_str(&format!(" | **PDF del sumario:** {}", url));
            }
        }
        header.push(line);
    }
    header.push(String::new());
    if items.is_empty() {
        header.push("No hay documentos que cumplan los filtros indicados.".to_string());
    } else {
        header.push(format!(
            "**{} documentos** (mostrando {})",
            items.len(),
            shown
        ));
    }

    let mut results = vec![ToolResult::with_data(
        header.join("\n"),
        json!({
            "kind": doc.kind,
            "date": doc.date,
            "journals": doc.journals,
            "total_items": doc.items.len(),
            "matching_items": items.len(),
            "shown_items": shown,
        }),
    )];

    for (i, item) in items.iter().take(max_items).enumerate() {
        results.push(render_item(i + 1, item, include_pdf_links, None));
    }

    if items.len() > max_items {
        results.push(ToolResult::text(format!(
            "... y {} documentos más. Aumenta `max_items` o aplica filtros para verlos.",
            items.len() - max_items
        )));
    }

    results
}

fn render_item(
    position: usize,
    item: &SummaryItem,
    include_pdf_links: bool,
    date: Option<ApiDate>,
) -> ToolResult {
    let mut out = vec![
        format!("### {}. {}", position, truncate_chars(&item.title, 300)),
        format!("- **ID:** `{}`", item.identifier),
    ];
    if let Some(date) = date {
        out.push(format!("- **Fecha:** {}", date.short()));
    }
    out.push(format!("- **Sección:** {}", item.section_name));
    if !item.department_name.is_empty() {
        out.push(format!("- **Departamento:** {}", item.department_name));
    }
    if let Some(epigraph) = &item.epigraph {
        out.push(format!("- **Epígrafe:** {}", epigraph));
    }
    if include_pdf_links {
        if let Some(url) = &item.pdf_url {
            let mut line = format!("- **PDF:** {}", url);
            if let Some(size) = &item.pdf_size_kb {
                line.push_str(&format!(" ({} KB)", size));
            }
            if let Some((first, last)) = &item.pages {
                line.push_str(&format!(" págs. {}-{}", first, last));
            }
            out.push(line);
        }
    }
    if let Some(url) = &item.html_url {
        out.push(format!("- **HTML:** {}", url));
    }

    let mut data = structured(item).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut data {
        if !include_pdf_links {
            map.remove("pdf_url");
            map.remove("pdf_size_kb");
            map.remove("pages");
        }
        if let Some(date) = date {
            map.insert("date".to_string(), json!(date));
        }
    }
    ToolResult::with_data(out.join("\n"), data)
}

/// Handle search_recent_boe, counting back from today
pub async fn handle_recent_search(
    client: &BoeClient,
    params: RecentSearchParams,
) -> Result<Vec<ToolResult>, ToolError> {
    search_recent_from(client, params, ApiDate::today()).await
}

/// search_recent_boe with an explicit reference day
///
/// Walks from `today` back to `today - days_back`, one upstream call per day
/// (Sundays skipped). Days without a published summary are skipped.
pub async fn search_recent_from(
    client: &BoeClient,
    params: RecentSearchParams,
    today: ApiDate,
) -> Result<Vec<ToolResult>, ToolError> {
    let days_back = check_range("days_back", params.days_back, 1..=30)?;
    let terms = optional_text(&params.search_terms);
    let department = optional_text(&params.department_filter);
    info!(days_back, ?terms, %today, "Searching recent BOE summaries");

    let mut matches: Vec<(ApiDate, SummaryItem)> = Vec::new();
    let mut days_read = 0usize;

    for offset in 0..=i64::from(days_back) {
        let date = today.add_days(-offset);
        if date.is_sunday() {
            continue;
        }
        let doc = match client.summary(SummaryKind::Boe, date).await {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                debug!(%date, "No summary published");
                continue;
            }
            Err(e) if is_missing_day(&e) => {
                debug!(%date, error = %e, "Skipping day without summary");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        days_read += 1;

        matches.extend(
            doc.filtered(None, department)
                .filter(|item| params.section_filter.matches(&item.section_code))
                .filter(|item| terms.is_none_or(|t| item.matches_terms(t)))
                .map(|item| (date, item.clone())),
        );
    }

    let from = today.add_days(-i64::from(days_back));
    let period = format!("del {} al {}", from.short(), today.short());
    let summary_data = json!({
        "from": from,
        "to": today,
        "days_read": days_read,
        "search_terms": terms,
        "count": matches.len(),
    });

    if matches.is_empty() {
        let text = match terms {
            Some(t) => format!("No se encontraron documentos con \"{}\" en el BOE {}.", t, period),
            None => format!("No se encontraron documentos en el BOE {}.", period),
        };
        return Ok(vec![ToolResult::with_data(text, summary_data)]);
    }

    let mut header = format!(
        "# Búsqueda en el BOE {}\n\n**{} documentos** en {} sumarios",
        period,
        matches.len(),
        days_read
    );
    if let Some(t) = terms {
        header.push_str(&format!(" que contienen \"{}\"", t));
    }

    let mut results = vec![ToolResult::with_data(header, summary_data)];
    for (i, (date, item)) in matches.iter().take(MAX_RECENT_MATCHES).enumerate() {
        results.push(render_item(i + 1, item, true, Some(*date)));
    }
    if matches.len() > MAX_RECENT_MATCHES {
        results.push(ToolResult::text(format!(
            "... y {} documentos más. Usa términos más específicos o reduce `days_back`.",
            matches.len() - MAX_RECENT_MATCHES
        )));
    }
    Ok(results)
}

/// Upstream answers 404 for days without a published summary
fn is_missing_day(error: &boe_client::ClientError) -> bool {
    error.is_not_found()
}

/// One day of the weekly report
#[derive(Debug, Serialize)]
struct DayCount {
    date: ApiDate,
    weekday: &'static str,
    documents: usize,
    published: bool,
}

/// Handle get_weekly_summary
///
/// Seven consecutive days from `start_date`, Sundays reported without a call.
pub async fn handle_weekly_summary(
    client: &BoeClient,
    params: WeeklySummaryParams,
) -> Result<Vec<ToolResult>, ToolError> {
    let start = parse_date("start_date", &params.start_date)?;
    let end = start.add_days(6);
    info!(%start, %end, "Building weekly summary");

    let mut days = Vec::with_capacity(7);
    let mut sections: HashMap<String, usize> = HashMap::new();
    let mut departments: HashMap<String, usize> = HashMap::new();

    for offset in 0..7 {
        let date = start.add_days(offset);
        let doc = if date.is_sunday() {
            None
        } else {
            match client.summary(SummaryKind::Boe, date).await {
                Ok(doc) => doc,
                Err(e) if is_missing_day(&e) => {
                    debug!(%date, error = %e, "No summary for day");
                    None
                }
                Err(e) => return Err(e.into()),
            }
        };

        let documents = doc.as_ref().map_or(0, |d| d.items.len());
        if let Some(doc) = &doc {
            merge_counts(&mut sections, doc.count_by_section());
            merge_counts(&mut departments, doc.count_by_department());
        }
        days.push(DayCount {
            date,
            weekday: date.weekday_es(),
            documents,
            published: doc.is_some(),
        });
    }

    let total: usize = days.iter().map(|d| d.documents).sum();
    let published = days.iter().filter(|d| d.published).count();

    let mut out = vec![
        "# Resumen semanal del BOE".to_string(),
        format!("**Semana del {} al {}**", start.short(), end.short()),
        String::new(),
    ];

    if total == 0 {
        out.push("No se encontraron publicaciones del BOE en esta semana.".to_string());
    } else {
        out.push("## Resumen general".to_string());
        out.push(format!("- **Total de documentos:** {}", total));
        out.push(format!("- **Días con publicación:** {}", published));
        out.push(format!(
            "- **Promedio diario:** {:.1} documentos",
            total as f64 / published.max(1) as f64
        ));
        out.push(String::new());
        out.push("## Distribución diaria".to_string());
        for day in &days {
            if day.documents > 0 {
                out.push(format!(
                    "- **{} {}:** {} documentos",
                    day.weekday,
                    day.date.short(),
                    day.documents
                ));
            } else {
                out.push(format!("- **{} {}:** sin publicación", day.weekday, day.date.short()));
            }
        }
    }

    let top_sections = top_counts(&sections, TOP_ENTRIES);
    let top_departments = top_counts(&departments, TOP_ENTRIES);
    if params.include_statistics && total > 0 {
        out.push(String::new());
        out.push("## Secciones más activas".to_string());
        for (name, count) in &top_sections {
            out.push(format!("- **{}:** {} documentos", name, count));
        }
        out.push(String::new());
        out.push("## Departamentos más activos".to_string());
        for (name, count) in &top_departments {
            out.push(format!("- **{}:** {} documentos", truncate_chars(name, 50), count));
        }
    }

    let mut data = json!({
        "start_date": start,
        "end_date": end,
        "total_documents": total,
        "days_with_publication": published,
        "days": days,
    });
    if params.include_statistics {
        data["top_sections"] = json!(top_sections);
        data["top_departments"] = json!(top_departments);
    }

    Ok(vec![ToolResult::with_data(out.join("\n"), data)])
}

fn merge_counts(into: &mut HashMap<String, usize>, counts: HashMap<String, usize>) {
    for (key, count) in counts {
        *into.entry(key).or_insert(0) += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(section: &str, department: &str, title: &str) -> SummaryItem {
        SummaryItem {
            section_code: section.to_string(),
            section_name: format!("Sección {}", section),
            department_code: "7723".to_string(),
            department_name: department.to_string(),
            epigraph: None,
            identifier: "BOE-A-2024-10000".to_string(),
            title: title.to_string(),
            pdf_url: Some("https://www.boe.es/boe/dias/2024/05/29/pdfs/BOE-A-2024-10000.pdf".to_string()),
            pdf_size_kb: Some("210".to_string()),
            pages: None,
            html_url: None,
        }
    }

    #[test]
    fn test_section_filter_parsing() {
        let params: BoeSummaryParams =
            serde_json::from_str(r#"{"date": "20240529", "section_filter": "2A"}"#).unwrap();
        assert_eq!(params.section_filter, SectionFilter::Appointments);
        assert_eq!(params.max_items, 50);
        assert!(params.include_pdf_links);
        assert!(serde_json::from_str::<BoeSummaryParams>(
            r#"{"date": "20240529", "section_filter": "9"}"#
        )
        .is_err());
    }

    #[test]
    fn test_section_filter_matching() {
        assert!(SectionFilter::All.matches("2B"));
        assert!(SectionFilter::Announcements.matches("5B"));
        assert!(!SectionFilter::GeneralProvisions.matches("2A"));
    }

    #[test]
    fn test_recent_params_defaults() {
        let params: RecentSearchParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.days_back, 7);
        assert_eq!(params.section_filter, SectionFilter::All);
        assert!(params.search_terms.is_none());
    }

    #[test]
    fn test_matches_province() {
        let entry = item("A", "MADRID", "Empresarios. Actos inscritos");
        assert!(matches_province(&entry, "madrid"));
        assert!(!matches_province(&entry, "Sevilla"));
    }

    #[test]
    fn test_render_item_without_pdf_links() {
        let entry = item("1", "JEFATURA DEL ESTADO", "Ley 1/2024, de 29 de mayo.");
        let result = render_item(1, &entry, false, None);
        assert!(!result.text.contains("PDF"));
        let data = result.data.unwrap();
        assert!(data.get("pdf_url").is_none());
        assert_eq!(data["identifier"], "BOE-A-2024-10000");
    }

    #[test]
    fn test_render_summary_caps_items() {
        let doc = SummaryDocument {
            kind: SummaryKind::Boe,
            date: ApiDate::parse("20240529").unwrap(),
            journals: Vec::new(),
            items: vec![
                item("1", "JEFATURA DEL ESTADO", "Ley 1/2024"),
                item("1", "JEFATURA DEL ESTADO", "Ley 2/2024"),
                item("3", "MINISTERIO DE HACIENDA", "Orden HAC/1/2024"),
            ],
        };
        let items: Vec<&SummaryItem> = doc.items.iter().collect();
        let results = render_summary(&doc, &items, 2, true);
        // header + two items + remainder notice
        assert_eq!(results.len(), 4);
        assert!(results[0].text.contains("miércoles 29 de mayo de 2024"));
        assert_eq!(results[0].data.as_ref().unwrap()["shown_items"], 2);
        assert!(results[3].text.contains("1 documentos más"));
    }

    #[test]
    fn test_merge_counts() {
        let mut total = HashMap::from([("I".to_string(), 2)]);
        merge_counts(&mut total, HashMap::from([("I".to_string(), 3), ("III".to_string(), 1)]));
        assert_eq!(total["I"], 5);
        assert_eq!(total["III"], 1);
    }
}
