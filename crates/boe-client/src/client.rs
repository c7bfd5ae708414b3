//! BOE open-data API client implementation.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::{
    BlockPayload, Envelope, LawAnalysis, LawIndex, LawMetadata, LawText, RawSummary, RawTable,
    SummaryPayload, TextBlock,
};
use boe_domain::{
    ApiDate, AuxiliaryCodeEntry, AuxiliaryTable, JournalInfo, LawId, SearchQuery,
    SummaryDocument, SummaryItem, SummaryKind,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One section of a consolidated law
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LawSection<'a> {
    /// `metadatos`
    Metadata,
    /// `analisis`
    Analysis,
    /// `metadata-eli`
    EliMetadata,
    /// `texto`
    FullText,
    /// `texto/indice`
    Index,
    /// `texto/bloque/{id}`
    Block(&'a str),
}

impl LawSection<'_> {
    fn path(&self) -> String {
        match self {
            Self::Metadata => "metadatos".to_string(),
            Self::Analysis => "analisis".to_string(),
            Self::EliMetadata => "metadata-eli".to_string(),
            Self::FullText => "texto".to_string(),
            Self::Index => "texto/indice".to_string(),
            Self::Block(id) => format!("texto/bloque/{}", id),
        }
    }
}

/// Async client for the upstream open-data API
///
/// Holds a pooled `reqwest::Client`; cloning shares the pool. Every call is
/// attempted once with the configured timeout.
#[derive(Debug, Clone)]
pub struct BoeClient {
    http: reqwest::Client,
    base_url: String,
}

impl BoeClient {
    /// Open a client (and its connection pool)
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the HTTP client cannot be built
    pub fn open(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "Opened upstream client");

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Release the connection pool
    ///
    /// Dropping the client has the same effect; this only makes the end of
    /// the scope explicit.
    pub fn close(self) {
        debug!(base_url = %self.base_url, "Closing upstream client");
        drop(self);
    }

    /// API root this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request and unwrap the `{status, data}` envelope
    ///
    /// Returns `Ok(None)` when upstream answers successfully with no data.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Network`] on connection failure or timeout
    /// - [`ClientError::Upstream`] on a non-2xx status (HTTP or envelope)
    /// - [`ClientError::Parse`] if the body does not match `T`
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>, ClientError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%method, %url, ?params, "Upstream request");

        let response = self
            .http
            .request(method, &url)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%url, status = status.as_u16(), bytes = body.len(), "Upstream response");

        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Upstream returned an error status");
            return Err(ClientError::upstream(status.as_u16(), body));
        }

        let envelope: Envelope = serde_json::from_str(&body)?;

        if let Some(code) = envelope.status.as_ref().and_then(|s| s.code.as_deref()) {
            if code != "200" {
                let text = envelope
                    .status
                    .as_ref()
                    .and_then(|s| s.text.clone())
                    .unwrap_or_default();
                let status = code.parse().unwrap_or(502);
                warn!(%url, status, "Upstream envelope reported an error");
                return Err(ClientError::upstream(status, text));
            }
        }

        if is_empty(&envelope.data) {
            return Ok(None);
        }

        serde_json::from_value(envelope.data)
            .map(Some)
            .map_err(|e| ClientError::Parse(format!("Unexpected response from {}: {}", endpoint, e)))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>, ClientError> {
        self.request(Method::GET, endpoint, params).await
    }

    /// Search consolidated legislation (one page)
    pub async fn search_legislation(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<LawMetadata>, ClientError> {
        let mut params = vec![
            ("offset", query.offset.to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(q) = query.to_upstream_query() {
            params.push(("query", q));
        }
        if let Some(from) = query.from_date {
            params.push(("from", from.to_api_string()));
        }
        if let Some(to) = query.to_date {
            params.push(("to", to.to_api_string()));
        }

        let rows: Option<Value> = self.get("/legislacion-consolidada", &params).await?;
        match rows {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|v| serde_json::from_value(v).map_err(ClientError::from))
                .collect(),
            Some(single) => Ok(vec![serde_json::from_value(single)?]),
        }
    }

    /// Fetch one section of a consolidated law as raw JSON
    pub async fn law_section(
        &self,
        id: &LawId,
        section: LawSection<'_>,
    ) -> Result<Option<Value>, ClientError> {
        let endpoint = format!("/legislacion-consolidada/id/{}/{}", id, section.path());
        self.get(&endpoint, &[]).await
    }

    /// Law metadata (`metadatos`)
    pub async fn law_metadata(&self, id: &LawId) -> Result<Option<LawMetadata>, ClientError> {
        let data = self.law_section(id, LawSection::Metadata).await?;
        // Upstream wraps the single record in a one-element list
        let record = match data {
            Some(Value::Array(mut items)) if !items.is_empty() => Some(items.swap_remove(0)),
            Some(Value::Array(_)) | None => None,
            other => other,
        };
        record.map(serde_json::from_value).transpose().map_err(ClientError::from)
    }

    /// Legal analysis (`analisis`)
    pub async fn law_analysis(&self, id: &LawId) -> Result<Option<LawAnalysis>, ClientError> {
        parse_section(self.law_section(id, LawSection::Analysis).await?)
    }

    /// ELI metadata, passed through untouched
    pub async fn law_eli_metadata(&self, id: &LawId) -> Result<Option<Value>, ClientError> {
        self.law_section(id, LawSection::EliMetadata).await
    }

    /// Full consolidated text
    pub async fn law_text(&self, id: &LawId) -> Result<Option<LawText>, ClientError> {
        parse_section(self.law_section(id, LawSection::FullText).await?)
    }

    /// Index of text blocks
    pub async fn law_index(&self, id: &LawId) -> Result<Option<LawIndex>, ClientError> {
        parse_section(self.law_section(id, LawSection::Index).await?)
    }

    /// One text block with its versions
    pub async fn law_block(
        &self,
        id: &LawId,
        block_id: &str,
    ) -> Result<Option<TextBlock>, ClientError> {
        let payload: Option<BlockPayload> =
            parse_section(self.law_section(id, LawSection::Block(block_id)).await?)?;
        Ok(payload.map(TextBlock::from))
    }

    /// Daily summary of a gazette, flattened to items
    pub async fn summary(
        &self,
        kind: SummaryKind,
        date: ApiDate,
    ) -> Result<Option<SummaryDocument>, ClientError> {
        let endpoint = format!("/{}/sumario/{}", kind.path(), date.to_api_string());
        let payload: Option<SummaryPayload> = self.get(&endpoint, &[]).await?;
        Ok(payload.map(|p| flatten_summary(kind, date, p.sumario)))
    }

    /// Every row of an auxiliary table
    pub async fn auxiliary_table(
        &self,
        table: AuxiliaryTable,
    ) -> Result<Vec<AuxiliaryCodeEntry>, ClientError> {
        let endpoint = format!("/datos-auxiliares/{}", table.path());
        let raw: Option<RawTable> = self.get(&endpoint, &[]).await?;
        Ok(raw.map(|r| table_entries(table, r)).unwrap_or_default())
    }

    /// Upstream answers a minimal legislation search
    pub async fn health_check(&self) -> bool {
        let probe = SearchQuery {
            limit: 1,
            ..SearchQuery::default()
        };
        match self.search_legislation(&probe).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Upstream health check failed");
                false
            }
        }
    }
}

fn is_empty(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn parse_section<T: DeserializeOwned>(data: Option<Value>) -> Result<Option<T>, ClientError> {
    data.map(serde_json::from_value)
        .transpose()
        .map_err(ClientError::from)
}

fn flatten_summary(kind: SummaryKind, date: ApiDate, raw: RawSummary) -> SummaryDocument {
    let mut journals = Vec::new();
    let mut items = Vec::new();

    for journal in raw.diario {
        let pdf = journal.sumario_diario.as_ref();
        journals.push(JournalInfo {
            number: journal.numero.clone().unwrap_or_default(),
            pdf_url: pdf
                .and_then(|p| p.url_pdf.as_ref())
                .and_then(|u| u.url())
                .map(str::to_string),
            pdf_size_kb: pdf.and_then(|p| {
                p.url_pdf
                    .as_ref()
                    .and_then(|u| u.size_kb())
                    .map(str::to_string)
                    .or_else(|| p.size_kbytes.clone())
            }),
        });

        for section in journal.seccion {
            let section_code = section.codigo.unwrap_or_default();
            let section_name = section
                .nombre
                .unwrap_or_else(|| format!("Sección {}", section_code));

            for department in section.departamento {
                let department_code = department.codigo.unwrap_or_default();
                let department_name = department.nombre.unwrap_or_default();

                let direct = department.item.into_iter().map(|i| (None, i));
                let nested = department.epigrafe.into_iter().flat_map(|e| {
                    let name = e.nombre;
                    e.item.into_iter().map(move |i| (name.clone(), i))
                });

                for (epigraph, item) in direct.chain(nested) {
                    let pdf = item.url_pdf.as_ref();
                    items.push(SummaryItem {
                        section_code: section_code.clone(),
                        section_name: section_name.clone(),
                        department_code: department_code.clone(),
                        department_name: department_name.clone(),
                        epigraph,
                        identifier: item.identificador.unwrap_or_default(),
                        title: item.titulo.unwrap_or_default(),
                        pdf_url: pdf.and_then(|p| p.url()).map(str::to_string),
                        pdf_size_kb: pdf
                            .and_then(|p| p.size_kb())
                            .map(str::to_string)
                            .or(item.size_kbytes),
                        pages: pdf.and_then(|p| p.pages()),
                        html_url: item.url_html,
                    });
                }
            }
        }
    }

    SummaryDocument {
        kind,
        date,
        journals,
        items,
    }
}

fn table_entries(table: AuxiliaryTable, raw: RawTable) -> Vec<AuxiliaryCodeEntry> {
    match raw {
        RawTable::Entries { entradas: rows } | RawTable::List(rows) => rows
            .into_iter()
            .filter_map(|row| {
                let active = row.is_active();
                Some(AuxiliaryCodeEntry {
                    code: row.codigo?,
                    description: row.descripcion.unwrap_or_default(),
                    active,
                    table,
                })
            })
            .collect(),
        RawTable::Map(map) => map
            .into_iter()
            .map(|(code, value)| AuxiliaryCodeEntry {
                code,
                description: match value {
                    Value::String(s) => s,
                    Value::Object(obj) => obj
                        .get("descripcion")
                        .or_else(|| obj.get("texto"))
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    other => other.to_string(),
                },
                active: true,
                table,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_paths() {
        assert_eq!(LawSection::Metadata.path(), "metadatos");
        assert_eq!(LawSection::Index.path(), "texto/indice");
        assert_eq!(LawSection::Block("a1").path(), "texto/bloque/a1");
    }

    #[test]
    fn test_open_trims_trailing_slash() {
        let client = BoeClient::open(&ClientConfig::with_base_url("http://localhost:1/api/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:1/api");
        client.close();
    }

    #[test]
    fn test_flatten_summary_walks_epigraphs() {
        let raw: RawSummary = serde_json::from_value(json!({
            "diario": {
                "numero": 130,
                "sumario_diario": {"url_pdf": {"texto": "https://x/sumario.pdf", "szKBytes": "250"}},
                "seccion": [{
                    "codigo": "1",
                    "nombre": "I. Disposiciones generales",
                    "departamento": {
                        "codigo": "7723",
                        "nombre": "JEFATURA DEL ESTADO",
                        "item": {"identificador": "BOE-A-2024-1", "titulo": "Ley 1/2024"},
                        "epigrafe": [{
                            "nombre": "Acuerdos internacionales",
                            "item": [{
                                "identificador": "BOE-A-2024-2",
                                "titulo": "Canje de notas",
                                "url_pdf": {"texto": "https://x/2.pdf", "szKBytes": 120, "pagina_inicial": "10", "pagina_final": "12"}
                            }]
                        }]
                    }
                }]
            }
        }))
        .unwrap();

        let doc = flatten_summary(SummaryKind::Boe, ApiDate::parse("20240529").unwrap(), raw);
        assert_eq!(doc.journals.len(), 1);
        assert_eq!(doc.journals[0].number, "130");
        assert_eq!(doc.journals[0].pdf_size_kb.as_deref(), Some("250"));
        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.items[0].epigraph, None);
        assert_eq!(doc.items[1].epigraph.as_deref(), Some("Acuerdos internacionales"));
        assert_eq!(doc.items[1].pdf_size_kb.as_deref(), Some("120"));
        assert_eq!(doc.items[1].pages, Some(("10".to_string(), "12".to_string())));
        assert_eq!(doc.items[1].department_code, "7723");
    }

    #[test]
    fn test_table_entries_from_map() {
        let raw: RawTable =
            serde_json::from_value(json!({"7723": "Jefatura del Estado", "9574": "Ministerio"}))
                .unwrap();
        let entries = table_entries(AuxiliaryTable::Departments, raw);
        assert_eq!(entries.len(), 2);
        assert!(entries
            .iter()
            .any(|e| e.code == "7723" && e.description == "Jefatura del Estado" && e.active));
    }

    #[test]
    fn test_table_entries_from_list() {
        let raw: RawTable = serde_json::from_value(json!({
            "entradas": [
                {"codigo": 1300, "descripcion": "Ley", "activo": true},
                {"descripcion": "sin código"}
            ]
        }))
        .unwrap();
        let entries = table_entries(AuxiliaryTable::LegalRanges, raw);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, "1300");
        assert_eq!(entries[0].table, AuxiliaryTable::LegalRanges);
    }
}
