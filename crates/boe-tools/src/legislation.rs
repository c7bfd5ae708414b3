//! Consolidated legislation tools
//!
//! Search, full law detail, single text blocks, the block index and the
//! relations recorded in a law's analysis.

use crate::error::ToolError;
use crate::format::{
    clean_html, long_date, optional_text, parse_date, parse_law_id, required_text, structured,
    truncate_chars,
};
use boe_client::models::{CodedText, IndexBlock, LawAnalysis, LawMetadata, LawRelation, LawText};
use boe_client::BoeClient;
use boe_domain::date::display_upstream_date;
use boe_domain::query::DEFAULT_SEARCH_LIMIT;
use boe_domain::{LawId, SearchQuery, ToolResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

/// Upper bound on the rendered full text of a law
const MAX_FULL_TEXT_CHARS: usize = 20_000;

static BLOCK_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Parameters for search_consolidated_legislation
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchLegislationParams {
    /// Free text (not honoured by upstream)
    #[serde(default)]
    pub query: Option<String>,
    /// Text in the title (not honoured by upstream either)
    #[serde(default)]
    pub title: Option<String>,
    /// Issuing department code, e.g. `7723`
    #[serde(default)]
    pub department_code: Option<String>,
    /// Legal range code, e.g. `1300` for Ley
    #[serde(default)]
    pub legal_range_code: Option<String>,
    /// Matter code
    #[serde(default)]
    pub matter_code: Option<String>,
    /// Earliest publication date (YYYYMMDD)
    #[serde(default)]
    pub from_date: Option<String>,
    /// Latest publication date (YYYYMMDD)
    #[serde(default)]
    pub to_date: Option<String>,
    /// Page size
    #[serde(default = "default_search_limit")]
    pub limit: u32,
    /// Rows to skip
    #[serde(default)]
    pub offset: u32,
    /// Keep derogated and expired laws
    #[serde(default)]
    pub include_derogated: bool,
}

fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

/// Parameters for get_consolidated_law
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetLawParams {
    /// Law identifier
    pub law_id: String,
    #[serde(default = "default_true")]
    pub include_metadata: bool,
    #[serde(default = "default_true")]
    pub include_analysis: bool,
    #[serde(default)]
    pub include_full_text: bool,
    #[serde(default)]
    pub include_eli_metadata: bool,
}

fn default_true() -> bool {
    true
}

/// Parameters for get_law_text_block
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextBlockParams {
    /// Law identifier
    pub law_id: String,
    /// Block identifier, e.g. `a1` or `dd`
    pub block_id: String,
}

/// Parameters for get_law_structure
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LawStructureParams {
    /// Law identifier
    pub law_id: String,
}

/// Which relations find_related_laws reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    /// Every relation in both directions
    #[default]
    All,
    /// Earlier laws this one modifies
    Modifies,
    /// Later laws that modify this one
    ModifiedBy,
    /// Earlier laws this one derogates
    Derogates,
    /// Later laws that derogate this one
    DerogatedBy,
}

impl RelationType {
    fn wants_earlier(self) -> bool {
        matches!(self, Self::All | Self::Modifies | Self::Derogates)
    }

    fn wants_later(self) -> bool {
        matches!(self, Self::All | Self::ModifiedBy | Self::DerogatedBy)
    }

    fn accepts(self, relation: &LawRelation) -> bool {
        let label = relation.relation_text().to_uppercase();
        match self {
            Self::All => true,
            Self::Modifies | Self::ModifiedBy => label.contains("MODIFICA"),
            Self::Derogates | Self::DerogatedBy => label.contains("DEROGA"),
        }
    }
}

/// Parameters for find_related_laws
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelatedLawsParams {
    /// Law identifier
    pub law_id: String,
    #[serde(default)]
    pub relation_type: RelationType,
}

/// Handle search_consolidated_legislation
///
/// Pagination is forwarded untouched. Upstream ignores free text, so rows
/// are never re-filtered by it; a closing notice says so instead, and
/// flags the page as unrelated when few rows mention the searched text.
pub async fn handle_search_legislation(
    client: &BoeClient,
    params: SearchLegislationParams,
) -> Result<Vec<ToolResult>, ToolError> {
    let query = SearchQuery {
        text: optional_text(&params.query).map(str::to_string),
        title: optional_text(&params.title).map(str::to_string),
        department_code: optional_text(&params.department_code).map(str::to_string),
        legal_range_code: optional_text(&params.legal_range_code).map(str::to_string),
        matter_code: optional_text(&params.matter_code).map(str::to_string),
        from_date: optional_text(&params.from_date)
            .map(|d| parse_date("from_date", d))
            .transpose()?,
        to_date: optional_text(&params.to_date)
            .map(|d| parse_date("to_date", d))
            .transpose()?,
        limit: params.limit,
        offset: params.offset,
    };
    query.validate().map_err(ToolError::Validation)?;

    info!(
        limit = query.limit,
        offset = query.offset,
        has_text = query.has_text(),
        "Searching consolidated legislation"
    );

    let rows = client.search_legislation(&query).await?;
    let fetched = rows.len();
    let relevance = query.search_text().map(|text| TextRelevance::measure(text, &rows));
    if let Some(r) = relevance.as_ref().filter(|r| r.likely_unrelated()) {
        warn!(
            matching = r.matching,
            total = r.total,
            "Text search returned rows unrelated to the query"
        );
    }
    let rows: Vec<LawMetadata> = rows
        .into_iter()
        .filter(|row| params.include_derogated || !row.is_derogated())
        .collect();
    debug!(fetched, kept = rows.len(), "Filtered derogated laws");

    let mut results = Vec::with_capacity(rows.len() + 2);
    if rows.is_empty() {
        results.push(ToolResult::with_data(
            "No se encontraron normas con los criterios indicados. Prueba a ampliar el rango \
             de fechas o a quitar filtros.",
            json!({"count": 0, "offset": query.offset, "limit": query.limit}),
        ));
    } else {
        results.push(ToolResult::with_data(
            format!(
                "## Resultados de búsqueda de legislación consolidada\n\n\
                 **Encontradas {} normas** (desde la posición {}, hasta {} por página)",
                rows.len(),
                query.offset,
                query.limit
            ),
            json!({"count": rows.len(), "offset": query.offset, "limit": query.limit}),
        ));
        for (i, row) in rows.iter().enumerate() {
            let position = query.offset as usize + i + 1;
            results.push(ToolResult::with_data(render_search_row(position, row), structured(row)?));
        }
    }

    if let (Some(text), Some(relevance)) = (query.search_text(), relevance) {
        results.push(text_search_notice(text, &relevance));
    }

    Ok(results)
}

/// How many rows of a page mention any word of the searched text
#[derive(Debug)]
struct TextRelevance {
    total: usize,
    matching: usize,
    unrelated_titles: Vec<String>,
}

impl TextRelevance {
    /// Below this share of matching rows the page is reported as unrelated
    const MIN_CONFIDENCE: f64 = 0.3;

    fn measure(text: &str, rows: &[LawMetadata]) -> Self {
        let text = text.to_lowercase();
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut relevance = Self {
            total: rows.len(),
            matching: 0,
            unrelated_titles: Vec::new(),
        };
        for row in rows {
            let title = row.titulo.as_deref().unwrap_or_default().to_lowercase();
            let id = row.identificador.as_deref().unwrap_or_default().to_lowercase();
            if words.iter().any(|w| title.contains(w) || id.contains(w)) {
                relevance.matching += 1;
            } else {
                relevance
                    .unrelated_titles
                    .push(row.titulo.clone().unwrap_or_else(|| "Sin título".to_string()));
            }
        }
        relevance
    }

    fn confidence(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.matching as f64 / self.total as f64
    }

    fn likely_unrelated(&self) -> bool {
        self.total > 0 && self.confidence() < Self::MIN_CONFIDENCE
    }
}

fn render_search_row(position: usize, row: &LawMetadata) -> String {
    let mut out = vec![
        format!("### {}. {}", position, coded(&row.rango, "Norma")),
        format!("**{}**", row.titulo.as_deref().unwrap_or("Sin título")),
        format!("- **ID:** `{}`", row.identificador.as_deref().unwrap_or("N/A")),
        format!(
            "- **Publicado:** {}",
            row.fecha_publicacion
                .as_deref()
                .map(display_upstream_date)
                .unwrap_or_default()
        ),
        format!("- **Departamento:** {}", coded(&row.departamento, "")),
    ];

    let mut status = Vec::new();
    if flag(&row.vigencia_agotada) {
        status.push("Vigencia agotada");
    }
    if flag(&row.estatus_derogacion) {
        status.push("Derogada");
    }
    if consolidation_outdated(row) {
        status.push("Desactualizada");
    }
    if !status.is_empty() {
        out.push(format!("- **Estado:** {}", status.join(" | ")));
    }
    if let Some(url) = &row.url_html_consolidada {
        out.push(format!("- **Ver en BOE:** {}", url));
    }
    out.join("\n")
}

fn text_search_notice(text: &str, relevance: &TextRelevance) -> ToolResult {
    let mut out = vec![format!(
        "⚠️ **Aviso:** la búsqueda por texto de la legislación consolidada no está \
         soportada por la API del BOE; los resultados anteriores pueden no guardar \
         relación con \"{}\".",
        text
    )];

    if relevance.likely_unrelated() {
        out.push(String::new());
        out.push(format!(
            "🔍 **Los resultados probablemente NO corresponden a su búsqueda:** solo {} de {} \
             mencionan \"{}\" (confianza {:.0}%).",
            relevance.matching,
            relevance.total,
            text,
            relevance.confidence() * 100.0
        ));
        for (i, title) in relevance.unrelated_titles.iter().take(3).enumerate() {
            out.push(format!("   {}. {}", i + 1, truncate_chars(title, 80)));
        }
    }

    out.push(String::new());
    out.push(
        "Alternativas fiables:\n\
         - `search_common_laws` para localizar el identificador de leyes conocidas\n\
         - `get_consolidated_law` con el identificador (ej. `BOE-A-1978-31229`)\n\
         - filtros `department_code`, `legal_range_code` y rango de fechas\n\
         - `search_recent_boe` para publicaciones de los últimos días"
            .to_string(),
    );

    ToolResult::with_data(
        out.join("\n"),
        json!({
            "notice": "text_search_not_honoured",
            "query": text,
            "matching_results": relevance.matching,
            "total_results": relevance.total,
            "likely_unrelated": relevance.likely_unrelated(),
        }),
    )
}

/// Handle get_consolidated_law
///
/// One upstream call per requested section, in order. Metadata failures
/// propagate; a failing analysis or ELI section is left out; a failing full
/// text is reported in place.
pub async fn handle_get_law(
    client: &BoeClient,
    params: GetLawParams,
) -> Result<Vec<ToolResult>, ToolError> {
    let id = parse_law_id(&params.law_id)?;
    info!(law_id = %id, "Fetching consolidated law");

    let mut sections = Vec::new();
    let mut data = Map::new();
    data.insert("identifier".to_string(), json!(id.as_str()));

    if params.include_metadata {
        let metadata = client
            .law_metadata(&id)
            .await?
            .ok_or_else(|| ToolError::not_found(format!("No se encontró la norma {}", id)))?;
        sections.push(render_metadata(&id, &metadata));
        data.insert("metadata".to_string(), structured(&metadata)?);
    } else {
        sections.push(format!("# Norma `{}`", id));
    }

    if params.include_analysis {
        match client.law_analysis(&id).await {
            Ok(Some(analysis)) => {
                sections.push(render_analysis(&analysis));
                data.insert("analysis".to_string(), structured(&analysis)?);
            }
            Ok(None) => debug!(law_id = %id, "No analysis available"),
            Err(e) => warn!(law_id = %id, error = %e, "Analysis unavailable"),
        }
    }

    if params.include_full_text {
        match client.law_text(&id).await {
            Ok(Some(text)) => {
                sections.push(render_full_text(&text));
                data.insert("block_count".to_string(), json!(text.texto.len()));
            }
            Ok(None) => sections.push("## Texto consolidado\n\nTexto no disponible.".to_string()),
            Err(e) => {
                warn!(law_id = %id, error = %e, "Full text unavailable");
                sections.push(format!(
                    "## Texto consolidado\n\n⚠️ No se pudo obtener el texto: {}",
                    e
                ));
            }
        }
    }

    if params.include_eli_metadata {
        match client.law_eli_metadata(&id).await {
            Ok(Some(eli)) => {
                let pretty = serde_json::to_string_pretty(&eli).unwrap_or_default();
                sections.push(format!(
                    "## Metadatos ELI (European Legislation Identifier)\n\n```json\n{}\n```",
                    pretty
                ));
                data.insert("eli".to_string(), eli);
            }
            Ok(None) => debug!(law_id = %id, "No ELI metadata available"),
            Err(e) => warn!(law_id = %id, error = %e, "ELI metadata unavailable"),
        }
    }

    Ok(vec![ToolResult::with_data(sections.join("\n\n"), Value::Object(data))])
}

fn render_metadata(id: &LawId, meta: &LawMetadata) -> String {
    let mut out = vec![
        format!("# {}", meta.titulo.as_deref().unwrap_or("Norma sin título")),
        String::new(),
        "## Información básica".to_string(),
        format!("- **Identificador BOE:** `{}`", id),
    ];
    if let Some(number) = &meta.numero_oficial {
        out.push(format!("- **Número oficial:** {}", number));
    }
    if let Some(date) = &meta.fecha_publicacion {
        out.push(format!("- **Fecha de publicación:** {}", long_date(date)));
    }
    if let Some(date) = &meta.fecha_vigencia {
        out.push(format!("- **Entrada en vigor:** {}", long_date(date)));
    }
    out.push(format!("- **Departamento:** {}", coded(&meta.departamento, "Desconocido")));
    out.push(format!("- **Rango normativo:** {}", coded(&meta.rango, "Desconocido")));
    if let Some(scope) = meta.ambito.as_ref().and_then(CodedText::text) {
        out.push(format!("- **Ámbito:** {}", scope));
    }

    out.push(String::new());
    out.push("## Estado actual".to_string());
    if flag(&meta.vigencia_agotada) {
        out.push("- **Vigencia agotada**".to_string());
    } else if flag(&meta.estatus_derogacion) {
        out.push("- **Derogada**".to_string());
        if let Some(date) = &meta.fecha_derogacion {
            out.push(format!("  - Fecha de derogación: {}", display_upstream_date(date)));
        }
    } else {
        out.push("- **Vigente**".to_string());
    }
    match meta.estado_consolidacion.as_ref().and_then(CodedText::text) {
        Some("Desactualizado") => out.push("- **Consolidación desactualizada**".to_string()),
        Some("Finalizado") => out.push("- **Consolidación actualizada**".to_string()),
        _ => {}
    }

    let links: Vec<String> = [
        meta.url_html_consolidada
            .as_ref()
            .map(|url| format!("- **Texto consolidado:** {}", url)),
        meta.url_eli.as_ref().map(|url| format!("- **ELI:** {}", url)),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !links.is_empty() {
        out.push(String::new());
        out.push("## Enlaces".to_string());
        out.extend(links);
    }

    out.join("\n")
}

fn render_analysis(analysis: &LawAnalysis) -> String {
    let mut out = vec!["## Análisis jurídico".to_string()];

    if !analysis.materias.is_empty() {
        out.push(String::new());
        out.push("### Materias".to_string());
        for matter in &analysis.materias {
            out.push(format!(
                "- {} (código: {})",
                matter.text().unwrap_or("Sin descripción"),
                matter.code().unwrap_or("N/A")
            ));
        }
    }

    let references = [
        ("Referencias a normas anteriores", &analysis.referencias.anteriores),
        ("Referencias a normas posteriores", &analysis.referencias.posteriores),
    ];
    for (heading, relations) in references {
        if relations.is_empty() {
            continue;
        }
        out.push(String::new());
        out.push(format!("### {}", heading));
        for relation in relations {
            out.push(render_relation(relation));
        }
    }

    if !analysis.notas.is_empty() {
        out.push(String::new());
        out.push("### Notas".to_string());
        for (i, note) in analysis.notas.iter().enumerate() {
            out.push(format!("{}. {}", i + 1, note.text().unwrap_or_default()));
        }
    }

    if out.len() == 1 {
        out.push("Sin análisis disponible.".to_string());
    }
    out.join("\n")
}

fn render_relation(relation: &LawRelation) -> String {
    let mut line = format!(
        "- **{}:** {}",
        relation.relation_text(),
        relation.texto.as_deref().unwrap_or("Sin descripción")
    );
    if let Some(id) = &relation.id_norma {
        line.push_str(&format!("\n  - ID: `{}`", id));
    }
    line
}

fn render_full_text(text: &LawText) -> String {
    let body = text
        .texto
        .iter()
        .map(|block| {
            let title = block.titulo.as_deref().unwrap_or("Sin título");
            let content = block
                .version
                .first()
                .and_then(|v| v.contenido_html.as_deref())
                .map(clean_html)
                .unwrap_or_default();
            format!("### {}\n\n{}", title, content)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut out = format!("## Texto consolidado\n\n{}", truncate_chars(&body, MAX_FULL_TEXT_CHARS));
    if body.chars().count() > MAX_FULL_TEXT_CHARS {
        out.push_str(
            "\n\n⚠️ Texto recortado. Usa `get_law_structure` y `get_law_text_block` para leer \
             bloques concretos.",
        );
    }
    out
}

/// Handle get_law_text_block
pub async fn handle_get_text_block(
    client: &BoeClient,
    params: TextBlockParams,
) -> Result<Vec<ToolResult>, ToolError> {
    let id = parse_law_id(&params.law_id)?;
    let block_id = required_text("block_id", &params.block_id)?;
    if !BLOCK_ID.is_match(block_id) {
        return Err(ToolError::Validation(format!(
            "Invalid block_id '{}': only letters, digits, '-' and '_' are allowed",
            block_id
        )));
    }
    info!(law_id = %id, block_id, "Fetching text block");

    let block = client.law_block(&id, block_id).await?.ok_or_else(|| {
        ToolError::not_found(format!("No se encontró el bloque '{}' en la norma {}", block_id, id))
    })?;

    let title = block
        .titulo
        .clone()
        .unwrap_or_else(|| format!("Bloque {}", block_id));
    let mut out = vec![
        format!("# {}", title),
        format!(
            "**Norma:** `{}` | **Bloque:** `{}` | **Tipo:** {}",
            id,
            block_id,
            block.tipo.as_deref().unwrap_or("desconocido")
        ),
        String::new(),
    ];

    match block.version.first() {
        None => out.push("*El bloque no tiene contenido.*".to_string()),
        Some(current) => {
            out.push(format!(
                "**Versión actual** (desde {}):",
                current
                    .fecha_publicacion
                    .as_deref()
                    .map(display_upstream_date)
                    .unwrap_or_else(|| "fecha desconocida".to_string())
            ));
            out.push(String::new());
            out.push(
                current
                    .contenido_html
                    .as_deref()
                    .map(clean_html)
                    .unwrap_or_else(|| "*No se pudo extraer el contenido del bloque.*".to_string()),
            );
        }
    }

    if block.version.len() > 1 {
        out.push(String::new());
        out.push("## Historial de versiones".to_string());
        for (i, version) in block.version.iter().enumerate() {
            out.push(format!(
                "{}. **{}** - Norma modificadora: `{}`",
                i + 1,
                version
                    .fecha_publicacion
                    .as_deref()
                    .map(display_upstream_date)
                    .unwrap_or_else(|| "N/A".to_string()),
                version.id_norma.as_deref().unwrap_or("N/A")
            ));
        }
    }

    let data = json!({
        "identifier": id.as_str(),
        "block_id": block_id,
        "title": title,
        "type": block.tipo,
        "versions": block.version.len(),
    });
    Ok(vec![ToolResult::with_data(out.join("\n"), data)])
}

/// Part of a law a block belongs to, in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
enum StructureGroup {
    Preamble,
    Articles,
    AdditionalProvisions,
    TransitoryProvisions,
    DerogatoryProvisions,
    FinalProvisions,
    Annexes,
    Others,
}

impl StructureGroup {
    const ORDER: [StructureGroup; 8] = [
        Self::Preamble,
        Self::Articles,
        Self::AdditionalProvisions,
        Self::TransitoryProvisions,
        Self::DerogatoryProvisions,
        Self::FinalProvisions,
        Self::Annexes,
        Self::Others,
    ];

    fn heading(self) -> &'static str {
        match self {
            Self::Preamble => "Preámbulo",
            Self::Articles => "Articulado",
            Self::AdditionalProvisions => "Disposiciones adicionales",
            Self::TransitoryProvisions => "Disposiciones transitorias",
            Self::DerogatoryProvisions => "Disposiciones derogatorias",
            Self::FinalProvisions => "Disposiciones finales",
            Self::Annexes => "Anexos",
            Self::Others => "Otras partes",
        }
    }

    fn classify(block: &IndexBlock) -> Self {
        let id = block.id.to_lowercase();
        let title = block.titulo.as_deref().unwrap_or_default().to_lowercase();

        if id.starts_with("pr") || title.contains("preámbulo") || title.contains("preambulo") {
            Self::Preamble
        } else if id.starts_with('a') && id[1..].starts_with(|c: char| c.is_ascii_digit()) {
            Self::Articles
        } else if id.starts_with("da") {
            Self::AdditionalProvisions
        } else if id.starts_with("dt") {
            Self::TransitoryProvisions
        } else if id.starts_with("dd") {
            Self::DerogatoryProvisions
        } else if id.starts_with("df") {
            Self::FinalProvisions
        } else if id.starts_with("an") || title.contains("anexo") {
            Self::Annexes
        } else {
            Self::Others
        }
    }
}

/// Handle get_law_structure
pub async fn handle_get_structure(
    client: &BoeClient,
    params: LawStructureParams,
) -> Result<Vec<ToolResult>, ToolError> {
    let id = parse_law_id(&params.law_id)?;
    info!(law_id = %id, "Fetching law structure");

    let index = client
        .law_index(&id)
        .await?
        .filter(|index| !index.bloque.is_empty())
        .ok_or_else(|| ToolError::not_found(format!("No hay índice disponible para la norma {}", id)))?;

    let mut out = vec![format!("# Estructura de la norma `{}`", id)];
    let mut groups = Vec::new();

    for group in StructureGroup::ORDER {
        let blocks: Vec<&IndexBlock> = index
            .bloque
            .iter()
            .filter(|block| StructureGroup::classify(block) == group)
            .collect();
        if blocks.is_empty() {
            continue;
        }

        out.push(String::new());
        out.push(format!("## {} ({})", group.heading(), blocks.len()));
        for block in &blocks {
            out.push(format!(
                "- **{}** (`{}`)",
                block.titulo.as_deref().unwrap_or("Sin título"),
                block.id
            ));
            if let Some(updated) = &block.fecha_actualizacion {
                out.push(format!("  - *Última actualización: {}*", display_upstream_date(updated)));
            }
        }

        groups.push(json!({
            "group": group,
            "blocks": blocks
                .iter()
                .map(|b| json!({"id": b.id, "title": b.titulo}))
                .collect::<Vec<_>>(),
        }));
    }

    out.push(String::new());
    out.push(
        "Usa `get_law_text_block` con el ID entre paréntesis para leer un bloque \
         (`a1` artículo 1, `dd` disposición derogatoria, `df` disposición final)."
            .to_string(),
    );

    let data = json!({
        "identifier": id.as_str(),
        "block_count": index.bloque.len(),
        "groups": groups,
    });
    Ok(vec![ToolResult::with_data(out.join("\n"), data)])
}

/// Handle find_related_laws
///
/// Earlier references are laws this one acts on; later references are laws
/// acting on this one.
pub async fn handle_find_related(
    client: &BoeClient,
    params: RelatedLawsParams,
) -> Result<Vec<ToolResult>, ToolError> {
    let id = parse_law_id(&params.law_id)?;
    let relation_type = params.relation_type;
    info!(law_id = %id, ?relation_type, "Finding related laws");

    let analysis = client.law_analysis(&id).await?.unwrap_or_default();

    let mut rows = Vec::new();
    if relation_type.wants_earlier() {
        rows.extend(
            analysis
                .referencias
                .anteriores
                .iter()
                .filter(|r| relation_type.accepts(r))
                .map(|r| ("earlier", r)),
        );
    }
    if relation_type.wants_later() {
        rows.extend(
            analysis
                .referencias
                .posteriores
                .iter()
                .filter(|r| relation_type.accepts(r))
                .map(|r| ("later", r)),
        );
    }

    if rows.is_empty() {
        return Ok(vec![ToolResult::with_data(
            format!("No se encontraron normas relacionadas con `{}`.", id),
            json!({"identifier": id.as_str(), "count": 0}),
        )]);
    }

    let mut results = vec![ToolResult::with_data(
        format!("# Normas relacionadas con `{}` ({})", id, rows.len()),
        json!({"identifier": id.as_str(), "relation_type": relation_type, "count": rows.len()}),
    )];
    for (direction, relation) in rows {
        let heading = if direction == "earlier" {
            "Norma anterior afectada"
        } else {
            "Norma posterior que la afecta"
        };
        results.push(ToolResult::with_data(
            format!(
                "- **{}:** `{}` ({})\n  - {}",
                relation.relation_text(),
                relation.id_norma.as_deref().unwrap_or("N/A"),
                heading,
                relation.texto.as_deref().unwrap_or("Sin descripción")
            ),
            json!({
                "direction": direction,
                "relation": relation.relation_text(),
                "law_id": relation.id_norma,
                "description": relation.texto,
            }),
        ));
    }
    Ok(results)
}

fn coded(value: &Option<CodedText>, fallback: &str) -> String {
    value
        .as_ref()
        .and_then(CodedText::text)
        .unwrap_or(fallback)
        .to_string()
}

fn flag(value: &Option<String>) -> bool {
    value.as_deref() == Some("S")
}

fn consolidation_outdated(meta: &LawMetadata) -> bool {
    meta.estado_consolidacion.as_ref().and_then(CodedText::text) == Some("Desactualizado")
}
