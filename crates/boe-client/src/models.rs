//! Upstream response shapes
//!
//! The open-data API is converted from XML on the server side, so a field
//! that normally holds a list may arrive as a single object, and numeric
//! fields may arrive as strings or numbers. Every list here goes through
//! [`one_or_many`] and every loosely typed scalar through [`lenient_string`].

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level `{status, data}` wrapper around every upstream payload
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub status: Option<EnvelopeStatus>,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnvelopeStatus {
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A coded value, either `{codigo, texto}` or a bare string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodedText {
    /// `{codigo, texto}` object
    Coded {
        /// Code
        #[serde(default, deserialize_with = "lenient_string")]
        codigo: Option<String>,
        /// Description
        #[serde(default)]
        texto: Option<String>,
    },
    /// Bare description
    Plain(String),
}

impl CodedText {
    /// Description text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Coded { texto, .. } => texto.as_deref(),
            Self::Plain(s) => Some(s.as_str()),
        }
    }

    /// Code, if any
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Coded { codigo, .. } => codigo.as_deref(),
            Self::Plain(_) => None,
        }
    }
}

/// Metadata of a consolidated law, as returned by search and `metadatos`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LawMetadata {
    /// Identifier, e.g. `BOE-A-2015-10566`
    #[serde(default)]
    pub identificador: Option<String>,
    /// Title
    #[serde(default)]
    pub titulo: Option<String>,
    /// Publication date (YYYYMMDD)
    #[serde(default, deserialize_with = "lenient_string")]
    pub fecha_publicacion: Option<String>,
    /// Enactment date (YYYYMMDD)
    #[serde(default, deserialize_with = "lenient_string")]
    pub fecha_disposicion: Option<String>,
    /// Entry into force (YYYYMMDD)
    #[serde(default, deserialize_with = "lenient_string")]
    pub fecha_vigencia: Option<String>,
    /// Repeal date (YYYYMMDD)
    #[serde(default, deserialize_with = "lenient_string")]
    pub fecha_derogacion: Option<String>,
    /// Last consolidation update
    #[serde(default, deserialize_with = "lenient_string")]
    pub fecha_actualizacion: Option<String>,
    /// Official number, e.g. `40/2015`
    #[serde(default, deserialize_with = "lenient_string")]
    pub numero_oficial: Option<String>,
    /// Issuing department
    #[serde(default)]
    pub departamento: Option<CodedText>,
    /// Legal range
    #[serde(default)]
    pub rango: Option<CodedText>,
    /// Territorial scope
    #[serde(default)]
    pub ambito: Option<CodedText>,
    /// Consolidation state
    #[serde(default)]
    pub estado_consolidacion: Option<CodedText>,
    /// `S` when the law is no longer in force
    #[serde(default)]
    pub vigencia_agotada: Option<String>,
    /// `S` when the law has been repealed
    #[serde(default)]
    pub estatus_derogacion: Option<String>,
    /// `S` when the law has been annulled
    #[serde(default)]
    pub estatus_anulacion: Option<String>,
    /// European Legislation Identifier URL
    #[serde(default)]
    pub url_eli: Option<String>,
    /// Consolidated HTML text URL
    #[serde(default)]
    pub url_html_consolidada: Option<String>,
}

impl LawMetadata {
    /// Expired or repealed
    pub fn is_derogated(&self) -> bool {
        self.vigencia_agotada.as_deref() == Some("S")
            || self.estatus_derogacion.as_deref() == Some("S")
    }
}

/// Legal analysis of a law (`analisis`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LawAnalysis {
    /// Controlled-vocabulary matters
    #[serde(default, deserialize_with = "one_or_many")]
    pub materias: Vec<CodedText>,
    /// Editorial notes
    #[serde(default, deserialize_with = "one_or_many")]
    pub notas: Vec<CodedText>,
    /// Earlier and later references
    #[serde(default)]
    pub referencias: References,
}

/// References to and from other laws
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct References {
    /// Earlier laws this one affects
    #[serde(default, deserialize_with = "one_or_many")]
    pub anteriores: Vec<LawRelation>,
    /// Later laws affecting this one
    #[serde(default, deserialize_with = "one_or_many")]
    pub posteriores: Vec<LawRelation>,
}

/// One reference between two laws
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LawRelation {
    /// Referenced law identifier
    #[serde(default)]
    pub id_norma: Option<String>,
    /// Relation kind, e.g. `MODIFICA`
    #[serde(default)]
    pub relacion: Option<CodedText>,
    /// Free-text description
    #[serde(default)]
    pub texto: Option<String>,
}

impl LawRelation {
    /// Relation label, upper-cased upstream (`DEROGA`, `SE MODIFICA`, ...)
    pub fn relation_text(&self) -> &str {
        self.relacion
            .as_ref()
            .and_then(CodedText::text)
            .unwrap_or("Relacionada")
    }
}

/// Index of a law's text blocks (`texto/indice`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LawIndex {
    /// Blocks in document order
    #[serde(default, deserialize_with = "one_or_many")]
    pub bloque: Vec<IndexBlock>,
}

/// One entry of a law index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexBlock {
    /// Block identifier, e.g. `a1`, `dd`, `pr`
    #[serde(default)]
    pub id: String,
    /// Block title
    #[serde(default)]
    pub titulo: Option<String>,
    /// Last update (YYYYMMDD)
    #[serde(default, deserialize_with = "lenient_string")]
    pub fecha_actualizacion: Option<String>,
}

/// One text block with its version history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Block identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Block title
    #[serde(default)]
    pub titulo: Option<String>,
    /// Block kind (`precepto`, `preambulo`, ...)
    #[serde(default)]
    pub tipo: Option<String>,
    /// Versions, most recent first
    #[serde(default, deserialize_with = "one_or_many")]
    pub version: Vec<BlockVersion>,
}

/// One version of a text block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockVersion {
    /// Publication date of the amending law
    #[serde(default, deserialize_with = "lenient_string")]
    pub fecha_publicacion: Option<String>,
    /// Entry into force of this version
    #[serde(default, deserialize_with = "lenient_string")]
    pub fecha_vigencia: Option<String>,
    /// Amending law identifier
    #[serde(default)]
    pub id_norma: Option<String>,
    /// HTML body
    #[serde(default)]
    pub contenido_html: Option<String>,
}

/// A block response, either wrapped in `bloque` or bare
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum BlockPayload {
    Wrapped { bloque: TextBlock },
    Bare(TextBlock),
}

impl From<BlockPayload> for TextBlock {
    fn from(payload: BlockPayload) -> Self {
        match payload {
            BlockPayload::Wrapped { bloque } => bloque,
            BlockPayload::Bare(block) => block,
        }
    }
}

/// Full consolidated text (`texto`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LawText {
    /// Every block of the law
    #[serde(default, alias = "bloque", deserialize_with = "one_or_many")]
    pub texto: Vec<TextBlock>,
}

// Daily summaries

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryPayload {
    pub sumario: RawSummary,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawSummary {
    #[serde(default, deserialize_with = "one_or_many")]
    pub diario: Vec<RawJournal>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawJournal {
    #[serde(default, deserialize_with = "lenient_string")]
    pub numero: Option<String>,
    #[serde(default)]
    pub sumario_diario: Option<RawJournalPdf>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub seccion: Vec<RawSection>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawJournalPdf {
    #[serde(default)]
    pub url_pdf: Option<PdfRef>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub size_kbytes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawSection {
    #[serde(default, deserialize_with = "lenient_string")]
    pub codigo: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub departamento: Vec<RawDepartment>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawDepartment {
    #[serde(default, deserialize_with = "lenient_string")]
    pub codigo: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub item: Vec<RawItem>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub epigrafe: Vec<RawEpigraph>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawEpigraph {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub item: Vec<RawItem>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawItem {
    #[serde(default)]
    pub identificador: Option<String>,
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub url_pdf: Option<PdfRef>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub size_kbytes: Option<String>,
    #[serde(default)]
    pub url_html: Option<String>,
}

/// A PDF link, either a bare URL or an object with size and pages
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum PdfRef {
    Url(String),
    Detailed {
        #[serde(default)]
        texto: Option<String>,
        #[serde(default, rename = "szKBytes", deserialize_with = "lenient_string")]
        size_kb: Option<String>,
        #[serde(default, deserialize_with = "lenient_string")]
        pagina_inicial: Option<String>,
        #[serde(default, deserialize_with = "lenient_string")]
        pagina_final: Option<String>,
    },
}

impl PdfRef {
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url.as_str()),
            Self::Detailed { texto, .. } => texto.as_deref(),
        }
    }

    pub fn size_kb(&self) -> Option<&str> {
        match self {
            Self::Url(_) => None,
            Self::Detailed { size_kb, .. } => size_kb.as_deref(),
        }
    }

    pub fn pages(&self) -> Option<(String, String)> {
        match self {
            Self::Detailed {
                pagina_inicial: Some(first),
                pagina_final: Some(last),
                ..
            } => Some((first.clone(), last.clone())),
            _ => None,
        }
    }
}

// Auxiliary tables

/// An auxiliary table, as an `entradas` list or a code map
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawTable {
    Entries {
        #[serde(deserialize_with = "one_or_many")]
        entradas: Vec<RawTableEntry>,
    },
    List(Vec<RawTableEntry>),
    Map(serde_json::Map<String, Value>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTableEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub codigo: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub activo: Option<Value>,
}

impl RawTableEntry {
    /// Missing or unrecognised flags count as active
    pub fn is_active(&self) -> bool {
        match &self.activo {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => !matches!(s.as_str(), "N" | "n" | "false" | "0"),
            Some(Value::Number(n)) => n.as_i64() != Some(0),
            _ => true,
        }
    }
}

/// Accept either a list or a single element; `null` becomes empty
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(serde::de::Error::custom))
            .collect(),
        single => serde_json::from_value(single)
            .map(|v| vec![v])
            .map_err(serde::de::Error::custom),
    }
}

/// Accept a string, number or boolean as an optional string
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coded_text_accepts_both_forms() {
        let coded: CodedText =
            serde_json::from_value(json!({"codigo": 7723, "texto": "Jefatura del Estado"}))
                .unwrap();
        assert_eq!(coded.code(), Some("7723"));
        assert_eq!(coded.text(), Some("Jefatura del Estado"));

        let plain: CodedText = serde_json::from_value(json!("Ley")).unwrap();
        assert_eq!(plain.text(), Some("Ley"));
        assert_eq!(plain.code(), None);
    }

    #[test]
    fn test_single_object_becomes_list() {
        let index: LawIndex =
            serde_json::from_value(json!({"bloque": {"id": "a1", "titulo": "Artículo 1"}}))
                .unwrap();
        assert_eq!(index.bloque.len(), 1);
        assert_eq!(index.bloque[0].id, "a1");

        let empty: LawIndex = serde_json::from_value(json!({"bloque": null})).unwrap();
        assert!(empty.bloque.is_empty());
    }

    #[test]
    fn test_derogated_flags() {
        let meta: LawMetadata =
            serde_json::from_value(json!({"identificador": "BOE-A-1960-1", "estatus_derogacion": "S"}))
                .unwrap();
        assert!(meta.is_derogated());
        assert!(!LawMetadata::default().is_derogated());
    }

    #[test]
    fn test_table_entry_activity() {
        let entries: Vec<RawTableEntry> = serde_json::from_value(json!([
            {"codigo": "1", "descripcion": "a"},
            {"codigo": "2", "descripcion": "b", "activo": false},
            {"codigo": "3", "descripcion": "c", "activo": "N"}
        ]))
        .unwrap();
        let active: Vec<_> = entries.iter().map(RawTableEntry::is_active).collect();
        assert_eq!(active, vec![true, false, false]);
    }
}
