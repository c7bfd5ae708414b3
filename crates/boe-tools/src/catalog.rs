//! Tool catalog: names, descriptions and input schemas

use serde::Serialize;
use serde_json::{json, Value};

/// Tool definition as advertised to clients
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: &'static str,
    /// Tool description
    pub description: &'static str,
    /// Input schema (JSON Schema)
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

const LAW_ID_PATTERN: &str = r"^BOE-[A-Z]-\d{4}-\d{1,5}$";
const DATE_PATTERN: &str = r"^\d{8}$";

fn tool(name: &'static str, description: &'static str, properties: Value, required: &[&str]) -> ToolDefinition {
    ToolDefinition {
        name,
        description,
        input_schema: json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false
        }),
    }
}

fn law_id_property(description: &str) -> Value {
    json!({"type": "string", "pattern": LAW_ID_PATTERN, "description": description})
}

fn date_property(description: &str) -> Value {
    json!({"type": "string", "pattern": DATE_PATTERN, "description": description})
}

fn section_filter_property() -> Value {
    json!({
        "type": "string",
        "enum": ["all", "1", "2A", "2B", "3", "4", "5"],
        "default": "all",
        "description": "Sección del BOE (1 disposiciones generales, 2A autoridades y personal, 2B oposiciones, 3 otras disposiciones, 4 justicia, 5 anuncios)"
    })
}

/// Every tool, in a stable order
pub fn definitions() -> Vec<ToolDefinition> {
    let mut tools = legislation();
    tools.extend(summaries());
    tools.extend(auxiliary());
    tools.extend(common_laws());
    tools
}

/// Look up one definition by name
pub fn find(name: &str) -> Option<ToolDefinition> {
    definitions().into_iter().find(|t| t.name == name)
}

fn legislation() -> Vec<ToolDefinition> {
    vec![
        tool(
            "search_consolidated_legislation",
            "Busca normas en la legislación consolidada del BOE. La API del BOE no aplica la \
             búsqueda por texto libre: filtra por departamento, rango o fechas, o usa \
             search_common_laws para leyes conocidas.",
            json!({
                "query": {"type": "string", "description": "Texto libre (la API no lo aplica)"},
                "title": {"type": "string", "description": "Texto en el título (la API no lo aplica)"},
                "department_code": {"type": "string", "description": "Código de departamento (ej: '7723' Jefatura del Estado)"},
                "legal_range_code": {"type": "string", "description": "Código de rango (ej: '1300' Ley)"},
                "matter_code": {"type": "string", "description": "Código de materia"},
                "from_date": date_property("Publicadas desde (AAAAMMDD)"),
                "to_date": date_property("Publicadas hasta (AAAAMMDD)"),
                "limit": {"type": "integer", "minimum": 1, "maximum": 100, "default": 20},
                "offset": {"type": "integer", "minimum": 0, "default": 0},
                "include_derogated": {"type": "boolean", "default": false, "description": "Incluir normas derogadas"}
            }),
            &[],
        ),
        tool(
            "get_consolidated_law",
            "Obtiene metadatos, análisis y opcionalmente el texto consolidado de una norma",
            json!({
                "law_id": law_id_property("Identificador de la norma (ej: 'BOE-A-2015-10566')"),
                "include_metadata": {"type": "boolean", "default": true},
                "include_analysis": {"type": "boolean", "default": true, "description": "Materias, notas y referencias"},
                "include_full_text": {"type": "boolean", "default": false, "description": "Texto completo (puede ser muy extenso)"},
                "include_eli_metadata": {"type": "boolean", "default": false, "description": "Metadatos ELI"}
            }),
            &["law_id"],
        ),
        tool(
            "get_law_text_block",
            "Obtiene un bloque concreto del texto de una norma (artículo, disposición...)",
            json!({
                "law_id": law_id_property("Identificador de la norma"),
                "block_id": {"type": "string", "pattern": "^[A-Za-z0-9_-]+$", "description": "ID del bloque (ej: 'a1', 'dd')"}
            }),
            &["law_id", "block_id"],
        ),
        tool(
            "get_law_structure",
            "Obtiene el índice de una norma agrupado en preámbulo, articulado, disposiciones y anexos",
            json!({"law_id": law_id_property("Identificador de la norma")}),
            &["law_id"],
        ),
        tool(
            "find_related_laws",
            "Encuentra normas que modifican o derogan una norma, o que son modificadas o derogadas por ella",
            json!({
                "law_id": law_id_property("Identificador de la norma base"),
                "relation_type": {
                    "type": "string",
                    "enum": ["all", "modifies", "modified_by", "derogates", "derogated_by"],
                    "default": "all"
                }
            }),
            &["law_id"],
        ),
    ]
}

fn summaries() -> Vec<ToolDefinition> {
    vec![
        tool(
            "get_boe_summary",
            "Obtiene el sumario del BOE de una fecha",
            json!({
                "date": date_property("Fecha (AAAAMMDD, ej: '20240529')"),
                "section_filter": section_filter_property(),
                "department_filter": {"type": "string", "description": "Código de departamento"},
                "include_pdf_links": {"type": "boolean", "default": true},
                "max_items": {"type": "integer", "minimum": 1, "maximum": 100, "default": 50}
            }),
            &["date"],
        ),
        tool(
            "get_borme_summary",
            "Obtiene el sumario del BORME de una fecha",
            json!({
                "date": date_property("Fecha (AAAAMMDD)"),
                "province_filter": {"type": "string", "description": "Provincia (código o nombre)"},
                "include_pdf_links": {"type": "boolean", "default": true},
                "max_items": {"type": "integer", "minimum": 1, "maximum": 100, "default": 50}
            }),
            &["date"],
        ),
        tool(
            "search_recent_boe",
            "Busca términos en los títulos de los sumarios del BOE de los últimos días",
            json!({
                "days_back": {"type": "integer", "minimum": 1, "maximum": 30, "default": 7},
                "search_terms": {"type": "string", "description": "Texto que debe aparecer tal cual en el título (sin distinguir mayúsculas)"},
                "section_filter": section_filter_property(),
                "department_filter": {"type": "string", "description": "Código de departamento"}
            }),
            &[],
        ),
        tool(
            "get_weekly_summary",
            "Resumen de publicaciones del BOE en los siete días desde una fecha",
            json!({
                "start_date": date_property("Primer día (AAAAMMDD)"),
                "include_statistics": {"type": "boolean", "default": true, "description": "Secciones y departamentos más activos"}
            }),
            &["start_date"],
        ),
    ]
}

fn auxiliary() -> Vec<ToolDefinition> {
    let code_table = json!({
        "search_term": {"type": "string", "description": "Filtrar por descripción"},
        "active_only": {"type": "boolean", "default": true},
        "limit": {"type": "integer", "minimum": 1, "maximum": 200, "default": 50}
    });

    vec![
        tool(
            "get_departments_table",
            "Tabla de códigos de departamentos emisores",
            code_table.clone(),
            &[],
        ),
        tool(
            "get_legal_ranges_table",
            "Tabla de rangos normativos ordenada por jerarquía",
            code_table,
            &[],
        ),
        tool(
            "get_matters_table",
            "Tabla de materias del vocabulario controlado",
            json!({
                "search_term": {"type": "string", "description": "Filtrar por descripción"},
                "limit": {"type": "integer", "minimum": 1, "maximum": 200, "default": 50}
            }),
            &[],
        ),
        tool("get_scopes_table", "Tabla de ámbitos territoriales", json!({}), &[]),
        tool(
            "get_consolidation_states_table",
            "Tabla de estados de consolidación",
            json!({}),
            &[],
        ),
        tool(
            "search_auxiliary_data",
            "Busca un término en el código o la descripción de las tablas auxiliares",
            json!({
                "query": {"type": "string"},
                "table_type": {
                    "type": "string",
                    "enum": ["all", "departments", "ranges", "matters", "scopes", "states"],
                    "default": "all"
                }
            }),
            &["query"],
        ),
        tool(
            "get_code_description",
            "Descripción de un código exacto de las tablas auxiliares (ej: '7723')",
            json!({
                "code": {"type": "string"},
                "code_type": {"type": "string", "enum": ["department", "range", "matter", "scope", "state"]}
            }),
            &["code"],
        ),
    ]
}

fn common_laws() -> Vec<ToolDefinition> {
    let mut categories = vec!["all"];
    categories.extend(boe_domain::LawCategory::ALL.iter().map(|c| c.key()));

    vec![
        tool(
            "list_common_laws",
            "Catálogo de leyes españolas importantes con su identificador BOE",
            json!({
                "category": {"type": "string", "enum": categories, "default": "all"},
                "show_descriptions": {"type": "boolean", "default": true}
            }),
            &[],
        ),
        tool(
            "search_common_laws",
            "Busca leyes conocidas por nombre o alias y devuelve su identificador BOE",
            json!({"keyword": {"type": "string", "description": "Ej: 'laboral', 'LOPD', 'código'"}}),
            &["keyword"],
        ),
        tool(
            "get_recent_important_laws",
            "Leyes importantes publicadas en los últimos años",
            json!({"years_back": {"type": "integer", "minimum": 1, "maximum": 20, "default": 5}}),
            &[],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let tools = definitions();
        let names: HashSet<_> = tools.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), tools.len());
        assert_eq!(tools.len(), 19);
    }

    #[test]
    fn test_schemas_are_closed_objects() {
        for tool in definitions() {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
            assert_eq!(tool.input_schema["additionalProperties"], false, "{}", tool.name);
        }
    }

    #[test]
    fn test_serializes_input_schema_key() {
        let value = serde_json::to_value(find("get_law_structure").unwrap()).unwrap();
        assert_eq!(value["inputSchema"]["required"][0], "law_id");
        assert!(find("delete_law").is_none());
    }

    #[test]
    fn test_category_enum_lists_every_key() {
        let tool = find("list_common_laws").unwrap();
        let keys = tool.input_schema["properties"]["category"]["enum"]
            .as_array()
            .unwrap()
            .len();
        assert_eq!(keys, 15);
    }
}
