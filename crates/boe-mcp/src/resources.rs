//! Read-only resources: usage guide and upstream status

use boe_client::DEFAULT_BASE_URL;
use boe_tools::BoeTools;
use tracing::info;

use crate::protocol::{ResourceContents, ResourceDefinition};

/// Usage guide URI
pub const HELP_URI: &str = "boe://help";

/// Upstream health URI
pub const STATUS_URI: &str = "boe://status";

const MARKDOWN: &str = "text/markdown";

/// Every resource the server exposes
pub fn definitions() -> Vec<ResourceDefinition> {
    vec![
        ResourceDefinition {
            uri: HELP_URI,
            name: "Guía de uso",
            description: "Herramientas disponibles y consejos para consultar el BOE",
            mime_type: MARKDOWN,
        },
        ResourceDefinition {
            uri: STATUS_URI,
            name: "Estado de la API",
            description: "Comprueba en el momento si la API de datos abiertos del BOE responde",
            mime_type: MARKDOWN,
        },
    ]
}

/// Render a resource, or `None` for an unknown URI
pub async fn read(tools: &BoeTools, uri: &str) -> Option<ResourceContents> {
    let text = match uri {
        HELP_URI => help_text(tools),
        STATUS_URI => status_text(tools).await,
        _ => return None,
    };
    Some(ResourceContents {
        uri: uri.to_string(),
        mime_type: MARKDOWN,
        text,
    })
}

fn help_text(tools: &BoeTools) -> String {
    let mut out = vec![
        "# BOE MCP: guía de uso".to_string(),
        String::new(),
        format!("Datos obtenidos de la API pública de datos abiertos del BOE ({}).", DEFAULT_BASE_URL),
        String::new(),
        "## Herramientas".to_string(),
    ];
    for tool in tools.definitions() {
        out.push(format!("- `{}`: {}", tool.name, tool.description));
    }
    out.extend(
        [
            "",
            "## Consejos",
            "- Las fechas usan el formato `AAAAMMDD` (ej. `20240529`).",
            "- Los identificadores de norma siguen el formato `BOE-A-AAAA-NNNNN` (ej. `BOE-A-1978-31229`).",
            "- La búsqueda por texto libre de `search_consolidated_legislation` no la aplica la API: \
             usa `search_common_laws` para encontrar el identificador de leyes conocidas.",
            "- `get_law_structure` da los IDs de bloque que acepta `get_law_text_block`.",
            "- Los domingos no se publica el BOE.",
        ]
        .map(str::to_string),
    );
    out.join("\n")
}

async fn status_text(tools: &BoeTools) -> String {
    let client = tools.client();
    let healthy = client.health_check().await;
    info!(healthy, "Upstream status checked");

    let state = if healthy {
        "✅ La API del BOE está disponible."
    } else {
        "❌ La API del BOE no responde correctamente."
    };
    format!("# Estado de la API del BOE\n\n{}\n\n- **URL:** {}", state, client.base_url())
}
