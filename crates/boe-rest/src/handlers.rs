//! HTTP request handlers for the REST wrapper.
//!
//! Every tool is reachable through a dedicated route and through the
//! generic `POST /tools/:name`. Request bodies are the tool's JSON arguments
//! (an empty body means no arguments); responses are JSON arrays of tool
//! results.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post, MethodRouter},
    Router as AxumRouter,
};
use boe_tools::{BoeTools, ToolDefinition, ToolError, ToolResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Tool registry (holds the upstream connection pool)
    pub tools: Arc<BoeTools>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// `healthy` when upstream answers, `degraded` otherwise
    pub status: String,
    /// Whether the upstream API answered
    pub upstream_available: bool,
    /// Upstream API root
    pub upstream_url: String,
    /// Server version
    pub version: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorBody,
}

/// Error details
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error kind, e.g. `ValidationError`
    pub kind: String,
    /// Human-readable message
    pub message: String,
    /// Upstream status, for upstream errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Tool invocation failed
    Tool(ToolError),
}

impl AppError {
    /// HTTP status for the error kind
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Tool(e) => match e {
                ToolError::Validation(_) => StatusCode::BAD_REQUEST,
                ToolError::Schema(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ToolError::ToolNotFound(_) => StatusCode::NOT_FOUND,
                ToolError::Upstream { status: 404, .. } => StatusCode::NOT_FOUND,
                ToolError::Upstream { .. } => StatusCode::BAD_GATEWAY,
                ToolError::Network(_) => StatusCode::GATEWAY_TIMEOUT,
                ToolError::Parse(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let AppError::Tool(e) = self;
        warn!(status = status.as_u16(), kind = e.kind(), error = %e, "Request failed");

        let body = Json(ErrorResponse {
            error: ErrorBody {
                kind: e.kind().to_string(),
                message: e.to_string(),
                upstream_status: e.upstream_status(),
            },
        });
        (status, body).into_response()
    }
}

impl From<ToolError> for AppError {
    fn from(e: ToolError) -> Self {
        AppError::Tool(e)
    }
}

/// Request body as tool arguments; empty means `{}`
fn parse_body(body: &Bytes) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Tool(ToolError::Schema(format!("Request body is not valid JSON: {}", e))))
}

async fn invoke(state: &AppState, tool: &str, arguments: Value) -> Result<Json<Vec<ToolResult>>, AppError> {
    info!(tool, "REST tool call");
    Ok(Json(state.tools.call(tool, arguments).await?))
}

async fn invoke_with_body(
    state: AppState,
    tool: &'static str,
    body: Bytes,
) -> Result<Json<Vec<ToolResult>>, AppError> {
    let arguments = parse_body(&body)?;
    invoke(&state, tool, arguments).await
}

async fn invoke_without_arguments(
    state: AppState,
    tool: &'static str,
) -> Result<Json<Vec<ToolResult>>, AppError> {
    invoke(&state, tool, json!({})).await
}

/// POST route running `tool` with the request body as arguments
fn tool_post(tool: &'static str) -> MethodRouter<AppState> {
    post(move |State(state): State<AppState>, body: Bytes| invoke_with_body(state, tool, body))
}

/// GET route running an argument-less `tool`
fn tool_get(tool: &'static str) -> MethodRouter<AppState> {
    get(move |State(state): State<AppState>| invoke_without_arguments(state, tool))
}

/// POST /tools/:name - Run any tool by name
async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Vec<ToolResult>>, AppError> {
    invoke(&state, &name, parse_body(&body)?).await
}

/// Optional filters of GET /auxiliary/code/:code
#[derive(Debug, Deserialize)]
pub struct CodeQuery {
    /// `department`, `range`, `matter`, `scope` or `state`
    pub code_type: Option<String>,
}

/// GET /auxiliary/code/:code - Describe one code
async fn code_description(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<CodeQuery>,
) -> Result<Json<Vec<ToolResult>>, AppError> {
    let mut arguments = json!({ "code": code });
    if let Some(code_type) = query.code_type {
        arguments["code_type"] = json!(code_type);
    }
    invoke(&state, "get_code_description", arguments).await
}

/// GET /health - Live upstream check
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let client = state.tools.client();
    let upstream_available = client.health_check().await;

    Json(HealthCheckResponse {
        status: if upstream_available { "healthy" } else { "degraded" }.to_string(),
        upstream_available,
        upstream_url: client.base_url().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /tools - Tool catalog
async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolDefinition>> {
    Json(state.tools.definitions())
}

/// Dedicated routes: (method, path, tool)
const TOOL_ROUTES: &[(&str, &str, &str)] = &[
    ("POST", "/search/legislation", "search_consolidated_legislation"),
    ("POST", "/legislation/law", "get_consolidated_law"),
    ("POST", "/legislation/structure", "get_law_structure"),
    ("POST", "/legislation/block", "get_law_text_block"),
    ("POST", "/legislation/related", "find_related_laws"),
    ("POST", "/summary/boe", "get_boe_summary"),
    ("POST", "/summary/borme", "get_borme_summary"),
    ("POST", "/summary/recent", "search_recent_boe"),
    ("POST", "/summary/weekly", "get_weekly_summary"),
    ("POST", "/auxiliary/departments", "get_departments_table"),
    ("POST", "/auxiliary/ranges", "get_legal_ranges_table"),
    ("POST", "/auxiliary/matters", "get_matters_table"),
    ("GET", "/auxiliary/scopes", "get_scopes_table"),
    ("GET", "/auxiliary/states", "get_consolidation_states_table"),
    ("POST", "/auxiliary/search", "search_auxiliary_data"),
    ("POST", "/laws/common", "list_common_laws"),
    ("POST", "/laws/search", "search_common_laws"),
    ("POST", "/laws/recent", "get_recent_important_laws"),
];

/// GET / - Endpoint index
async fn index() -> Json<Value> {
    let mut endpoints: Vec<Value> = vec![
        json!({"method": "GET", "path": "/health"}),
        json!({"method": "GET", "path": "/tools"}),
        json!({"method": "POST", "path": "/tools/{name}"}),
        json!({"method": "GET", "path": "/auxiliary/code/{code}", "tool": "get_code_description"}),
    ];
    endpoints.extend(
        TOOL_ROUTES
            .iter()
            .map(|(method, path, tool)| json!({"method": method, "path": path, "tool": tool})),
    );

    Json(json!({
        "name": "boe-rest",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "API REST sobre los datos abiertos del Boletín Oficial del Estado",
        "endpoints": endpoints,
    }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Create the axum router with all routes
pub fn create_router(state: AppState, cors_origins: &[String]) -> AxumRouter {
    let mut router = AxumRouter::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/tools", get(list_tools))
        .route("/tools/:name", post(call_tool))
        .route("/auxiliary/code/:code", get(code_description));

    for &(method, path, tool) in TOOL_ROUTES {
        let route = if method == "GET" { tool_get(tool) } else { tool_post(tool) };
        router = router.route(path, route);
    }

    router
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use boe_client::{BoeClient, ClientConfig};
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> AppState {
        let client = BoeClient::open(&ClientConfig::with_base_url("http://127.0.0.1:1")).unwrap();
        AppState {
            tools: Arc::new(BoeTools::new(client)),
        }
    }

    #[test]
    fn test_error_status_mapping() {
        let status = |e: ToolError| AppError::from(e).status();
        assert_eq!(status(ToolError::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(ToolError::Schema("x".into())), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status(ToolError::ToolNotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status(ToolError::Upstream { status: 404, body: String::new() }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(ToolError::Upstream { status: 500, body: String::new() }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(status(ToolError::Network("timeout".into())), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(status(ToolError::Parse("x".into())), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(&Bytes::from_static(b"")).unwrap(), json!({}));
        assert_eq!(parse_body(&Bytes::from_static(b" \n")).unwrap(), json!({}));
        assert_eq!(parse_body(&Bytes::from_static(br#"{"a":1}"#)).unwrap(), json!({"a": 1}));
        assert!(parse_body(&Bytes::from_static(b"{a")).is_err());
    }

    #[test]
    fn test_every_tool_has_a_route() {
        let mut routed: Vec<&str> = TOOL_ROUTES.iter().map(|(_, _, tool)| *tool).collect();
        routed.push("get_code_description");
        for definition in boe_tools::catalog::definitions() {
            assert!(routed.contains(&definition.name), "{}", definition.name);
        }
    }

    #[tokio::test]
    async fn test_index() {
        let app = create_router(create_test_state(), &[]);
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_common_laws_route() {
        let app = create_router(create_test_state(), &[]);
        let request = Request::builder()
            .method("POST")
            .uri("/laws/search")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"keyword": "Constitución"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
