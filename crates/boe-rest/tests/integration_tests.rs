//! Integration tests for the REST wrapper

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use boe_client::{BoeClient, ClientConfig};
use boe_rest::{
    config::RestConfig,
    handlers::{create_router, AppState, ErrorResponse, HealthCheckResponse},
};
use boe_tools::BoeTools;
use mockito::Matcher;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

/// Application whose upstream lives at `url`
fn app_at(url: &str) -> Router {
    let client = BoeClient::open(&ClientConfig::with_base_url(url)).unwrap();
    let state = AppState {
        tools: Arc::new(BoeTools::new(client)),
    };
    create_router(state, &RestConfig::default().cors_origins)
}

fn offline_app() -> Router {
    app_at("http://127.0.0.1:1")
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn send_error(app: Router, request: Request<Body>) -> (StatusCode, ErrorResponse) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_value(body).unwrap())
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let mut upstream = mockito::Server::new_async().await;
    upstream
        .mock("GET", "/legislacion-consolidada")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status":{"code":"200","text":"ok"},"data":[]}"#)
        .create_async()
        .await;

    let (status, body) = send(app_at(&upstream.url()), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let health: HealthCheckResponse = serde_json::from_value(body).unwrap();
    assert_eq!(health.status, "healthy");
    assert!(health.upstream_available);

    let (_, body) = send(offline_app(), get("/health")).await;
    let health: HealthCheckResponse = serde_json::from_value(body).unwrap();
    assert_eq!(health.status, "degraded");
}

#[tokio::test]
async fn test_index_and_catalog() {
    let (status, body) = send(offline_app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    let paths: Vec<&str> = body["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"/summary/boe"));
    assert!(paths.contains(&"/auxiliary/code/{code}"));

    let (status, body) = send(offline_app(), get("/tools")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 19);
}

#[tokio::test]
async fn test_common_laws_routes() {
    let (status, body) = send(offline_app(), post_json("/laws/search", r#"{"keyword": "laboral"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert!(results.len() > 1);
    assert!(results[0]["text"].is_string());

    // Empty body means default arguments
    let (status, _) = send(offline_app(), post_json("/laws/recent", "")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        offline_app(),
        post_json("/tools/list_common_laws", r#"{"category": "organica"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body[1]["text"].as_str().unwrap().contains("Orgánica"));
}

#[tokio::test]
async fn test_error_statuses() {
    let (status, body) = send_error(offline_app(), post_json("/summary/boe", r#"{"date": "2024-05-29"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error.kind, "ValidationError");

    let (status, body) = send_error(offline_app(), post_json("/summary/boe", r#"{"dia": "20240529"}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.error.kind, "SchemaError");

    let (status, body) = send_error(offline_app(), post_json("/legislation/law", "{law_id")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.error.kind, "SchemaError");

    let (status, body) = send_error(offline_app(), post_json("/tools/delete_law", "{}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.error.kind, "ToolNotFoundError");

    let (status, body) = send_error(offline_app(), post_json("/summary/boe", r#"{"date": "20240529"}"#)).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body.error.kind, "NetworkError");
}

#[tokio::test]
async fn test_upstream_statuses() {
    let mut upstream = mockito::Server::new_async().await;
    upstream
        .mock("GET", "/legislacion-consolidada/id/BOE-A-2099-1/metadatos")
        .with_status(404)
        .with_body(r#"{"status":{"code":"404","text":"No encontrada"}}"#)
        .create_async()
        .await;
    upstream
        .mock("GET", "/legislacion-consolidada/id/BOE-A-2099-2/metadatos")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;
    upstream
        .mock("GET", "/legislacion-consolidada/id/BOE-A-2099-3/metadatos")
        .with_status(200)
        .with_body("<html>mantenimiento</html>")
        .create_async()
        .await;

    let (status, body) = send_error(
        app_at(&upstream.url()),
        post_json("/legislation/law", r#"{"law_id": "BOE-A-2099-1"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.error.kind, "UpstreamError");
    assert_eq!(body.error.upstream_status, Some(404));

    let (status, body) = send_error(
        app_at(&upstream.url()),
        post_json("/legislation/law", r#"{"law_id": "BOE-A-2099-2"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body.error.upstream_status, Some(500));

    let (status, body) = send_error(
        app_at(&upstream.url()),
        post_json("/legislation/law", r#"{"law_id": "BOE-A-2099-3"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body.error.kind, "ParseError");
}

#[tokio::test]
async fn test_code_description_route() {
    let mut upstream = mockito::Server::new_async().await;
    upstream
        .mock("GET", "/datos-auxiliares/departamentos")
        .with_status(200)
        .with_body(json!({"status": {"code": "200"}, "data": {"7723": "Jefatura del Estado"}}).to_string())
        .create_async()
        .await;

    let (status, body) = send(
        app_at(&upstream.url()),
        get("/auxiliary/code/7723?code_type=department"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["data"]["description"], "Jefatura del Estado");
}

#[tokio::test]
async fn test_get_table_route() {
    let mut upstream = mockito::Server::new_async().await;
    upstream
        .mock("GET", "/datos-auxiliares/ambitos")
        .with_status(200)
        .with_body(json!({"status": {"code": "200"}, "data": {"1": "Estatal", "2": "Autonómico"}}).to_string())
        .create_async()
        .await;

    let (status, body) = send(app_at(&upstream.url()), get("/auxiliary/scopes")).await;
    assert_eq!(status, StatusCode::OK);
    // header plus both rows
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_cors_preflight() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/summary/boe")
        .header("origin", "http://localhost:8080")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = offline_app().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:8080"
    );

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/summary/boe")
        .header("origin", "http://evil.example")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = offline_app().oneshot(request).await.unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());
}
