#![cfg(feature = "http_api")]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use gantt_tool::{
    ValidationOptions,
    http_api::{self, ApiSettings, ConvertResponse, StoredDiagram, ValidationReport},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

fn new_router(options: ValidationOptions) -> axum::Router {
    let state = http_api::AppState::new(options);
    http_api::router(state)
}

fn post(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn schedule_body(title: &str) -> String {
    json!({
        "config": { "title": title },
        "sections": [
            { "name": "Development", "tasks": [
                { "id": "task1", "name": "Task One", "start": "2024-01-01",
                  "duration": { "value": 5, "unit": "d" } }
            ] }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = new_router(ValidationOptions::default())
        .oneshot(get("/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_json(response).await;
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn convert_and_fetch_last_diagram() {
    let app = new_router(ValidationOptions::default());

    // Nothing converted yet
    let response = app.clone().oneshot(get("/diagram")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(post("/convert", schedule_body("Plan")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let converted: ConvertResponse = read_json(response).await;
    assert!(converted.result.success);
    assert_eq!(
        converted.result.text.as_deref(),
        Some("gantt\n    title Plan\n    section Development\n    Task One : task1 : 2024-01-01 : 5d")
    );
    assert_eq!(converted.diagram_id.as_deref(), Some("gantt-0"));

    // Same content keeps its identifier, new content gets a fresh one
    let response = app
        .clone()
        .oneshot(post("/convert", schedule_body("Plan")))
        .await
        .unwrap();
    let again: ConvertResponse = read_json(response).await;
    assert_eq!(again.diagram_id.as_deref(), Some("gantt-0"));

    let response = app
        .clone()
        .oneshot(post("/convert", schedule_body("Revised")))
        .await
        .unwrap();
    let revised: ConvertResponse = read_json(response).await;
    assert_eq!(revised.diagram_id.as_deref(), Some("gantt-1"));

    let response = app.oneshot(get("/diagram")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stored: StoredDiagram = read_json(response).await;
    assert_eq!(stored.diagram_id, "gantt-1");
    assert!(stored.text.contains("title Revised"));
}

#[tokio::test]
async fn convert_reports_validation_failures() {
    let response = new_router(ValidationOptions::default())
        .oneshot(post("/convert", json!({ "sections": [] }).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = read_json(response).await;
    assert_eq!(
        body,
        json!({ "success": false, "error": "Gantt data must have at least one section" })
    );
}

#[tokio::test]
async fn convert_rejects_malformed_json() {
    let response = new_router(ValidationOptions::default())
        .oneshot(post("/convert", "{ not json".to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let converted: ConvertResponse = read_json(response).await;
    assert!(!converted.result.success);
    assert!(converted.result.text.is_none());
    assert!(
        converted
            .result
            .error
            .unwrap()
            .starts_with("invalid schedule JSON")
    );
}

#[tokio::test]
async fn validate_endpoint_honours_cycle_option() {
    let cyclic = json!({
        "sections": [
            { "name": "Loop", "tasks": [
                { "id": "a", "name": "A", "after": "b", "duration": "1d" },
                { "id": "b", "name": "B", "after": "a", "duration": "1d" }
            ] }
        ]
    })
    .to_string();

    let response = new_router(ValidationOptions::default())
        .oneshot(post("/validate", cyclic.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report: ValidationReport = read_json(response).await;
    assert!(report.valid);

    let response = new_router(ValidationOptions::with_cycle_detection())
        .oneshot(post("/validate", cyclic))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let report: ValidationReport = read_json(response).await;
    assert!(!report.valid);
    assert_eq!(
        report.error.as_deref(),
        Some("Dependency cycle detected: a -> b -> a")
    );
}

#[tokio::test]
async fn validate_rejects_malformed_json() {
    let response = new_router(ValidationOptions::default())
        .oneshot(post("/validate", "[1, 2]".to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_json(response).await;
    assert_eq!(body["error"], "invalid_request");
}

#[test]
fn settings_read_address_and_cycle_flag() {
    let settings = ApiSettings::from_lookup(|key| match key {
        http_api::ADDR_ENV => Some("127.0.0.1:8080".to_string()),
        http_api::DETECT_CYCLES_ENV => Some("true".to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(settings.addr.to_string(), "127.0.0.1:8080");
    assert!(settings.validation.detect_cycles);

    let defaults = ApiSettings::from_lookup(|_| None).unwrap();
    assert_eq!(defaults.addr.to_string(), "0.0.0.0:3000");
    assert!(!defaults.validation.detect_cycles);

    assert!(ApiSettings::from_lookup(|_| Some("not an address".to_string())).is_err());
}
