//! Integration tests
//!
//! Test end-to-end functionality of the HTTP surface

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use httpmock::prelude::*;
use quotegreeter::config::{QuoteApiConfig, Settings};
use quotegreeter::handlers::{create_router, invoke::invoke_from_file};
use quotegreeter::{QuoteGreeter, ResponseEnvelope};
use serde_json::json;
use std::io::Write;
use tower::ServiceExt;

/// Create test settings pointed at the mock quote service
fn create_test_settings(base_url: String) -> Settings {
    Settings {
        quote_api: QuoteApiConfig::with_base_url(base_url),
        ..Default::default()
    }
}

async fn start_quote_server() -> MockServer {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/random");
            then.status(200)
                .json_body(json!({"content": "Be yourself.", "author": "Oscar Wilde"}));
        })
        .await;
    server
}

async fn read_body(response: axum::response::Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

#[tokio::test]
async fn test_invoke_endpoint_returns_envelope() {
    let server = start_quote_server().await;
    let app = create_router(create_test_settings(server.base_url()));

    let request = Request::builder()
        .method("POST")
        .uri("/invoke")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"source": "aws.events"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let envelope: ResponseEnvelope = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(envelope.status_code, 200);

    let body: serde_json::Value = serde_json::from_str(&envelope.body).unwrap();
    assert_eq!(
        body["message"],
        "Hello World! Here's a random quote for you:\n\"Be yourself.\"\n- Oscar Wilde"
    );
}

#[tokio::test]
async fn test_invoke_endpoint_accepts_non_json_event() {
    let server = start_quote_server().await;
    let app = create_router(create_test_settings(server.base_url()));

    let request = Request::builder()
        .method("POST")
        .uri("/invoke")
        .body(Body::from("not json at all"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let envelope: serde_json::Value = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(envelope["statusCode"], 200);
    assert!(envelope["body"].is_string());
}

#[tokio::test]
async fn test_invoke_endpoint_reports_failure_in_envelope() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/random");
            then.status(200).body("definitely not json");
        })
        .await;
    let app = create_router(create_test_settings(server.base_url()));

    let request = Request::builder()
        .method("POST")
        .uri("/invoke")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let envelope: ResponseEnvelope = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(envelope, ResponseEnvelope::failure());
}

#[tokio::test]
async fn test_gateway_endpoint_unwraps_envelope() {
    let server = start_quote_server().await;
    let app = create_router(create_test_settings(server.base_url()));

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "application/json");

    let body: serde_json::Value = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(
        body,
        json!({"message": "Hello World! Here's a random quote for you:\n\"Be yourself.\"\n- Oscar Wilde"})
    );
}

#[tokio::test]
async fn test_gateway_endpoint_maps_failure_to_500() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/random");
            then.status(200).json_body(json!({"content": "Be yourself."}));
        })
        .await;
    let app = create_router(create_test_settings(server.base_url()));

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(body, json!({"error": "Failed to retrieve quote"}));
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_router(Settings::default());

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let health_response: serde_json::Value = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(health_response["status"], "healthy");
    assert_eq!(health_response["service"], "quotegreeter");
    assert!(health_response["version"].is_string());
    assert!(health_response["timestamp"].is_string());
    assert_eq!(health_response["details"]["quote_api"], "https://api.quotable.io/random");
    assert!(health_response["details"]["uptime_seconds"].is_number());
}

#[tokio::test]
async fn test_liveness_check_endpoint() {
    let app = create_router(Settings::default());

    let request = Request::builder().uri("/health/live").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let health_response: serde_json::Value = serde_json::from_slice(&read_body(response).await).unwrap();
    assert_eq!(health_response["status"], "alive");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = create_router(Settings::default());

    let request = Request::builder().uri("/v1/messages").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invoke_from_event_file() {
    let server = start_quote_server().await;
    let greeter = QuoteGreeter::from_settings(&create_test_settings(server.base_url()));

    let mut event_file = tempfile::NamedTempFile::new().unwrap();
    write!(event_file, r#"{{"name": "Ada"}}"#).unwrap();

    let envelope = invoke_from_file(&greeter, event_file.path()).await.unwrap();
    assert_eq!(envelope.status_code, 200);
}

#[tokio::test]
async fn test_invoke_from_missing_event_file() {
    let greeter = QuoteGreeter::from_settings(&Settings::default());
    let dir = tempfile::tempdir().unwrap();

    let result = invoke_from_file(&greeter, &dir.path().join("missing.json")).await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Failed to read event file"));
}

#[tokio::test]
async fn test_uptime_counts_from_router_creation() {
    let app = create_router(Settings::default());
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    let health_response: serde_json::Value = serde_json::from_slice(&read_body(response).await).unwrap();
    assert!(health_response["details"]["uptime_seconds"].as_u64().unwrap() >= 1);
}

/// Run the binary in one-shot mode against an event file and return its stdout
async fn run_one_shot(base_url: &str) -> Vec<u8> {
    let mut event_file = tempfile::NamedTempFile::new().unwrap();
    write!(event_file, r#"{{"source": "scheduler"}}"#).unwrap();

    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_quotegreeter"))
        .arg(event_file.path())
        .env_remove("SERVER_HOST")
        .env_remove("SERVER_PORT")
        .env_remove("QUOTE_API_PATH")
        .env_remove("QUOTE_API_TIMEOUT")
        .env_remove("LOG_FORMAT")
        .env("QUOTE_API_BASE_URL", base_url)
        .env("RUST_LOG", "debug")
        .output()
        .await
        .unwrap();

    assert!(output.status.success());
    output.stdout
}

#[tokio::test]
async fn test_one_shot_stdout_is_only_the_envelope() {
    let server = start_quote_server().await;

    let stdout = run_one_shot(&server.base_url()).await;
    let envelope: ResponseEnvelope = serde_json::from_slice(&stdout).unwrap();

    assert_eq!(envelope.status_code, 200);
    let body: serde_json::Value = serde_json::from_str(&envelope.body).unwrap();
    assert_eq!(
        body["message"],
        "Hello World! Here's a random quote for you:\n\"Be yourself.\"\n- Oscar Wilde"
    );
}

#[tokio::test]
async fn test_one_shot_failure_keeps_logs_off_stdout() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let stdout = run_one_shot(&format!("http://{}", addr)).await;
    let envelope: ResponseEnvelope = serde_json::from_slice(&stdout).unwrap();

    assert_eq!(envelope, ResponseEnvelope::failure());
}
