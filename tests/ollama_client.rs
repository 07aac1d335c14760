// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Integration tests for [`OllamaClient`] against a local axum stand-in for
//! the Ollama HTTP API.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::time::Duration;

use doc_renamer::batch::BatchRenamer;
use doc_renamer::config::EngineConfig;
use doc_renamer::ollama::{CompletionBackend, OllamaClient};
use doc_renamer::{AppConfig, RenamerError};

/// Serve `app` on an ephemeral port and return its generate URL
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/generate", addr)
}

fn engine(url: String) -> EngineConfig {
    EngineConfig {
        url,
        model: "llama3.1".to_string(),
        timeout_secs: 5,
        retries: 0,
    }
}

/// Echo the request fields back so the test can check what was sent
async fn echo_generate(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "model": body["model"],
        "response": format!(
            "model={} stream={} prompt={}",
            body["model"].as_str().unwrap_or_default(),
            body["stream"],
            body["prompt"].as_str().unwrap_or_default()
        ),
        "done": true
    }))
}

#[tokio::test]
async fn generate_sends_model_prompt_and_no_stream() {
    let url = serve(Router::new().route("/api/generate", post(echo_generate))).await;
    let client = OllamaClient::new(&engine(url)).unwrap();

    let reply = client.complete("name this").await.unwrap();

    assert_eq!(reply, "model=llama3.1 stream=false prompt=name this");
}

#[tokio::test]
async fn non_success_status_is_an_inference_error() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded") }),
    );
    let client = OllamaClient::new(&engine(serve(app).await)).unwrap();

    assert!(matches!(client.complete("x").await, Err(RenamerError::Inference(_))));
}

#[tokio::test]
async fn malformed_json_is_an_inference_error() {
    let app = Router::new().route("/api/generate", post(|| async { "definitely not json" }));
    let client = OllamaClient::new(&engine(serve(app).await)).unwrap();

    assert!(matches!(client.complete("x").await, Err(RenamerError::Inference(_))));
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({ "response": "too late" }))
        }),
    );
    let mut config = engine(serve(app).await);
    config.timeout_secs = 1;
    let client = OllamaClient::new(&config).unwrap();

    assert!(matches!(client.complete("x").await, Err(RenamerError::Inference(_))));
}

#[tokio::test]
async fn model_listing_and_health() {
    let app = Router::new().route(
        "/api/tags",
        get(|| async {
            Json(json!({ "models": [{ "name": "llama3.1:latest" }, { "name": "mistral:7b" }] }))
        }),
    );
    let client = OllamaClient::new(&engine(serve(app).await)).unwrap();

    client.health_check().await.unwrap();
    assert_eq!(client.list_models().await.unwrap(), vec!["llama3.1:latest", "mistral:7b"]);
    assert!(client.model_available().await.unwrap());
}

#[tokio::test]
async fn unreachable_endpoint_fails_health_check() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = OllamaClient::new(&engine(format!("http://{}", addr))).unwrap();
    assert!(matches!(client.health_check().await, Err(RenamerError::Inference(_))));
}

#[tokio::test]
async fn batch_against_http_endpoint() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async { Json(json!({ "response": "Gemeente Utrecht Parkeervergunning 12-03-2024" })) }),
    );
    let mut config = AppConfig::default();
    config.ai_engine = engine(serve(app).await);

    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("brief.txt"), "Gemeente Utrecht").unwrap();

    let client = OllamaClient::new(&config.ai_engine).unwrap();
    let report = BatchRenamer::new(config, Box::new(client))
        .run(input.path(), output.path())
        .await
        .unwrap();

    assert_eq!(report.renamed(), 1);
    assert!(output
        .path()
        .join("gemeente_utrecht_parkeervergunning_12_03_2024.txt")
        .is_file());
}
