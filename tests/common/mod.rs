#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use dashboard::auth::StaticTokenVerifier;
use dashboard::state::AppState;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

pub const SAMPLE_SCHEDULE: &str =
    "Date\tTopics\tReadings\tHomework\tComment\n1/10\tIntro\tCh1,Ch2\tHW1\t\n1/17\tLoops\t\t\t\n";

/// A single-connection in-memory database, so every query sees the same data.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");

    dashboard::db::migrate(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub async fn test_app() -> (Router, SqlitePool) {
    let pool = test_pool().await;
    let verifier = StaticTokenVerifier::new()
        .with_token("alice-token", "alice", Some("alice@example.com"))
        .with_token("bob-token", "bob", None);

    let state = AppState {
        db: pool.clone(),
        verifier: Arc::new(verifier),
    };
    (dashboard::api::router(state), pool)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).expect("Failed to build request"))
        .await
        .expect("Request failed");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response is not JSON")
    };
    (status, value)
}
