//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use license_auth_server::{
    build_router,
    models::key_record::KeyRecord,
    store::{JsonFileBackend, KeyStore, SharedStore},
};
use serde_json::Value;
use tower::ServiceExt;

/// Write `records` as a keys file and open a store over it.
pub fn file_store(path: &Path, records: &[KeyRecord]) -> SharedStore {
    let store = Arc::new(KeyStore::new(JsonFileBackend::new(path)));
    assert!(store.save_all(records), "seeding keys file should succeed");
    store
}

/// Router plus the store behind it.
pub fn test_app(store: SharedStore) -> Router {
    build_router(store)
}

/// POST a raw body to `/verify`.
pub async fn post_verify_raw(app: Router, content_type: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/verify")
                .header("content-type", content_type)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).expect("Response should be valid JSON");
    (status, json)
}

/// POST `{"key", "hwid"}` to `/verify`.
pub async fn post_verify(app: Router, key: &str, hwid: &str) -> (StatusCode, Value) {
    let body = serde_json::json!({ "key": key, "hwid": hwid }).to_string();
    post_verify_raw(app, "application/json", &body).await
}

/// GET `uri` and return status plus body text.
pub async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}
