//! Tests for the POST /verify endpoint.
//!
//! Every verification outcome must map to a status code and a JSON body
//! with `success` and `message`; successful ones also carry the owner and
//! entitlement hours.

use std::sync::Arc;

use axum::http::StatusCode;
use license_auth_server::{
    error::StoreError,
    models::key_record::{KeyRecord, KeyStatus},
    services::hwid::fingerprint,
    store::{JsonFileBackend, KeyBackend, KeyStore},
};

mod common;
use common::*;

fn stored(path: &std::path::Path, key: &str) -> serde_json::Value {
    let contents = std::fs::read_to_string(path).unwrap();
    let records: Vec<serde_json::Value> = serde_json::from_str(&contents).unwrap();
    records
        .into_iter()
        .find(|r| r["key"] == key)
        .expect("record should be stored")
}

#[tokio::test]
async fn test_first_verify_activates_then_verifies() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.json");
    let app = test_app(file_store(&path, &[KeyRecord::new("ABC", "alice", 24)]));

    let (status, json) = post_verify(app.clone(), "ABC", "deviceX").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Activated successfully");
    assert_eq!(json["owner"], "alice");
    assert_eq!(json["total_hours"], 24);

    let record = stored(&path, "ABC");
    assert_eq!(record["hwid"], fingerprint("deviceX"));
    assert_eq!(record["status"], "active");

    let (status, json) = post_verify(app, "ABC", "deviceX").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Verified");
}

#[tokio::test]
async fn test_other_device_gets_403_and_record_is_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.json");
    let mut record = KeyRecord::new("ABC", "alice", 24);
    record.hwid = Some(fingerprint("deviceX"));
    record.status = Some(KeyStatus::Active);
    let app = test_app(file_store(&path, &[record]));
    let before = std::fs::read(&path).unwrap();

    let (status, json) = post_verify(app, "ABC", "deviceY").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Key locked to another device");
    assert!(json.get("owner").is_none());
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[tokio::test]
async fn test_expired_key_gets_403_and_is_latched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.json");
    let mut record = KeyRecord::new("XYZ", "alice", 24);
    record.expiry = Some(1.into());
    let app = test_app(file_store(&path, &[record]));

    let (status, json) = post_verify(app.clone(), "XYZ", "any").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Key expired");
    assert_eq!(stored(&path, "XYZ")["status"], "expired");

    let (status, _) = post_verify(app, "XYZ", "other").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_legacy_records_do_not_break_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.json");
    std::fs::write(
        &path,
        r#"[
    {"key": "GOOD", "owner": "alice", "hwid": "Waiting...", "total": 24},
    {"key": "LEGACY", "total": 12.5, "expiry": 4102444800.0},
    {"key": "OTHER", "status": "inactive", "hwid": "Waiting..."}
]"#,
    )
    .unwrap();
    let app = test_app(Arc::new(KeyStore::new(JsonFileBackend::new(&path))));

    let (status, json) = post_verify(app.clone(), "GOOD", "deviceX").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["owner"], "alice");

    let (status, json) = post_verify(app, "LEGACY", "deviceY").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hours"], 12.5);

    let other = stored(&path, "OTHER");
    assert_eq!(other["status"], "inactive");
    assert_eq!(stored(&path, "LEGACY")["expiry"], 4102444800.0);
}

#[tokio::test]
async fn test_extended_key_with_stale_expired_status_activates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.json");
    let mut record = KeyRecord::new("XYZ", "alice", 24);
    record.status = Some(KeyStatus::Expired);
    record.expire_at = Some("2999-01-01 00:00:00".to_string());
    let app = test_app(file_store(&path, &[record]));

    let (status, json) = post_verify(app, "XYZ", "deviceX").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Activated successfully");
    assert_eq!(stored(&path, "XYZ")["status"], "active");
}

#[tokio::test]
async fn test_unknown_key_gets_403() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(file_store(
        &dir.path().join("keys.json"),
        &[KeyRecord::new("ABC", "alice", 24)],
    ));

    let (status, json) = post_verify(app, "NOPE", "deviceX").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Invalid key");
}

#[tokio::test]
async fn test_missing_fields_get_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(file_store(
        &dir.path().join("keys.json"),
        &[KeyRecord::new("ABC", "alice", 24)],
    ));

    let (status, json) = post_verify_raw(app.clone(), "application/json", r#"{"key": "ABC"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Missing key or HWID");

    let (status, _) = post_verify(app, "   ", "deviceX").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_gets_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(file_store(&dir.path().join("keys.json"), &[]));

    let (status, json) = post_verify_raw(app.clone(), "application/json", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    let (status, _) = post_verify_raw(app, "text/plain", "key=ABC&hwid=x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_keys_file_means_every_key_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.json");
    let store = Arc::new(KeyStore::new(JsonFileBackend::new(&path)));

    let (status, json) = post_verify(test_app(store), "ABC", "deviceX").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Invalid key");
    assert!(!path.exists(), "a failed lookup must not create the keys file");
}

/// Reads one keys file, writes to a path whose directory does not exist.
struct UnwritableBackend {
    reader: JsonFileBackend,
    writer: JsonFileBackend,
}

impl KeyBackend for UnwritableBackend {
    fn load(&mut self) -> Result<Vec<KeyRecord>, StoreError> {
        self.reader.load()
    }

    fn save(&mut self, records: &[KeyRecord]) -> Result<(), StoreError> {
        self.writer.save(records)
    }
}

#[tokio::test]
async fn test_failed_write_gets_500_without_details() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.json");
    file_store(&path, &[KeyRecord::new("ABC", "alice", 24)]);
    let store = Arc::new(KeyStore::new(UnwritableBackend {
        reader: JsonFileBackend::new(&path),
        writer: JsonFileBackend::new(dir.path().join("missing").join("keys.json")),
    }));

    let (status, json) = post_verify(test_app(store), "ABC", "deviceX").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Server error");
    assert!(!json.to_string().contains("keys.json"));

    // The key was not bound
    assert_eq!(stored(&path, "ABC")["hwid"], "Waiting...");
}
