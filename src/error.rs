//! Error types and HTTP error response handling.
//!
//! This module defines the store-level errors raised by key backends and
//! the application errors returned by HTTP handlers, along with how the
//! latter are converted into HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Errors raised by a key store backend.
///
/// These never cross the HTTP boundary verbatim: the verification service
/// maps them to `VerifyResult::InternalError` and `AppError` hides them
/// behind a generic message.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The keys file exists but could not be read.
    #[error("failed to read keys file: {0}")]
    Read(#[source] std::io::Error),

    /// The keys file was read but is not a valid list of key records.
    #[error("keys file is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// Records could not be serialized.
    #[error("failed to encode key records: {0}")]
    Encode(#[source] serde_json::Error),

    /// The keys file could not be written or replaced.
    #[error("failed to write keys file: {0}")]
    Write(#[source] std::io::Error),

    /// A previous holder of the store lock panicked.
    #[error("key store lock poisoned")]
    LockPoisoned,
}

/// Application-wide error type for HTTP handlers.
///
/// Business outcomes of a verification (expired, mismatch, ...) are not
/// errors; they are `VerifyResult` values. This enum covers failures of the
/// service itself.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Key store operation failed.
    ///
    /// Returns HTTP 500 without exposing the underlying cause.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Blocking task running store work was cancelled or panicked.
    ///
    /// Returns HTTP 500.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// Errors use the same envelope as verification failures so clients only
/// have to handle one shape:
/// ```json
/// {
///   "success": false,
///   "message": "Server error"
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Details are logged here and never sent to the client
        tracing::error!(error = %self, "request failed");

        let body = Json(json!({
            "success": false,
            "message": "Server error"
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
