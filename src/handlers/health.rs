//! Service descriptor and health check endpoints.

use crate::{error::AppError, store::SharedStore};
use axum::{Json, extract::State};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: &'static str,

    /// Current server time as epoch seconds
    pub time: i64,
}

/// Service descriptor handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "service": "License Auth Server",
///   "status": "online",
///   "version": "0.1.0",
///   "endpoints": {
///     "verify": "/verify (POST)",
///     "admin": "/admin (GET)",
///     "health": "/health (GET)"
///   }
/// }
/// ```
pub async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "License Auth Server",
        "status": "online",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "verify": "/verify (POST)",
            "admin": "/admin (GET)",
            "health": "/health (GET)"
        }
    }))
}

/// Health check handler.
///
/// # Checks
///
/// - Key store lock can be acquired (not poisoned by a crashed request)
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "ok",
///   "time": 1766343600
/// }
/// ```
///
/// # Response (500 Internal Server Error)
///
/// If the store is unusable, returns the standard error response.
pub async fn health_check(State(store): State<SharedStore>) -> Result<Json<HealthResponse>, AppError> {
    // Lock acquisition may block behind a running verification
    tokio::task::spawn_blocking(move || store.lock().map(drop)).await??;

    Ok(Json(HealthResponse {
        status: "ok",
        time: Utc::now().timestamp(),
    }))
}
