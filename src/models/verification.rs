//! Verification request, outcome, and response types.
//!
//! This module defines:
//! - `VerifyRequest`: Request body for `POST /verify`
//! - `VerifyResult`: Outcome of a verification, produced by the verification service
//! - `VerifyResponse`: Response body returned to clients

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Request body for verifying a license key.
///
/// # JSON Example
///
/// ```json
/// {
///   "key": "ICE-7F3A-91BC",
///   "hwid": "BFEBFBFF000906EA-4C4C4544"
/// }
/// ```
///
/// Missing fields deserialize as empty strings and are rejected by the
/// verification service as `InvalidInput`.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyRequest {
    /// License key to verify
    #[serde(default)]
    pub key: String,

    /// Raw hardware identifier of the calling device
    #[serde(default)]
    pub hwid: String,
}

/// Outcome of a single verification.
///
/// Every variant is mapped to an HTTP response by the `IntoResponse`
/// implementation below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyResult {
    /// First verification bound the key to this device
    Activated { owner: String, total_hours: Number },

    /// Key is already bound to this device
    Verified { owner: String, total_hours: Number },

    /// Key has expired (latched into storage)
    Expired,

    /// Key is bound to a different device
    DeviceMismatch,

    /// No record exists for the key
    InvalidKey,

    /// Key or hwid was empty after trimming
    InvalidInput,

    /// Store could not be locked or written
    InternalError,
}

impl VerifyResult {
    /// HTTP status code for this outcome.
    pub fn status_code(&self) -> StatusCode {
        match self {
            VerifyResult::Activated { .. } | VerifyResult::Verified { .. } => StatusCode::OK,
            VerifyResult::Expired | VerifyResult::DeviceMismatch | VerifyResult::InvalidKey => {
                StatusCode::FORBIDDEN
            }
            VerifyResult::InvalidInput => StatusCode::BAD_REQUEST,
            VerifyResult::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message for this outcome.
    pub fn message(&self) -> &'static str {
        match self {
            VerifyResult::Activated { .. } => "Activated successfully",
            VerifyResult::Verified { .. } => "Verified",
            VerifyResult::Expired => "Key expired",
            VerifyResult::DeviceMismatch => "Key locked to another device",
            VerifyResult::InvalidKey => "Invalid key",
            VerifyResult::InvalidInput => "Missing key or HWID",
            VerifyResult::InternalError => "Server error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            VerifyResult::Activated { .. } | VerifyResult::Verified { .. }
        )
    }
}

/// Response body for `POST /verify`.
///
/// # JSON Example (success)
///
/// ```json
/// {
///   "success": true,
///   "message": "Activated successfully",
///   "owner": "alice",
///   "total_hours": 720
/// }
/// ```
///
/// # JSON Example (failure)
///
/// ```json
/// {
///   "success": false,
///   "message": "Key locked to another device"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,

    pub message: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_hours: Option<Number>,
}

impl From<VerifyResult> for VerifyResponse {
    fn from(result: VerifyResult) -> Self {
        let success = result.is_success();
        let message = result.message();

        let (owner, total_hours) = match result {
            VerifyResult::Activated { owner, total_hours }
            | VerifyResult::Verified { owner, total_hours } => (Some(owner), Some(total_hours)),
            _ => (None, None),
        };

        Self {
            success,
            message,
            owner,
            total_hours,
        }
    }
}

/// Convert a verification outcome into an HTTP response.
///
/// # Status Code Mapping
///
/// - `Activated`, `Verified` → 200 OK
/// - `Expired`, `DeviceMismatch`, `InvalidKey` → 403 Forbidden
/// - `InvalidInput` → 400 Bad Request
/// - `InternalError` → 500 Internal Server Error (generic message only)
impl IntoResponse for VerifyResult {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(VerifyResponse::from(self))).into_response()
    }
}
