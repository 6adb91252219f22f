//! License key verification handler.
//!
//! This module implements the client-facing endpoint:
//! - POST /verify - Activate or verify a key for a device

use crate::{
    error::AppError,
    models::verification::{VerifyRequest, VerifyResult},
    services::verification_service,
    store::SharedStore,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

/// Verify a license key.
///
/// # Endpoint
///
/// `POST /verify`
///
/// # Request Body
///
/// ```json
/// {
///   "key": "ICE-7F3A-91BC",
///   "hwid": "BFEBFBFF000906EA-4C4C4544"
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: key activated for, or already bound to, this device
/// - **Error (400)**: key or hwid missing, or body is not JSON
/// - **Error (403)**: key expired, unknown, or bound to another device
/// - **Error (500)**: key store failure
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
/// # Arguments
///
/// * `State(store)` - Shared key store (injected by Axum)
/// * `payload` - JSON request body, or the reason it could not be parsed
///
/// Store work runs on the blocking pool: it holds a std mutex and does
/// file I/O.
pub async fn verify_key(
    State(store): State<SharedStore>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<VerifyResult, AppError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable verify request");
            return Ok(VerifyResult::InvalidInput);
        }
    };

    let result = tokio::task::spawn_blocking(move || {
        verification_service::verify(&store, &request.key, &request.hwid)
    })
    .await?;

    Ok(result)
}
