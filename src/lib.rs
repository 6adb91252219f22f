//! License key activation server.
//!
//! Clients present a license key and a hardware identifier; the first
//! device to present a key is bound to it, every other device is rejected,
//! and expired keys are latched as expired.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Storage**: JSON keys file behind one exclusive lock
//! - **Binding**: truncated SHA-256 fingerprint of the hardware identifier
//! - **Format**: JSON requests/responses, HTML admin page

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod store;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::store::SharedStore;

/// Build the HTTP router.
///
/// All routes are public. CORS is open to any origin because the license
/// check is called from client applications on arbitrary hosts.
pub fn build_router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(handlers::health::service_info))
        .route("/health", get(handlers::health::health_check))
        .route("/verify", post(handlers::verify::verify_key))
        .route("/admin", get(handlers::admin::admin_page))
        // Allow cross-origin calls from any client
        .layer(CorsLayer::permissive())
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share the key store with all handlers via State extraction
        .with_state(store)
}
