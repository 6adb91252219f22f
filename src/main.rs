//! License Auth Server - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Open the keys file backend and build the shared key store
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured address

use std::sync::Arc;

use license_auth_server::{
    build_router,
    config::Config,
    store::{JsonFileBackend, KeyStore},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        keys_file = %config.keys_file,
        "Configuration loaded"
    );

    // One store for the whole process; every request goes through its lock
    let backend = JsonFileBackend::new(&config.keys_file);
    let store = Arc::new(KeyStore::new(backend));
    let key_count = {
        let store = Arc::clone(&store);
        tokio::task::spawn_blocking(move || store.load_all().len()).await?
    };
    tracing::info!(keys = key_count, "Key store opened");

    let app = build_router(store);

    // Bind to network address and start server
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
