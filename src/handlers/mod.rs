//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, shared store)
//! 2. Hands store work to the blocking pool
//! 3. Returns HTTP response (JSON or HTML, status code)

/// Read-only admin page
pub mod admin;
/// Service descriptor and health check
pub mod health;
/// Key verification endpoint
pub mod verify;
