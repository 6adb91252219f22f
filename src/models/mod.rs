//! Data models for key records and the verification API.

/// License key record stored in the keys file
pub mod key_record;
/// Verification request/outcome/response types
pub mod verification;
