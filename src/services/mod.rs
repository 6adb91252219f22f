//! Business logic services.
//!
//! Services contain the key lifecycle rules, separated from HTTP handlers.
//! `hwid` and `expiry` are pure; `verification_service` is the only code
//! that writes to the key store.

pub mod expiry;
pub mod hwid;
pub mod verification_service;
