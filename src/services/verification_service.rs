//! Verification service - Core business logic for license keys.
//!
//! This service handles:
//! - Input validation
//! - Expiry detection and latching
//! - First-use HWID binding
//! - Device matching on later verifications
//!
//! # Atomicity Guarantees
//!
//! The whole load-decide-save cycle of one verification runs under the key
//! store's exclusive lock. Two concurrent first activations of the same key
//! are therefore serialized: the first binds its device, the second sees
//! the bound fingerprint.

use chrono::{DateTime, Local};
use serde_json::Number;

use crate::error::StoreError;
use crate::models::key_record::{KeyRecord, KeyStatus};
use crate::models::verification::VerifyResult;
use crate::services::expiry::is_expired_at;
use crate::services::hwid::fingerprint;
use crate::store::{KeyStore, LockedStore};

/// Verify a license key for a device.
///
/// # Process
///
/// 1. Trim inputs and reject empty ones (no store access)
/// 2. Lock the store and load all records
/// 3. Find the first record with a matching key
/// 4. Latch expiry, bind an unbound key, or compare fingerprints
/// 5. Persist if the record changed
///
/// # Arguments
///
/// * `store` - Shared key store
/// * `key` - License key presented by the client
/// * `raw_hwid` - Raw hardware identifier of the client device
///
/// # Returns
///
/// The verification outcome. Store failures come back as
/// `VerifyResult::InternalError`; the cause is logged, not returned.
pub fn verify(store: &KeyStore, key: &str, raw_hwid: &str) -> VerifyResult {
    verify_at(store, key, raw_hwid, Local::now())
}

/// Verify a license key as of `now`.
pub fn verify_at(
    store: &KeyStore,
    key: &str,
    raw_hwid: &str,
    now: DateTime<Local>,
) -> VerifyResult {
    let key = key.trim();
    let raw_hwid = raw_hwid.trim();

    if key.is_empty() || raw_hwid.is_empty() {
        return VerifyResult::InvalidInput;
    }

    let hwid_hash = fingerprint(raw_hwid);

    // Lock is released when the closure returns, on every path
    let result = store
        .lock()
        .and_then(|mut locked| decide(&mut locked, key, &hwid_hash, now));

    result.unwrap_or_else(|e| {
        tracing::error!(key, error = %e, "verification failed");
        VerifyResult::InternalError
    })
}

fn decide(
    locked: &mut LockedStore<'_>,
    key: &str,
    hwid_hash: &str,
    now: DateTime<Local>,
) -> Result<VerifyResult, StoreError> {
    let mut records = locked.load_all();

    let Some(record) = records.iter_mut().find(|r| r.key == key) else {
        tracing::warn!(key, "unknown key");
        return Ok(VerifyResult::InvalidKey);
    };

    // Expiry comes from the time fields only; a stale `expired` status does
    // not block a key whose dates were extended
    if is_expired_at(record, now) {
        tracing::warn!(key, owner = record.owner_label(), "key expired");

        record.status = Some(KeyStatus::Expired);
        locked.save_all(&records)?;
        return Ok(VerifyResult::Expired);
    }

    if record.is_unbound() {
        record.hwid = Some(hwid_hash.to_string());
        record.status = Some(KeyStatus::Active);
        let (owner, total_hours) = payload(record);

        locked.save_all(&records)?;
        tracing::info!(key, owner = %owner, "key activated");
        return Ok(VerifyResult::Activated { owner, total_hours });
    }

    if record.hwid.as_deref() == Some(hwid_hash) {
        let (owner, total_hours) = payload(record);
        tracing::info!(key, owner = %owner, "key verified");
        return Ok(VerifyResult::Verified { owner, total_hours });
    }

    tracing::warn!(key, owner = record.owner_label(), "key presented by another device");
    Ok(VerifyResult::DeviceMismatch)
}

fn payload(record: &KeyRecord) -> (String, Number) {
    (record.owner_label().to_string(), record.total_hours())
}
