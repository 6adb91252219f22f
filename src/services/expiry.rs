//! Key expiry evaluation.
//!
//! Two record schemas are in circulation: older keys carry `expiry` as epoch
//! seconds, newer ones carry `expire_at` as a local timestamp string. Both
//! are honoured, and either one alone is enough to expire a key.

use chrono::{DateTime, Local, NaiveDateTime};
use serde_json::Number;

use crate::models::key_record::KeyRecord;

/// Format of the `expire_at` field.
pub const EXPIRE_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether the record is expired right now.
pub fn is_expired(record: &KeyRecord) -> bool {
    is_expired_at(record, Local::now())
}

/// Whether the record is expired at `now`.
pub fn is_expired_at(record: &KeyRecord, now: DateTime<Local>) -> bool {
    expired_by_timestamp(record, &now) || expired_by_epoch(record, &now)
}

// An unparseable `expire_at` disables this rule instead of failing.
fn expired_by_timestamp(record: &KeyRecord, now: &DateTime<Local>) -> bool {
    record
        .expire_at
        .as_deref()
        .and_then(|raw| NaiveDateTime::parse_from_str(raw, EXPIRE_AT_FORMAT).ok())
        .is_some_and(|expire_at| now.naive_local() > expire_at)
}

// Compared as fractional seconds; older tools wrote `expiry` as a float.
fn expired_by_epoch(record: &KeyRecord, now: &DateTime<Local>) -> bool {
    match record.expiry.as_ref().and_then(Number::as_f64) {
        Some(expiry) if expiry != 0.0 => now.timestamp_millis() as f64 / 1000.0 > expiry,
        _ => false,
    }
}
