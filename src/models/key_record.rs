//! License key record model.
//!
//! Key records are provisioned out-of-band into the keys file and mutated
//! only by the verification service. The serialized layout is shared with
//! existing keys files, so absent fields must stay absent when a record is
//! written back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Placeholder stored in `hwid` before a key has been bound to a device.
pub const UNBOUND_HWID: &str = "Waiting...";

/// Owner label reported when a record carries no `owner`.
pub const DEFAULT_OWNER: &str = "User";

/// Entitlement hours reported when a record carries no `total`.
pub const DEFAULT_TOTAL_HOURS: i64 = 24;

/// Lifecycle status cached on a key record.
///
/// This is a display value. Expiry is always recomputed from the time
/// fields, and binding is decided by `hwid` alone. Status strings written by
/// older tools are kept as `Other` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum KeyStatus {
    /// Provisioned but never verified
    #[default]
    Unactivated,

    /// Bound to a device
    Active,

    /// Expiry was detected
    Expired,

    /// Any other stored value, e.g. `"inactive"`
    Other(String),
}

impl KeyStatus {
    pub fn as_str(&self) -> &str {
        match self {
            KeyStatus::Unactivated => "unactivated",
            KeyStatus::Active => "active",
            KeyStatus::Expired => "expired",
            KeyStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for KeyStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "unactivated" => KeyStatus::Unactivated,
            "active" => KeyStatus::Active,
            "expired" => KeyStatus::Expired,
            _ => KeyStatus::Other(raw),
        }
    }
}

impl From<KeyStatus> for String {
    fn from(status: KeyStatus) -> Self {
        match status {
            KeyStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// One issued license key, as stored in the keys file.
///
/// # JSON Example
///
/// ```json
/// {
///     "key": "ICE-7F3A-91BC",
///     "owner": "alice",
///     "status": "active",
///     "hwid": "5e884898da280471",
///     "total": 720,
///     "expire_at": "2026-12-31 23:59:59"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyRecord {
    /// The license key string presented by clients
    #[serde(default)]
    pub key: String,

    /// Display label of the key holder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Cached lifecycle status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<KeyStatus>,

    /// Hashed fingerprint of the bound device
    ///
    /// Absent, empty or [`UNBOUND_HWID`] means the key is not bound yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hwid: Option<String>,

    /// Hours of entitlement, passed through to the client
    ///
    /// Any JSON number is accepted and reported back as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Number>,

    /// Absolute expiry in `%Y-%m-%d %H:%M:%S` (server local time)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_at: Option<String>,

    /// Expiry as epoch seconds, `0` disables this check
    ///
    /// Older tools wrote fractional seconds, so any JSON number is accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<Number>,

    /// Fields written by provisioning tools that this server does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KeyRecord {
    /// Create an unbound, unactivated record with no expiry.
    pub fn new(key: impl Into<String>, owner: impl Into<String>, total: i64) -> Self {
        Self {
            key: key.into(),
            owner: Some(owner.into()),
            status: Some(KeyStatus::Unactivated),
            hwid: Some(UNBOUND_HWID.to_string()),
            total: Some(total.into()),
            ..Self::default()
        }
    }

    /// Whether no device has been bound to this key yet.
    pub fn is_unbound(&self) -> bool {
        match self.hwid.as_deref() {
            None => true,
            Some(hwid) => hwid.is_empty() || hwid == UNBOUND_HWID,
        }
    }

    /// Owner label reported to clients.
    pub fn owner_label(&self) -> &str {
        self.owner.as_deref().unwrap_or(DEFAULT_OWNER)
    }

    /// Entitlement hours reported to clients.
    pub fn total_hours(&self) -> Number {
        self.total
            .clone()
            .unwrap_or_else(|| DEFAULT_TOTAL_HOURS.into())
    }
}
