//! Hardware identifier fingerprinting.
//!
//! Raw HWIDs are never stored or logged. Only the fingerprint is persisted
//! and compared.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the SHA-256 digest.
///
/// Existing keys files hold fingerprints of this length, so it must not change.
pub const FINGERPRINT_LEN: usize = 16;

/// Derive the stored fingerprint of a raw hardware identifier.
///
/// SHA-256 over the UTF-8 bytes, hex encoded, truncated to
/// [`FINGERPRINT_LEN`] characters.
pub fn fingerprint(raw_hwid: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_hwid.as_bytes());

    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(FINGERPRINT_LEN);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_truncated_sha256_hex() {
        // sha256("password") = 5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8
        assert_eq!(fingerprint("password"), "5e884898da280471");
    }

    #[test]
    fn fingerprint_is_deterministic_and_fixed_length() {
        let a = fingerprint("BFEBFBFF000906EA");
        let b = fingerprint("BFEBFBFF000906EA");

        assert_eq!(a, b);
        assert_eq!(a.len(), FINGERPRINT_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn different_hwids_differ() {
        assert_ne!(fingerprint("deviceX"), fingerprint("deviceY"));
    }

    #[test]
    fn empty_input_still_has_a_fingerprint() {
        // sha256("") = e3b0c44298fc1c149afbf4c8996fb924...
        assert_eq!(fingerprint(""), "e3b0c44298fc1c14");
    }
}
