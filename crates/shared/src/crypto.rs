//! Hashing helpers for admin API keys.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks whether `input` hashes to the expected SHA-256 hex digest.
///
/// The comparison is case-insensitive on the expected digest.
pub fn matches_sha256_hex(input: &str, expected_hex: &str) -> bool {
    !expected_hex.is_empty() && sha256_hex(input).eq_ignore_ascii_case(expected_hex.trim())
}
