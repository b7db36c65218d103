//! Content checksums for change detection.
//!
//! The manifest protocol uses MD5 purely to detect changed content,
//! not for cryptographic integrity.

use md5::{Digest, Md5};

/// Compute the MD5 digest of `bytes` as lowercase hex.
pub fn md5_hex(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Check `bytes` against an expected digest.
///
/// The expected digest is normalized to lowercase first so a producer
/// emitting uppercase hex never causes a false mismatch.
pub fn matches(bytes: &[u8], expected: &str) -> bool {
    md5_hex(bytes) == expected.to_ascii_lowercase()
}
