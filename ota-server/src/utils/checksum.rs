//! Content checksums for the published manifest.
//!
//! MD5 is the manifest protocol's digest; collision avoidance for
//! change detection is all it is asked to provide.

use md5::{Digest, Md5};

/// Compute the MD5 digest of `bytes` as lowercase hex.
pub fn md5_hex(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
