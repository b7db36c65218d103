//! Manifest document types — the wire format published by the OTA
//! server as `manifest.json`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Versioned description of a bundle.
///
/// Consumers treat any change in `version` as "update available";
/// semantic ordering is not part of the protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    #[serde(default)]
    pub message: String,
    pub files: HashMap<String, FileEntry>,
    #[serde(default)]
    pub assets: Vec<String>,
}

/// A single file in the bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// Expected MD5 of the content, or `None` to skip verification.
    pub checksum: Option<String>,
    /// Install path, relative to the bundle root.
    pub destination: String,
    /// Fetch path, relative to the manifest's base URL unless absolute.
    pub source: String,
}
