//! Manifest document types — the wire format served as `manifest.json`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Versioned description of the bundle. Clients treat any change in
/// `version` as "update available".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub message: String,
    pub files: HashMap<String, FileEntry>,
    pub assets: Vec<String>,
}

/// A single file in the bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// MD5 of the content as served, or `None` to skip verification.
    pub checksum: Option<String>,
    /// Install path, relative to the bundle root.
    pub destination: String,
    /// Fetch path, relative to the server root.
    pub source: String,
}
