//! Bundle scanning, entry-point rendering, and manifest versioning.

use crate::models::manifest::{FileEntry, Manifest};
use crate::utils::checksum;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use walkdir::WalkDir;

/// Name of the application entry point within the bundle root.
pub const APP_ENTRY: &str = "app.js";

/// Placeholder substituted with the deployment environment name.
const ENV_PLACEHOLDER: &str = "{{environment}}";

/// Version served when pinned (production).
const PINNED_VERSION: &str = "1.1.0";

/// Diagnostic note included with every manifest.
const MANIFEST_MESSAGE: &str = "The version updates every second when not in production";

/// How manifest versions are stamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionMode {
    /// Fixed literal, so clients can exercise their redundant-update
    /// skip logic.
    Pinned,
    /// Derived from the current unix time in whole seconds; any two
    /// polls more than a second apart observe different versions.
    Clock,
}

/// Immutable result of one bundle scan. Replaced only by restart.
pub struct BundleSnapshot {
    /// Manifest file entries, keyed by bundle-relative path.
    pub files: HashMap<String, FileEntry>,
    /// Rendered application entry (environment substituted).
    pub app_entry: Vec<u8>,
}

/// Scan the bundle root and produce a snapshot.
///
/// The app entry is rendered before hashing so its checksum reflects
/// the bytes actually served, not the template. Any unreadable file
/// aborts the build; a partial manifest is never produced.
pub fn build_snapshot(www_dir: &Path, environment: &str) -> Result<BundleSnapshot> {
    tracing::info!("Building manifest from {}", www_dir.display());

    let mut files = HashMap::new();
    let mut app_entry = Vec::new();

    for entry in WalkDir::new(www_dir) {
        let entry = entry.with_context(|| format!("scanning {}", www_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(www_dir)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");

        let data = std::fs::read(entry.path())
            .with_context(|| format!("reading {}", entry.path().display()))?;
        let data = if rel == APP_ENTRY {
            let rendered = render_app_entry(&data, environment)?;
            app_entry = rendered.clone();
            rendered
        } else {
            data
        };

        files.insert(
            rel.clone(),
            FileEntry {
                checksum: Some(checksum::md5_hex(&data)),
                destination: rel.clone(),
                source: format!("/{}", rel),
            },
        );
    }

    tracing::info!("Manifest built ({} files)", files.len());
    Ok(BundleSnapshot { files, app_entry })
}

/// Substitute the environment placeholder in the entry template.
fn render_app_entry(template: &[u8], environment: &str) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(template).context("app entry template is not valid UTF-8")?;
    Ok(text.replace(ENV_PLACEHOLDER, environment).into_bytes())
}

/// Version string for one request under the given mode.
pub fn version_string(mode: VersionMode, now_unix: i64) -> String {
    match mode {
        VersionMode::Pinned => PINNED_VERSION.to_string(),
        VersionMode::Clock => format!("1.1.{}", now_unix),
    }
}

/// Assemble the manifest document served for one request. The files
/// map comes from the cached snapshot; the version is stamped fresh.
pub fn manifest_for(snapshot: &BundleSnapshot, mode: VersionMode) -> Manifest {
    Manifest {
        version: version_string(mode, chrono::Utc::now().timestamp()),
        message: MANIFEST_MESSAGE.to_string(),
        files: snapshot.files.clone(),
        // The producer never emits assets; they are a consumer-side
        // concern.
        assets: Vec::new(),
    }
}
