//! Fetch planning: flatten a manifest into concrete fetch tasks and
//! drop work the local bundle already has.

use crate::checksum;
use crate::manifest::Manifest;
use crate::utils::errors::UpdateError;
use crate::Result;
use std::path::{Component, Path, PathBuf};

/// Suffix for content-addressed asset cache files.
const ASSET_SUFFIX: &str = ".persist";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Fetched relative to the manifest base URL, checksummed.
    Bundle,
    /// Fetched verbatim from an absolute URL, never checksummed.
    Asset,
}

/// One unit of fetch work.
#[derive(Debug, Clone)]
pub struct FetchTask {
    pub source: String,
    pub destination: PathBuf,
    pub checksum: Option<String>,
    pub kind: TaskKind,
}

/// Cache filename for an external asset URL: MD5 of the URL with its
/// scheme stripped, uppercased, plus `.persist`.
///
/// Assets are identified by URL, not content, so identical URLs always
/// map to the identical cache file.
pub fn asset_cache_name(url: &str) -> String {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    format!(
        "{}{}",
        checksum::md5_hex(without_scheme.as_bytes()).to_uppercase(),
        ASSET_SUFFIX
    )
}

/// Flatten `manifest.files` and `manifest.assets` into fetch tasks.
///
/// Every destination must stay confined to the bundle root; a manifest
/// entry that points outside it fails the whole plan. Bundle entries
/// whose destination already holds content with a matching digest are
/// skipped; their bytes are already in place. Asset entries are always
/// fetched. Task order carries no meaning.
pub fn plan(manifest: &Manifest, bundle_root: &Path, cache_dir: &Path) -> Result<Vec<FetchTask>> {
    let mut tasks = Vec::with_capacity(manifest.files.len() + manifest.assets.len());

    for entry in manifest.files.values() {
        validate_destination(&entry.destination)?;
        let destination = bundle_root.join(&entry.destination);
        if let Some(expected) = &entry.checksum {
            if is_unchanged(&destination, expected) {
                tracing::debug!("Skipping unchanged file: {}", entry.destination);
                continue;
            }
        }
        tasks.push(FetchTask {
            source: entry.source.clone(),
            destination,
            checksum: entry.checksum.clone(),
            kind: TaskKind::Bundle,
        });
    }

    for url in &manifest.assets {
        tasks.push(FetchTask {
            source: url.clone(),
            destination: cache_dir.join(asset_cache_name(url)),
            checksum: None,
            kind: TaskKind::Asset,
        });
    }

    Ok(tasks)
}

/// Reject destinations that would leave the bundle root: absolute
/// paths, and any `..` component.
fn validate_destination(destination: &str) -> Result<()> {
    let path = Path::new(destination);
    let confined = !path.is_absolute()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if confined {
        Ok(())
    } else {
        Err(UpdateError::InvalidDestination(destination.to_string()))
    }
}

fn is_unchanged(destination: &Path, expected: &str) -> bool {
    match std::fs::read(destination) {
        Ok(bytes) => checksum::matches(&bytes, expected),
        Err(_) => false,
    }
}
