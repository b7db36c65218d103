//! The update pipeline: manifest → plan → fetch → install.
//!
//! One pass runs to completion or failure; there is no retry at any
//! layer. The invoking scheduler is expected to rerun the whole pass
//! on its own cadence.

use crate::config::Config;
use crate::fetcher;
use crate::installer;
use crate::manifest::Manifest;
use crate::planner;
use crate::rewrite::PathRewriter;
use crate::transport::Transport;
use crate::utils::errors::UpdateError;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

/// Marker file recording the last installed manifest version.
const VERSION_MARKER: &str = ".ota-version";

/// Everything a single update pass needs.
pub struct UpdateContext {
    pub config: Config,
    /// Bundle root files are installed into.
    pub bundle_dir: PathBuf,
    /// Content-addressed cache for external assets.
    pub cache_dir: PathBuf,
}

/// Outcome of a completed pass.
#[derive(Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The served version matches the installed one; nothing fetched.
    AlreadyCurrent { version: String },
    /// The pass ran; `installed` counts files actually written.
    Updated { version: String, installed: usize },
}

/// Run one update pass against the configured server.
pub async fn run<T: Transport>(transport: &T, ctx: &UpdateContext) -> Result<UpdateOutcome> {
    let base_url = ctx.config.base_url()?;

    let manifest = load_manifest(transport, &base_url, &ctx.config.manifest_path).await?;
    info!(
        "Loaded manifest version {} ({} files, {} assets)",
        manifest.version,
        manifest.files.len(),
        manifest.assets.len()
    );

    if installed_version(&ctx.bundle_dir).as_deref() == Some(manifest.version.as_str()) {
        info!("Bundle already at version {}, skipping update", manifest.version);
        return Ok(UpdateOutcome::AlreadyCurrent {
            version: manifest.version,
        });
    }

    let tasks = planner::plan(&manifest, &ctx.bundle_dir, &ctx.cache_dir)?;
    info!("Fetching {} files", tasks.len());

    let rewriter = PathRewriter::new(&ctx.config.rewrite_prefixes());
    let files = fetcher::fetch_all(transport, &base_url, &rewriter, tasks).await?;

    installer::install(&files).await?;
    record_version(&ctx.bundle_dir, &manifest.version)?;

    info!(
        "Update to version {} complete ({} files installed)",
        manifest.version,
        files.len()
    );
    Ok(UpdateOutcome::Updated {
        version: manifest.version,
        installed: files.len(),
    })
}

async fn load_manifest<T: Transport>(
    transport: &T,
    base_url: &Url,
    manifest_path: &str,
) -> Result<Manifest> {
    let url = base_url.join(manifest_path)?;
    let response = transport.get(url.as_str()).await?;
    if !response.is_success() {
        return Err(UpdateError::ManifestFetch(format!(
            "{} returned status {}",
            url, response.status
        )));
    }
    serde_json::from_slice(&response.body)
        .map_err(|e| UpdateError::ManifestFetch(format!("malformed manifest from {}: {}", url, e)))
}

fn installed_version(bundle_dir: &Path) -> Option<String> {
    std::fs::read_to_string(bundle_dir.join(VERSION_MARKER))
        .ok()
        .map(|s| s.trim().to_string())
}

fn record_version(bundle_dir: &Path, version: &str) -> Result<()> {
    std::fs::create_dir_all(bundle_dir)?;
    std::fs::write(bundle_dir.join(VERSION_MARKER), version)?;
    Ok(())
}
