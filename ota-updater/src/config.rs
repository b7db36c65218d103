//! Updater configuration.
//!
//! A small key/value resource shipped with the application shell. All
//! three keys are required; a missing or unparsable key is fatal
//! before any network activity starts.

use crate::utils::errors::UpdateError;
use crate::Result;
use serde::Deserialize;
use std::path::Path;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL the manifest and all bundle files are fetched from.
    #[serde(rename = "productionBaseURL")]
    pub production_base_url: String,

    /// Manifest location, relative to the base URL.
    #[serde(rename = "manifestPath")]
    pub manifest_path: String,

    /// Comma-separated path prefixes to rewrite, in order.
    #[serde(rename = "pathPrefixesToRewrite")]
    pub path_prefixes_to_rewrite: String,
}

impl Config {
    /// Load configuration from a key/value file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            UpdateError::Config(format!("could not read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            UpdateError::Config(format!("could not parse {}: {}", path.display(), e))
        })
    }

    /// Parsed base URL.
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.production_base_url)
            .map_err(|e| UpdateError::Config(format!("invalid productionBaseURL: {}", e)))
    }

    /// Rewrite prefixes in configured order; empty entries are dropped.
    pub fn rewrite_prefixes(&self) -> Vec<String> {
        self.path_prefixes_to_rewrite
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}
