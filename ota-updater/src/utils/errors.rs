//! Custom error types for the updater.
//!
//! Every stage surfaces failure upward; nothing retries and nothing is
//! swallowed. The binary logs the error and exits non-zero.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Manifest fetch error: {0}")]
    ManifestFetch(String),

    #[error("Error fetching {url}: status {status}")]
    FileFetch { url: String, status: u16 },

    // Named `file` rather than `source` so thiserror does not treat
    // the offending path as an error-source chain.
    #[error("Hash for file {file} \"{actual}\" doesn't match manifest hash \"{expected}\"")]
    Integrity {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("Destination {0} escapes the bundle root")]
    InvalidDestination(String),

    #[error("File {0} is marked for path rewriting but is not valid UTF-8")]
    InvalidText(String),

    #[error("Write error for {path}: {err}")]
    Write { path: String, err: std::io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}
