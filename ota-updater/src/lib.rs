//! OTA Updater Library
//!
//! Fetches a published bundle manifest, diffs it against the local
//! content, retrieves changed files with bounded parallelism, verifies
//! checksums, rewrites absolute path references, and installs the
//! result.

pub mod checksum;
pub mod config;
pub mod fetcher;
pub mod installer;
pub mod manifest;
pub mod pipeline;
pub mod planner;
pub mod rewrite;
pub mod transport;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use utils::errors::UpdateError;
pub type Result<T> = std::result::Result<T, UpdateError>;
