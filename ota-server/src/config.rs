use crate::services::bundle::VersionMode;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub www_dir: PathBuf,
    pub environment: String,
    pub version_mode: VersionMode,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let environment = std::env::var("OTA_ENV").unwrap_or_else(|_| "development".into());
        // The pinned version exists so clients can prove their
        // redundant-update skip against a stable version token.
        let version_mode = if environment == "production" {
            VersionMode::Pinned
        } else {
            VersionMode::Clock
        };

        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            www_dir: PathBuf::from(std::env::var("WWW_DIR").unwrap_or_else(|_| "www".into())),
            environment,
            version_mode,
        }
    }
}
