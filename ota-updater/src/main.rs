//! OTA Updater - Main entry point
//!
//! Runs one update pass against the configured server and exits 0 on
//! success, 1 on any failure.

use clap::Parser;
use ota_updater::pipeline::{self, UpdateContext, UpdateOutcome};
use ota_updater::transport::HttpTransport;
use ota_updater::{utils, Config};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Application root; the bundle is installed under `<root>/www`
    root: PathBuf,

    /// Path to the updater configuration file
    /// (defaults to `<root>/ota-updater.toml`)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Local content cache directory for external assets
    /// (defaults to `<root>/cache`)
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = utils::logger::init(&args.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let config_path = args
        .config
        .unwrap_or_else(|| args.root.join("ota-updater.toml"));
    let config = match Config::from_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("UPDATE FAILED: {}", e);
            std::process::exit(1);
        }
    };

    let ctx = UpdateContext {
        config,
        bundle_dir: args.root.join("www"),
        cache_dir: args.cache_dir.unwrap_or_else(|| args.root.join("cache")),
    };

    tracing::info!(
        "Starting ota-updater v{} (bundle: {})",
        env!("CARGO_PKG_VERSION"),
        ctx.bundle_dir.display()
    );

    let transport = HttpTransport::new();
    match pipeline::run(&transport, &ctx).await {
        Ok(UpdateOutcome::AlreadyCurrent { version }) => {
            tracing::info!("Bundle is current at version {}", version);
        }
        Ok(UpdateOutcome::Updated { version, installed }) => {
            tracing::info!("Updated to version {} ({} files)", version, installed);
        }
        Err(e) => {
            tracing::error!("UPDATE FAILED: {}", e);
            std::process::exit(1);
        }
    }
}
