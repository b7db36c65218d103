use crate::config::AppConfig;
use crate::services::bundle::{self, BundleSnapshot};
use std::sync::Arc;
use tokio::sync::OnceCell;

pub struct AppState {
    pub config: AppConfig,
    /// Built once on first request, then immutable until restart.
    snapshot: OnceCell<Arc<BundleSnapshot>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            snapshot: OnceCell::new(),
        }
    }

    /// Single-flight access to the bundle snapshot: concurrent first
    /// requests perform the directory scan exactly once.
    pub async fn bundle(&self) -> anyhow::Result<Arc<BundleSnapshot>> {
        let snapshot = self
            .snapshot
            .get_or_try_init(|| async {
                let www_dir = self.config.www_dir.clone();
                let environment = self.config.environment.clone();
                let snapshot =
                    tokio::task::spawn_blocking(move || bundle::build_snapshot(&www_dir, &environment))
                        .await??;
                Ok::<_, anyhow::Error>(Arc::new(snapshot))
            })
            .await?;
        Ok(snapshot.clone())
    }
}
