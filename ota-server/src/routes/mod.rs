pub mod bundle;

use crate::state::AppState;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    let www_dir = state.config.www_dir.clone();

    Router::new()
        .route("/manifest.json", get(bundle::serve_manifest))
        .route("/app.js", get(bundle::serve_app_entry))
        .fallback_service(ServeDir::new(&www_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
