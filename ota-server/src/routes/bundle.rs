use crate::error::AppError;
use crate::services::bundle;
use crate::state::AppState;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

/// `GET /manifest.json` — the bundle manifest with a fresh version
/// stamp.
pub async fn serve_manifest(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.bundle().await?;
    tracing::debug!("Serving manifest ({} files)", snapshot.files.len());
    Ok(Json(bundle::manifest_for(
        &snapshot,
        state.config.version_mode,
    )))
}

/// `GET /app.js` — the rendered application entry point.
pub async fn serve_app_entry(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.bundle().await?;
    Ok((
        [(header::CONTENT_TYPE, "application/javascript")],
        snapshot.app_entry.clone(),
    ))
}
