//! Stats endpoints (owner-scoped).

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use canvass_common::AppResult;
use canvass_core::FormStats;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState};

/// Result of an orphaned-stats purge.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeResponse {
    pub purged: u64,
}

/// Project a form's aggregated results for its owner.
async fn show(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> AppResult<Json<FormStats>> {
    let stats = state.stats_service.project(&form_id, &user).await?;
    Ok(Json(stats))
}

/// Purge stat rows left behind by section replacement.
async fn purge_orphaned(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> AppResult<Json<PurgeResponse>> {
    let purged = state.stats_service.purge_orphaned(&form_id, &user).await?;
    Ok(Json(PurgeResponse { purged }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{formId}", get(show))
        .route("/{formId}/orphaned", delete(purge_orphaned))
}
