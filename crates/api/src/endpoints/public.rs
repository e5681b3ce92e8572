//! Public endpoints: form rendering and anonymous submission.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use canvass_common::AppResult;
use canvass_core::SubmissionInput;

use crate::middleware::AppState;

use super::FormResponse;

/// Render a form to an anonymous respondent.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FormResponse>> {
    let form = state.form_service.get_public(&id).await?;
    Ok(Json(form.into()))
}

/// Accept an anonymous submission.
///
/// Always acknowledges with 200 when the form exists; answers for unknown
/// or foreign sections are dropped without surfacing anything to the
/// caller.
async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SubmissionInput>,
) -> AppResult<StatusCode> {
    state.submission_service.submit(&id, input).await?;
    Ok(StatusCode::OK)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(show).post(submit))
}
