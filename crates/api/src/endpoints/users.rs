//! Owner account endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use canvass_common::AppResult;
use canvass_core::{CreateUserInput, ListScope};
use canvass_db::entities::user;

use crate::middleware::AppState;

/// List all accounts.
///
/// This is the unscoped administrative listing (`ListScope::Admin`), kept
/// distinct from the owner-scoped listings used everywhere else.
async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<user::Model>>> {
    let users = state.user_service.list(ListScope::Admin).await?;
    Ok(Json(users))
}

/// Create a new owner account.
async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<user::Model>)> {
    let user = state.user_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get an account by id.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<user::Model>> {
    let user = state.user_service.get(&id).await?;
    Ok(Json(user))
}

/// Delete an account, cascading to its forms, sections and stats.
async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    state.user_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).delete(remove))
}
