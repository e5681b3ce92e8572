//! Authentication endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use canvass_common::AppResult;
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState};

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Verify credentials and issue a bearer token (plain text body).
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<String> {
    state.auth_service.login(&req.email, &req.password).await
}

/// Confirm the presented token is valid.
async fn check(AuthUser(user): AuthUser) -> String {
    format!("Token is valid for user: {}", user.email)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/check", get(check))
}
