//! API endpoints.

mod auth;
mod forms;
mod public;
mod stats;
mod users;

use axum::Router;

use crate::middleware::AppState;

pub(crate) use forms::FormResponse;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/forms", forms::router())
        .nest("/public", public::router())
        .nest("/stats", stats::router())
}
