//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use canvass_core::{AuthService, FormService, SeedService, StatsService, SubmissionService, UserService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// Owner account service.
    pub user_service: UserService,
    /// Token issue/verify service.
    pub auth_service: AuthService,
    /// Form CRUD service.
    pub form_service: FormService,
    /// Anonymous submission aggregation.
    pub submission_service: SubmissionService,
    /// Owner stats projection.
    pub stats_service: StatsService,
    /// Demo data seeding.
    pub seed_service: SeedService,
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` to a user model in the request
/// extensions. Verification failures leave the extensions untouched; the
/// `AuthUser` extractor turns that into a 401 on protected routes.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(email) = state.auth_service.verify(token)
        && let Ok(Some(user)) = state.user_service.find_by_email(&email).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
