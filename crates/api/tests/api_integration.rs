//! API integration tests.
//!
//! These tests drive the router end to end over a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router, middleware,
    body::Body,
    http::{Request, StatusCode},
};
use canvass_api::{middleware::AppState, router as api_router};
use canvass_common::config::{AuthConfig, Config, DatabaseConfig, SeedConfig, ServerConfig};
use canvass_core::{
    AuthService, FormService, SeedService, StatsService, SubmissionService, UserService,
};
use canvass_db::entities::{form, section, section::SectionKind, user};
use canvass_db::repositories::{
    FormRepository, SectionRepository, StatRepository, UserRepository,
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test configuration.
fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 10,
            min_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: "test-secret".to_string(),
            issuer: "https://canvass.test/issuer".to_string(),
            token_ttl_secs: 3600,
        },
        seed: SeedConfig::default(),
    }
}

/// Create test app state over the given mock connection.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);
    let config = create_test_config();

    let user_repo = UserRepository::new(Arc::clone(&db));
    let form_repo = FormRepository::new(Arc::clone(&db));
    let section_repo = SectionRepository::new(Arc::clone(&db));
    let stat_repo = StatRepository::new(Arc::clone(&db));

    let user_service = UserService::new(user_repo.clone());
    let auth_service = AuthService::new(user_repo.clone(), &config);
    let form_service = FormService::new(form_repo.clone(), section_repo.clone());
    let submission_service =
        SubmissionService::new(form_repo.clone(), section_repo.clone(), stat_repo.clone());
    let stats_service = StatsService::new(form_repo, section_repo, stat_repo);
    let seed_service = SeedService::new(user_service.clone(), form_service.clone());

    AppState {
        user_service,
        auth_service,
        form_service,
        submission_service,
        stats_service,
        seed_service,
    }
}

/// Build the full router with the auth middleware applied.
fn app(state: AppState) -> Router {
    api_router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            canvass_api::middleware::auth_middleware,
        ))
        .with_state(state)
}

fn test_user(id: &str, email: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$test".to_string(),
        created_at: Utc::now().into(),
    }
}

fn test_form(id: &str, user_id: &str) -> form::Model {
    form::Model {
        id: id.to_string(),
        title: "Customer Feedback".to_string(),
        description: "We value your feedback".to_string(),
        user_id: user_id.to_string(),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

#[tokio::test]
async fn test_forms_list_requires_auth() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = app(create_test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/forms")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_form_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<form::Model>::new()])
        .into_connection();
    let app = app(create_test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/public/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_user_validates_email() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = app(create_test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"email": "not-an-email", "password": "Password123"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_auth_check_with_valid_token() {
    // Middleware resolves the bearer token's email claim against the db.
    let owner = test_user("u1", "owner@example.com");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[owner]])
        .into_connection();
    let state = create_test_state(db);
    let token = state.auth_service.issue("owner@example.com").unwrap();
    let app = app(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/check")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_form_of_other_owner_is_forbidden() {
    // Query order: middleware user lookup, then the form lookup.
    let caller = test_user("u2", "other@example.com");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[caller]])
        .append_query_results([[test_form("f1", "u1")]])
        .into_connection();
    let state = create_test_state(db);
    let token = state.auth_service.issue("other@example.com").unwrap();
    let app = app(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/forms/f1")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_form_is_not_found_before_ownership() {
    let caller = test_user("u2", "other@example.com");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[caller]])
        .append_query_results([Vec::<form::Model>::new()])
        .into_connection();
    let state = create_test_state(db);
    let token = state.auth_service.issue("other@example.com").unwrap();
    let app = app(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/forms/missing")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submission_with_unknown_section_still_acknowledged() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_form("f1", "u1")]])
        .append_query_results([Vec::<section::Model>::new()])
        .into_connection();
    let app = app(create_test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/public/f1")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"answers": [{"sectionId": "gone", "values": ["Good"]}]}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_public_form_render_includes_sections() {
    let sections = vec![section::Model {
        id: "s1".to_string(),
        form_id: "f1".to_string(),
        title: "Rate our service".to_string(),
        kind: SectionKind::RadioBox,
        is_required: true,
        options: json!(["Excellent", "Good", "Poor"]),
        position: 0,
    }];

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_form("f1", "u1")]])
        .append_query_results([sections])
        .into_connection();
    let app = app(create_test_state(db));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/public/f1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
