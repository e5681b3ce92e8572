//! Form endpoints (owner-scoped).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use canvass_common::AppResult;
use canvass_core::{CreateFormInput, FormWithSections};
use canvass_db::entities::section::SectionKind;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::{extractors::AuthUser, middleware::AppState};

/// Form listing entry.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub id: String,
    pub title: String,
}

/// Full form response including sections.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub sections: Vec<SectionResponse>,
}

/// Section within a form response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub is_required: bool,
    pub options: JsonValue,
}

impl From<FormWithSections> for FormResponse {
    fn from(value: FormWithSections) -> Self {
        Self {
            id: value.form.id,
            title: value.form.title,
            description: value.form.description,
            sections: value
                .sections
                .into_iter()
                .map(|s| SectionResponse {
                    id: s.id,
                    title: s.title,
                    kind: s.kind,
                    is_required: s.is_required,
                    options: s.options,
                })
                .collect(),
        }
    }
}

/// List the caller's forms.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<FormSummary>>> {
    let forms = state.form_service.list_owned(&user).await?;

    Ok(Json(
        forms
            .into_iter()
            .map(|f| FormSummary {
                id: f.id,
                title: f.title,
            })
            .collect(),
    ))
}

/// Create a form owned by the caller.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateFormInput>,
) -> AppResult<(StatusCode, Json<FormResponse>)> {
    let created = state.form_service.create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get one of the caller's forms.
async fn show(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FormResponse>> {
    let form = state.form_service.get_owned(&id, &user).await?;
    Ok(Json(form.into()))
}

/// Replace a form's title, description and entire section set.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateFormInput>,
) -> AppResult<Json<FormResponse>> {
    let updated = state.form_service.update(&id, &user, input).await?;
    Ok(Json(updated.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).put(update))
}
