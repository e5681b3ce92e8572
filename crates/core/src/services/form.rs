//! Form service: survey creation, update and owner-scoped reads.

use canvass_common::{AppError, AppResult, IdGenerator};
use canvass_db::{
    entities::{form, section, section::SectionKind, user},
    repositories::{FormRepository, SectionRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

/// Form service for business logic.
#[derive(Clone)]
pub struct FormService {
    form_repo: FormRepository,
    section_repo: SectionRepository,
    id_gen: IdGenerator,
}

/// One section definition within a create/update request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSpec {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Input for creating or replacing a form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

/// A form together with its ordered sections.
#[derive(Debug, Clone)]
pub struct FormWithSections {
    pub form: form::Model,
    pub sections: Vec<section::Model>,
}

impl FormService {
    /// Create a new form service.
    #[must_use]
    pub const fn new(form_repo: FormRepository, section_repo: SectionRepository) -> Self {
        Self {
            form_repo,
            section_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a form with fresh identifiers, owned by the caller.
    ///
    /// The form row and its sections commit as one transaction; no
    /// partially created form is ever visible.
    pub async fn create(&self, owner: &user::Model, input: CreateFormInput) -> AppResult<FormWithSections> {
        let form_id = self.id_gen.generate();

        let form_model = form::ActiveModel {
            id: Set(form_id.clone()),
            title: Set(input.title),
            description: Set(input.description),
            user_id: Set(owner.id.clone()),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let section_models = self.build_sections(&form_id, &input.sections);
        let created = self
            .form_repo
            .create_with_sections(form_model, section_models)
            .await?;

        let sections = self.section_repo.find_by_form(&form_id).await?;

        info!(form_id = %created.id, owner = %owner.email, "Created form");

        Ok(FormWithSections {
            form: created,
            sections,
        })
    }

    /// Get a form and its sections, enforcing ownership.
    ///
    /// Existence is checked before ownership: an unknown id is `NotFound`
    /// even for a caller who owns nothing.
    pub async fn get_owned(&self, form_id: &str, owner: &user::Model) -> AppResult<FormWithSections> {
        let form = self.form_repo.get_by_id(form_id).await?;
        authorize_owner(&form, owner)?;

        let sections = self.section_repo.find_by_form(form_id).await?;
        Ok(FormWithSections { form, sections })
    }

    /// Get a form and its sections without authentication (public render).
    pub async fn get_public(&self, form_id: &str) -> AppResult<FormWithSections> {
        let form = self.form_repo.get_by_id(form_id).await?;
        let sections = self.section_repo.find_by_form(form_id).await?;
        Ok(FormWithSections { form, sections })
    }

    /// List the caller's forms. Never a global listing.
    pub async fn list_owned(&self, owner: &user::Model) -> AppResult<Vec<form::Model>> {
        self.form_repo.list_by_owner(&owner.id).await
    }

    /// Update a form in place and wholesale-replace its section set.
    ///
    /// Replaced sections get fresh identifiers and start with zero
    /// aggregated stats; stat rows of removed sections are retained but
    /// become unreachable through the current section set. The form
    /// update and the section swap commit as one transaction.
    pub async fn update(
        &self,
        form_id: &str,
        owner: &user::Model,
        input: CreateFormInput,
    ) -> AppResult<FormWithSections> {
        let existing = self.form_repo.get_by_id(form_id).await?;
        authorize_owner(&existing, owner)?;

        let mut active: form::ActiveModel = existing.into();
        active.title = Set(input.title);
        active.description = Set(input.description);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let section_models = self.build_sections(form_id, &input.sections);
        let updated = self
            .form_repo
            .update_with_sections(active, form_id, section_models)
            .await?;

        let sections = self.section_repo.find_by_form(form_id).await?;

        info!(form_id = %updated.id, sections = sections.len(), "Replaced form sections");

        Ok(FormWithSections {
            form: updated,
            sections,
        })
    }

    fn build_sections(&self, form_id: &str, specs: &[SectionSpec]) -> Vec<section::ActiveModel> {
        specs
            .iter()
            .enumerate()
            .map(|(position, spec)| section::ActiveModel {
                id: Set(self.id_gen.generate()),
                form_id: Set(form_id.to_string()),
                title: Set(spec.title.clone()),
                kind: Set(spec.kind),
                is_required: Set(spec.is_required),
                options: Set(json!(spec.options)),
                position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
            })
            .collect()
    }
}

/// Ownership check shared by every owner-scoped form operation.
///
/// The form is known to exist at this point, so a mismatch is `Forbidden`,
/// never `NotFound`.
pub(crate) fn authorize_owner(form: &form::Model, owner: &user::Model) -> AppResult<()> {
    if form.user_id == owner.id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Form belongs to another owner".to_string(),
        ))
    }
}
