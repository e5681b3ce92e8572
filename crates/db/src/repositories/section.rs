//! Section repository.

use std::sync::Arc;

use crate::entities::{Section, section};
use canvass_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Section repository for database operations.
#[derive(Clone)]
pub struct SectionRepository {
    db: Arc<DatabaseConnection>,
}

impl SectionRepository {
    /// Create a new section repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a section by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<section::Model>> {
        Section::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a form's sections in declared (render) order.
    pub async fn find_by_form(&self, form_id: &str) -> AppResult<Vec<section::Model>> {
        Section::find()
            .filter(section::Column::FormId.eq(form_id))
            .order_by_asc(section::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
