//! Form repository.

use std::sync::Arc;

use crate::entities::{Form, Section, form, section};
use canvass_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

/// Form repository for database operations.
#[derive(Clone)]
pub struct FormRepository {
    db: Arc<DatabaseConnection>,
}

impl FormRepository {
    /// Create a new form repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a form by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<form::Model>> {
        Form::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a form by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<form::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::FormNotFound(id.to_string()))
    }

    /// List forms owned by a user, oldest first.
    pub async fn list_by_owner(&self, user_id: &str) -> AppResult<Vec<form::Model>> {
        Form::find()
            .filter(form::Column::UserId.eq(user_id))
            .order_by_asc(form::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a form together with its sections in one transaction.
    ///
    /// Either both the form row and every section row commit, or nothing
    /// does; a section write failure never leaves an empty form behind.
    pub async fn create_with_sections(
        &self,
        form: form::ActiveModel,
        sections: Vec<section::ActiveModel>,
    ) -> AppResult<form::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = form
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Section::insert_many(sections)
            .on_empty_do_nothing()
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }

    /// Update a form and wholesale-replace its section set in one
    /// transaction.
    ///
    /// The old sections are deleted and the new set inserted atomically
    /// with the form update. Stat rows referencing the removed sections
    /// are left in place (orphan retention).
    pub async fn update_with_sections(
        &self,
        form: form::ActiveModel,
        form_id: &str,
        sections: Vec<section::ActiveModel>,
    ) -> AppResult<form::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let updated = form
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Section::delete_many()
            .filter(section::Column::FormId.eq(form_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Section::insert_many(sections)
            .on_empty_do_nothing()
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(updated)
    }
}
