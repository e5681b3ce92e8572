//! Stat repository.
//!
//! Holds the concurrency-sensitive counter path: a stat row is created
//! race-free through the unique `(section_id, option_value)` index and
//! incremented with a single atomic UPDATE. A fetched-model
//! read-modify-write is never used here.

use std::sync::Arc;

use crate::entities::{Stat, stat};
use canvass_common::{AppError, AppResult, IdGenerator};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
    sea_query::{Expr, OnConflict},
};

/// Stat repository for database operations.
#[derive(Clone)]
pub struct StatRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl StatRepository {
    /// Create a new stat repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Load all stat rows for a form.
    pub async fn find_by_form(&self, form_id: &str) -> AppResult<Vec<stat::Model>> {
        Stat::find()
            .filter(stat::Column::FormId.eq(form_id))
            .order_by_asc(stat::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Apply one submission's selections as a single transaction.
    ///
    /// Each `(section_id, value)` occurrence increments its counter by
    /// exactly one. All increments commit or none do.
    pub async fn record_selections(
        &self,
        form_id: &str,
        selections: &[(String, Vec<String>)],
    ) -> AppResult<()> {
        if selections.iter().all(|(_, values)| values.is_empty()) {
            return Ok(());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for (section_id, values) in selections {
            for value in values {
                self.bump(&txn, form_id, section_id, value).await?;
            }
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete stat rows whose section is no longer part of the form.
    ///
    /// Returns the number of rows purged.
    pub async fn delete_orphaned(
        &self,
        form_id: &str,
        live_section_ids: &[String],
    ) -> AppResult<u64> {
        let mut query = Stat::delete_many().filter(stat::Column::FormId.eq(form_id));

        if !live_section_ids.is_empty() {
            query = query.filter(stat::Column::SectionId.is_not_in(live_section_ids.to_vec()));
        }

        let result = query
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Upsert-and-increment one counter (single writer wins row creation).
    ///
    /// Seeds the row at count 0 with `ON CONFLICT DO NOTHING`, then applies
    /// `count = count + 1` as one UPDATE. Two concurrent first votes race on
    /// the unique index; the loser's insert is a no-op and both increments
    /// land.
    async fn bump<C: ConnectionTrait>(
        &self,
        conn: &C,
        form_id: &str,
        section_id: &str,
        value: &str,
    ) -> AppResult<()> {
        let seed = stat::ActiveModel {
            id: Set(self.id_gen.generate()),
            form_id: Set(form_id.to_string()),
            section_id: Set(section_id.to_string()),
            option_value: Set(value.to_string()),
            count: Set(0),
        };

        Stat::insert(seed)
            .on_conflict(
                OnConflict::columns([stat::Column::SectionId, stat::Column::OptionValue])
                    .do_nothing()
                    .to_owned(),
            )
            .do_nothing()
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Stat::update_many()
            .col_expr(stat::Column::Count, Expr::col(stat::Column::Count).add(1))
            .filter(stat::Column::SectionId.eq(section_id))
            .filter(stat::Column::OptionValue.eq(value))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
