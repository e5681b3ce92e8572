//! Stat entity: one aggregated counter per (section, option value) pair.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stat")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Denormalized from the section's form for per-form queries.
    /// Always equals the owning section's `form_id` at creation time.
    #[sea_orm(indexed)]
    pub form_id: String,

    /// No foreign key: rows survive section replacement (orphan retention)
    #[sea_orm(indexed)]
    pub section_id: String,

    pub option_value: String,

    /// Non-negative vote total
    pub count: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::form::Entity",
        from = "Column::FormId",
        to = "super::form::Column::Id",
        on_delete = "Cascade"
    )]
    Form,
}

impl Related<super::form::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Form.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
