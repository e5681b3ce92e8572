//! Section (survey question) entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "section")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    #[serde(skip_serializing)]
    pub form_id: String,

    pub title: String,

    /// Single-choice or multi-choice
    pub kind: SectionKind,

    pub is_required: bool,

    /// Option labels (JSON array of strings, declaration order preserved)
    #[sea_orm(column_type = "Json")]
    pub options: JsonValue,

    /// Render position within the form
    pub position: i32,
}

/// Section answer kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum SectionKind {
    /// Single-choice question
    #[sea_orm(string_value = "RADIO_BOX")]
    #[serde(rename = "RADIO_BOX")]
    RadioBox,

    /// Multi-choice question
    #[sea_orm(string_value = "CHECK_BOX")]
    #[serde(rename = "CHECK_BOX")]
    CheckBox,
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

impl Model {
    /// Option labels in declaration order.
    ///
    /// Duplicate labels are legal; they share one stat bucket.
    #[must_use]
    pub fn option_values(&self) -> Vec<String> {
        serde_json::from_value(self.options.clone()).unwrap_or_default()
    }
}
