//! Create stat table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // section_id deliberately has no foreign key: stat rows outlive
        // section replacement (orphan retention policy).
        manager
            .create_table(
                Table::create()
                    .table(Stat::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stat::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Stat::FormId).string_len(32).not_null())
                    .col(ColumnDef::new(Stat::SectionId).string_len(32).not_null())
                    .col(ColumnDef::new(Stat::OptionValue).string_len(512).not_null())
                    .col(
                        ColumnDef::new(Stat::Count)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stat_form")
                            .from(Stat::Table, Stat::FormId)
                            .to(Form::Table, Form::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (section_id, option_value) - arbitrates concurrent
        // first votes for the same option
        manager
            .create_index(
                Index::create()
                    .name("idx_stat_section_option")
                    .table(Stat::Table)
                    .col(Stat::SectionId)
                    .col(Stat::OptionValue)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: form_id (for the per-form stats projection)
        manager
            .create_index(
                Index::create()
                    .name("idx_stat_form_id")
                    .table(Stat::Table)
                    .col(Stat::FormId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Stat::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Stat {
    Table,
    Id,
    FormId,
    SectionId,
    OptionValue,
    Count,
}

#[derive(Iden)]
enum Form {
    Table,
    Id,
}
