//! Create section table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Section::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Section::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Section::FormId).string_len(32).not_null())
                    .col(ColumnDef::new(Section::Title).string_len(512).not_null())
                    .col(ColumnDef::new(Section::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Section::IsRequired)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Section::Options).json_binary().not_null())
                    .col(ColumnDef::new(Section::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_section_form")
                            .from(Section::Table, Section::FormId)
                            .to(Form::Table, Form::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: form_id (for loading a form's sections in order)
        manager
            .create_index(
                Index::create()
                    .name("idx_section_form_id")
                    .table(Section::Table)
                    .col(Section::FormId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Section::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Section {
    Table,
    Id,
    FormId,
    Title,
    Kind,
    IsRequired,
    Options,
    Position,
}

#[derive(Iden)]
enum Form {
    Table,
    Id,
}
