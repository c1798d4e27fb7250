use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Versions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Versions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Versions::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Versions::Description).string())
                    .col(
                        ColumnDef::new(Versions::ApprovalStatus)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Versions::RejectionNote).string())
                    .col(ColumnDef::new(Versions::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Versions::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Versions::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_versions_approval_status")
                    .table(Versions::Table)
                    .col(Versions::ApprovalStatus)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_versions_approval_status").to_owned())
            .await
            .ok();

        manager
            .drop_table(Table::drop().table(Versions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum Versions {
    Table,
    Id,
    Name,
    Description,
    ApprovalStatus,
    RejectionNote,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
