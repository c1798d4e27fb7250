use sea_orm_migration::prelude::*;

use super::m001_create_versions::Versions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Jobs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Jobs::JobType).string().not_null())
                    .col(
                        ColumnDef::new(Jobs::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Jobs::VersionId).integer())
                    .col(ColumnDef::new(Jobs::TaskId).string())
                    .col(
                        ColumnDef::new(Jobs::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Jobs::TotalRows)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Jobs::ProcessedRows)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Jobs::Result).text())
                    .col(ColumnDef::new(Jobs::ErrorMessage).text())
                    .col(ColumnDef::new(Jobs::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Jobs::StartedAt).timestamp())
                    .col(ColumnDef::new(Jobs::CompletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_jobs_version_id")
                            .from(Jobs::Table, Jobs::VersionId)
                            .to(Versions::Table, Versions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_jobs_status")
                    .table(Jobs::Table)
                    .col(Jobs::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_jobs_task_id")
                    .table(Jobs::Table)
                    .col(Jobs::TaskId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_jobs_task_id").to_owned())
            .await
            .ok();
        manager
            .drop_index(Index::drop().name("idx_jobs_status").to_owned())
            .await
            .ok();

        manager
            .drop_table(Table::drop().table(Jobs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Jobs {
    Table,
    Id,
    JobType,
    Status,
    VersionId,
    TaskId,
    Attempts,
    TotalRows,
    ProcessedRows,
    Result,
    ErrorMessage,
    CreatedAt,
    StartedAt,
    CompletedAt,
}
