use sea_orm_migration::prelude::*;

use super::m001_create_versions::Versions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create staging_brands table
        manager
            .create_table(
                Table::create()
                    .table(StagingBrands::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StagingBrands::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StagingBrands::VersionId).integer().not_null())
                    .col(ColumnDef::new(StagingBrands::Name).string().not_null())
                    .col(ColumnDef::new(StagingBrands::Country).string())
                    .col(ColumnDef::new(StagingBrands::LogoUrl).string())
                    .col(ColumnDef::new(StagingBrands::Manager).string())
                    .col(
                        ColumnDef::new(StagingBrands::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StagingBrands::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staging_brands_version_id")
                            .from(StagingBrands::Table, StagingBrands::VersionId)
                            .to(Versions::Table, Versions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_staging_brands_version_name")
                    .table(StagingBrands::Table)
                    .col(StagingBrands::VersionId)
                    .col(StagingBrands::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create staging_vehicle_lines table
        manager
            .create_table(
                Table::create()
                    .table(StagingVehicleLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StagingVehicleLines::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StagingVehicleLines::BrandId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StagingVehicleLines::Name)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StagingVehicleLines::Description).string())
                    .col(
                        ColumnDef::new(StagingVehicleLines::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StagingVehicleLines::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staging_vehicle_lines_brand_id")
                            .from(StagingVehicleLines::Table, StagingVehicleLines::BrandId)
                            .to(StagingBrands::Table, StagingBrands::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_staging_vehicle_lines_brand_name")
                    .table(StagingVehicleLines::Table)
                    .col(StagingVehicleLines::BrandId)
                    .col(StagingVehicleLines::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create staging_models table
        manager
            .create_table(
                Table::create()
                    .table(StagingModels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StagingModels::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StagingModels::VehicleLineId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StagingModels::Name).string().not_null())
                    .col(ColumnDef::new(StagingModels::Code).string().not_null())
                    .col(ColumnDef::new(StagingModels::ReleaseYear).integer())
                    .col(ColumnDef::new(StagingModels::Price).big_integer())
                    .col(
                        ColumnDef::new(StagingModels::IsForeign)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(StagingModels::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StagingModels::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staging_models_vehicle_line_id")
                            .from(StagingModels::Table, StagingModels::VehicleLineId)
                            .to(StagingVehicleLines::Table, StagingVehicleLines::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // model.code uniqueness is version-wide and enforced by the import
        // and CRUD paths; the line-scoped index covers the common lookup
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_staging_models_line_code")
                    .table(StagingModels::Table)
                    .col(StagingModels::VehicleLineId)
                    .col(StagingModels::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create staging_trims table
        manager
            .create_table(
                Table::create()
                    .table(StagingTrims::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StagingTrims::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StagingTrims::ModelId).integer().not_null())
                    .col(ColumnDef::new(StagingTrims::Name).string().not_null())
                    .col(ColumnDef::new(StagingTrims::CarType).string())
                    .col(ColumnDef::new(StagingTrims::FuelName).string())
                    .col(ColumnDef::new(StagingTrims::Cc).integer())
                    .col(
                        ColumnDef::new(StagingTrims::BasePrice)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(StagingTrims::Description).string())
                    .col(
                        ColumnDef::new(StagingTrims::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StagingTrims::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staging_trims_model_id")
                            .from(StagingTrims::Table, StagingTrims::ModelId)
                            .to(StagingModels::Table, StagingModels::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_staging_trims_model_name")
                    .table(StagingTrims::Table)
                    .col(StagingTrims::ModelId)
                    .col(StagingTrims::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create staging_options table
        manager
            .create_table(
                Table::create()
                    .table(StagingOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StagingOptions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StagingOptions::TrimId).integer().not_null())
                    .col(ColumnDef::new(StagingOptions::Name).string().not_null())
                    .col(ColumnDef::new(StagingOptions::Code).string())
                    .col(ColumnDef::new(StagingOptions::Category).string())
                    .col(ColumnDef::new(StagingOptions::Description).string())
                    .col(
                        ColumnDef::new(StagingOptions::Price)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(StagingOptions::DiscountedPrice).big_integer())
                    .col(
                        ColumnDef::new(StagingOptions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StagingOptions::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staging_options_trim_id")
                            .from(StagingOptions::Table, StagingOptions::TrimId)
                            .to(StagingTrims::Table, StagingTrims::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_staging_options_trim_name")
                    .table(StagingOptions::Table)
                    .col(StagingOptions::TrimId)
                    .col(StagingOptions::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_staging_options_trim_name",
            "idx_staging_trims_model_name",
            "idx_staging_models_line_code",
            "idx_staging_vehicle_lines_brand_name",
            "idx_staging_brands_version_name",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await
                .ok();
        }

        manager
            .drop_table(Table::drop().table(StagingOptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StagingTrims::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StagingModels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StagingVehicleLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StagingBrands::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum StagingBrands {
    Table,
    Id,
    VersionId,
    Name,
    Country,
    LogoUrl,
    Manager,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StagingVehicleLines {
    Table,
    Id,
    BrandId,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StagingModels {
    Table,
    Id,
    VehicleLineId,
    Name,
    Code,
    ReleaseYear,
    Price,
    IsForeign,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StagingTrims {
    Table,
    Id,
    ModelId,
    Name,
    CarType,
    FuelName,
    Cc,
    BasePrice,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StagingOptions {
    Table,
    Id,
    TrimId,
    Name,
    Code,
    Category,
    Description,
    Price,
    DiscountedPrice,
    CreatedAt,
    UpdatedAt,
}
