use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create catalog_brands table
        manager
            .create_table(
                Table::create()
                    .table(CatalogBrands::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CatalogBrands::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CatalogBrands::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CatalogBrands::Country).string())
                    .col(ColumnDef::new(CatalogBrands::LogoUrl).string())
                    .col(ColumnDef::new(CatalogBrands::Manager).string())
                    .col(
                        ColumnDef::new(CatalogBrands::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CatalogBrands::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create catalog_vehicle_lines table
        manager
            .create_table(
                Table::create()
                    .table(CatalogVehicleLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CatalogVehicleLines::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CatalogVehicleLines::BrandId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CatalogVehicleLines::Name)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CatalogVehicleLines::Description).string())
                    .col(
                        ColumnDef::new(CatalogVehicleLines::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CatalogVehicleLines::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_catalog_vehicle_lines_brand_id")
                            .from(CatalogVehicleLines::Table, CatalogVehicleLines::BrandId)
                            .to(CatalogBrands::Table, CatalogBrands::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_catalog_vehicle_lines_brand_name")
                    .table(CatalogVehicleLines::Table)
                    .col(CatalogVehicleLines::BrandId)
                    .col(CatalogVehicleLines::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create catalog_models table; code is the global natural key
        manager
            .create_table(
                Table::create()
                    .table(CatalogModels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CatalogModels::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CatalogModels::VehicleLineId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CatalogModels::Name).string().not_null())
                    .col(
                        ColumnDef::new(CatalogModels::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CatalogModels::ReleaseYear).integer())
                    .col(ColumnDef::new(CatalogModels::Price).big_integer())
                    .col(
                        ColumnDef::new(CatalogModels::IsForeign)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CatalogModels::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CatalogModels::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_catalog_models_vehicle_line_id")
                            .from(CatalogModels::Table, CatalogModels::VehicleLineId)
                            .to(CatalogVehicleLines::Table, CatalogVehicleLines::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create catalog_trims table
        manager
            .create_table(
                Table::create()
                    .table(CatalogTrims::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CatalogTrims::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CatalogTrims::ModelId).integer().not_null())
                    .col(ColumnDef::new(CatalogTrims::Name).string().not_null())
                    .col(ColumnDef::new(CatalogTrims::CarType).string())
                    .col(ColumnDef::new(CatalogTrims::FuelName).string())
                    .col(ColumnDef::new(CatalogTrims::Cc).integer())
                    .col(
                        ColumnDef::new(CatalogTrims::BasePrice)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CatalogTrims::Description).string())
                    .col(
                        ColumnDef::new(CatalogTrims::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CatalogTrims::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_catalog_trims_model_id")
                            .from(CatalogTrims::Table, CatalogTrims::ModelId)
                            .to(CatalogModels::Table, CatalogModels::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_catalog_trims_model_name")
                    .table(CatalogTrims::Table)
                    .col(CatalogTrims::ModelId)
                    .col(CatalogTrims::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create catalog_options table
        manager
            .create_table(
                Table::create()
                    .table(CatalogOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CatalogOptions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CatalogOptions::TrimId).integer().not_null())
                    .col(ColumnDef::new(CatalogOptions::Name).string().not_null())
                    .col(ColumnDef::new(CatalogOptions::Code).string())
                    .col(ColumnDef::new(CatalogOptions::Category).string())
                    .col(ColumnDef::new(CatalogOptions::Description).string())
                    .col(
                        ColumnDef::new(CatalogOptions::Price)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CatalogOptions::DiscountedPrice).big_integer())
                    .col(
                        ColumnDef::new(CatalogOptions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CatalogOptions::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_catalog_options_trim_id")
                            .from(CatalogOptions::Table, CatalogOptions::TrimId)
                            .to(CatalogTrims::Table, CatalogTrims::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_catalog_options_trim_name")
                    .table(CatalogOptions::Table)
                    .col(CatalogOptions::TrimId)
                    .col(CatalogOptions::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_catalog_options_trim_name",
            "idx_catalog_trims_model_name",
            "idx_catalog_vehicle_lines_brand_name",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await
                .ok();
        }

        manager
            .drop_table(Table::drop().table(CatalogOptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CatalogTrims::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CatalogModels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CatalogVehicleLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CatalogBrands::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CatalogBrands {
    Table,
    Id,
    Name,
    Country,
    LogoUrl,
    Manager,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CatalogVehicleLines {
    Table,
    Id,
    BrandId,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CatalogModels {
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
enum CatalogTrims {
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
enum CatalogOptions {
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
