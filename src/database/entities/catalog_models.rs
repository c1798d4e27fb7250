use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Main-catalog model; natural key is `code`, globally unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "catalog_models")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vehicle_line_id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    pub release_year: Option<i32>,
    pub price: Option<i64>,
    pub is_foreign: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::catalog_vehicle_lines::Entity",
        from = "Column::VehicleLineId",
        to = "super::catalog_vehicle_lines::Column::Id"
    )]
    CatalogVehicleLines,
    #[sea_orm(has_many = "super::catalog_trims::Entity")]
    CatalogTrims,
}

impl Related<super::catalog_vehicle_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CatalogVehicleLines.def()
    }
}

impl Related<super::catalog_trims::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CatalogTrims.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
