use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staged model. `code` is the natural key carried into the main catalog;
/// uniqueness within the owning version is enforced by the import and CRUD
/// paths (the row reaches its version through the brand parent).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staging_models")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vehicle_line_id: i32,
    pub name: String,
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
        belongs_to = "super::staging_vehicle_lines::Entity",
        from = "Column::VehicleLineId",
        to = "super::staging_vehicle_lines::Column::Id"
    )]
    StagingVehicleLines,
    #[sea_orm(has_many = "super::staging_trims::Entity")]
    StagingTrims,
}

impl Related<super::staging_vehicle_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StagingVehicleLines.def()
    }
}

impl Related<super::staging_trims::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StagingTrims.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
