use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staged vehicle line ("아반떼", "쏘나타"), unique per (brand_id, name).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staging_vehicle_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub brand_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::staging_brands::Entity",
        from = "Column::BrandId",
        to = "super::staging_brands::Column::Id"
    )]
    StagingBrands,
    #[sea_orm(has_many = "super::staging_models::Entity")]
    StagingModels,
}

impl Related<super::staging_brands::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StagingBrands.def()
    }
}

impl Related<super::staging_models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StagingModels.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
