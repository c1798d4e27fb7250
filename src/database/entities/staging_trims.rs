use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staged trim level, unique per (model_id, name).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staging_trims")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub model_id: i32,
    pub name: String,
    pub car_type: Option<String>,
    pub fuel_name: Option<String>,
    pub cc: Option<i32>,
    pub base_price: i64,
    pub description: Option<String>,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::staging_models::Entity",
        from = "Column::ModelId",
        to = "super::staging_models::Column::Id"
    )]
    StagingModels,
    #[sea_orm(has_many = "super::staging_options::Entity")]
    StagingOptions,
}

impl Related<super::staging_models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StagingModels.def()
    }
}

impl Related<super::staging_options::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StagingOptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
