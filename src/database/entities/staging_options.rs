use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staged option package. Options live under a trim, not a model;
/// unique per (trim_id, name).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staging_options")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub trim_id: i32,
    pub name: String,
    pub code: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: i64,
    pub discounted_price: Option<i64>,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::staging_trims::Entity",
        from = "Column::TrimId",
        to = "super::staging_trims::Column::Id"
    )]
    StagingTrims,
}

impl Related<super::staging_trims::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StagingTrims.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
