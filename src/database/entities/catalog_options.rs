use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Main-catalog option; natural key is (trim_id, name).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "catalog_options")]
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
        belongs_to = "super::catalog_trims::Entity",
        from = "Column::TrimId",
        to = "super::catalog_trims::Column::Id"
    )]
    CatalogTrims,
}

impl Related<super::catalog_trims::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CatalogTrims.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
