use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Main-catalog vehicle line; natural key is (brand_id, name).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "catalog_vehicle_lines")]
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
        belongs_to = "super::catalog_brands::Entity",
        from = "Column::BrandId",
        to = "super::catalog_brands::Column::Id"
    )]
    CatalogBrands,
    #[sea_orm(has_many = "super::catalog_models::Entity")]
    CatalogModels,
}

impl Related<super::catalog_brands::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CatalogBrands.def()
    }
}

impl Related<super::catalog_models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CatalogModels.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
