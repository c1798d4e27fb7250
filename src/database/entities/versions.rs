use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

use super::approval_status::ApprovalStatus;

/// A workspace version: the container of staged catalog data awaiting
/// approval and promotion.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "versions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub approval_status: String,
    pub rejection_note: Option<String>,
    pub created_by: String,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::staging_brands::Entity")]
    StagingBrands,
    #[sea_orm(has_many = "super::jobs::Entity")]
    Jobs,
}

impl Related<super::staging_brands::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StagingBrands.def()
    }
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jobs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Parse the status column; rows only ever hold the canonical strings.
    pub fn status(&self) -> ApprovalStatus {
        ApprovalStatus::from_str(&self.approval_status).unwrap_or(ApprovalStatus::Pending)
    }
}

impl ActiveModel {
    pub fn new() -> Self {
        Self {
            id: ActiveValue::NotSet,
            name: ActiveValue::NotSet,
            description: ActiveValue::NotSet,
            approval_status: Set(ApprovalStatus::Pending.as_str().to_string()),
            rejection_note: ActiveValue::NotSet,
            created_by: ActiveValue::NotSet,
            created_at: Set(chrono::Utc::now()),
            updated_at: Set(chrono::Utc::now()),
        }
    }

    pub fn set_updated_at(mut self) -> Self {
        self.updated_at = Set(chrono::Utc::now());
        self
    }
}
