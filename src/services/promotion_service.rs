use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::database::entities::{
    catalog_brands, catalog_models, catalog_options, catalog_trims, catalog_vehicle_lines,
    staging_brands, staging_models, staging_options, staging_trims, staging_vehicle_lines,
    versions,
};
use crate::errors::PromotionError;
use crate::services::job_service::JobService;

/// Result blob written to a PROMOTION job: rows carried into the main
/// catalog per level (insert and update both count).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct PromotionSummary {
    pub brand_count: i64,
    pub vehicle_line_count: i64,
    pub model_count: i64,
    pub trim_count: i64,
    pub option_count: i64,
}

/// Merges an APPROVED version's staging tree into the main catalog.
///
/// The whole promotion is one transaction: natural-key upserts walk the
/// tree parent-first (brands, lines, models, trims, options) and the
/// version flips to MIGRATED with the same commit. Promotion never
/// deletes main rows; keys absent from the version are left alone, which
/// keeps re-promotion of identical staging contents idempotent.
#[derive(Clone)]
pub struct PromotionService {
    db: DatabaseConnection,
    jobs: JobService,
}

impl PromotionService {
    pub fn new(db: DatabaseConnection) -> Self {
        let jobs = JobService::new(db.clone());
        Self { db, jobs }
    }

    /// Job wrapper around [`promote`](Self::promote). Domain failures
    /// terminate the job; an `Err` return asks the runner to retry.
    pub async fn run(&self, job_id: i32, version_id: i32) -> Result<()> {
        self.jobs.mark_processing(job_id).await?;

        match self.promote(version_id, "runner").await {
            Ok(summary) => {
                self.jobs.complete(job_id, &summary).await?;
                Ok(())
            }
            Err(PromotionError::Database(e)) => Err(e.into()),
            Err(domain) => {
                self.jobs.fail(job_id, &domain.to_string()).await?;
                Ok(())
            }
        }
    }

    /// Promote one APPROVED version and mark it MIGRATED. Any failure
    /// aborts the transaction and leaves the version APPROVED.
    pub async fn promote(
        &self,
        version_id: i32,
        actor: &str,
    ) -> Result<PromotionSummary, PromotionError> {
        let txn = self.db.begin().await?;

        let version = versions::Entity::find_by_id(version_id)
            .one(&txn)
            .await?
            .ok_or(PromotionError::VersionNotFound(version_id))?;

        let status = version.status();
        let migrated = status.migrate().map_err(|from| PromotionError::NotApproved {
            id: version_id,
            status: from.as_str().to_string(),
        })?;

        let mut summary = PromotionSummary::default();

        // Brands
        let brands = staging_brands::Entity::find()
            .filter(staging_brands::Column::VersionId.eq(version_id))
            .order_by_asc(staging_brands::Column::Id)
            .all(&txn)
            .await?;
        let mut brand_ids = HashMap::new();
        for brand in &brands {
            let catalog_id = upsert_brand(&txn, brand).await?;
            brand_ids.insert(brand.id, catalog_id);
            summary.brand_count += 1;
        }

        // Vehicle lines
        let lines = if brands.is_empty() {
            Vec::new()
        } else {
            staging_vehicle_lines::Entity::find()
                .filter(
                    staging_vehicle_lines::Column::BrandId
                        .is_in(brands.iter().map(|b| b.id).collect::<Vec<_>>()),
                )
                .order_by_asc(staging_vehicle_lines::Column::Id)
                .all(&txn)
                .await?
        };
        let mut line_ids = HashMap::new();
        for line in &lines {
            let parent =
                *brand_ids
                    .get(&line.brand_id)
                    .ok_or(PromotionError::DanglingReference {
                        kind: "vehicle line",
                        id: line.id,
                    })?;
            let catalog_id = upsert_vehicle_line(&txn, parent, line).await?;
            line_ids.insert(line.id, catalog_id);
            summary.vehicle_line_count += 1;
        }

        // Models
        let models = if lines.is_empty() {
            Vec::new()
        } else {
            staging_models::Entity::find()
                .filter(
                    staging_models::Column::VehicleLineId
                        .is_in(lines.iter().map(|l| l.id).collect::<Vec<_>>()),
                )
                .order_by_asc(staging_models::Column::Id)
                .all(&txn)
                .await?
        };
        let mut model_ids = HashMap::new();
        for model in &models {
            let parent =
                *line_ids
                    .get(&model.vehicle_line_id)
                    .ok_or(PromotionError::DanglingReference {
                        kind: "model",
                        id: model.id,
                    })?;
            let catalog_id = upsert_model(&txn, parent, model).await?;
            model_ids.insert(model.id, catalog_id);
            summary.model_count += 1;
        }

        // Trims
        let trims = if models.is_empty() {
            Vec::new()
        } else {
            staging_trims::Entity::find()
                .filter(
                    staging_trims::Column::ModelId
                        .is_in(models.iter().map(|m| m.id).collect::<Vec<_>>()),
                )
                .order_by_asc(staging_trims::Column::Id)
                .all(&txn)
                .await?
        };
        let mut trim_ids = HashMap::new();
        for trim in &trims {
            let parent = *model_ids
                .get(&trim.model_id)
                .ok_or(PromotionError::DanglingReference {
                    kind: "trim",
                    id: trim.id,
                })?;
            let catalog_id = upsert_trim(&txn, parent, trim).await?;
            trim_ids.insert(trim.id, catalog_id);
            summary.trim_count += 1;
        }

        // Options
        let options = if trims.is_empty() {
            Vec::new()
        } else {
            staging_options::Entity::find()
                .filter(
                    staging_options::Column::TrimId
                        .is_in(trims.iter().map(|t| t.id).collect::<Vec<_>>()),
                )
                .order_by_asc(staging_options::Column::Id)
                .all(&txn)
                .await?
        };
        for option in &options {
            let parent = *trim_ids
                .get(&option.trim_id)
                .ok_or(PromotionError::DanglingReference {
                    kind: "option",
                    id: option.id,
                })?;
            upsert_option(&txn, parent, option).await?;
            summary.option_count += 1;
        }

        // The version flips with the same commit that publishes the rows
        let mut active: versions::ActiveModel = version.into();
        active.approval_status = Set(migrated.as_str().to_string());
        active.updated_at = Set(Utc::now());
        active.update(&txn).await?;

        txn.commit().await?;

        info!(
            "version {} promoted by {}: {} brands, {} lines, {} models, {} trims, {} options",
            version_id,
            actor,
            summary.brand_count,
            summary.vehicle_line_count,
            summary.model_count,
            summary.trim_count,
            summary.option_count
        );
        Ok(summary)
    }
}

fn map_write_error(e: sea_orm::DbErr) -> PromotionError {
    let message = e.to_string();
    if message.to_ascii_lowercase().contains("constraint") {
        PromotionError::ConstraintViolation(message)
    } else {
        PromotionError::Database(e)
    }
}

async fn upsert_brand<C: ConnectionTrait>(
    conn: &C,
    staged: &staging_brands::Model,
) -> Result<i32, PromotionError> {
    let existing = catalog_brands::Entity::find()
        .filter(catalog_brands::Column::Name.eq(staged.name.clone()))
        .one(conn)
        .await?;

    match existing {
        Some(row) => {
            let id = row.id;
            let mut active: catalog_brands::ActiveModel = row.into();
            active.country = Set(staged.country.clone());
            active.logo_url = Set(staged.logo_url.clone());
            active.manager = Set(staged.manager.clone());
            active.updated_at = Set(Utc::now());
            active.update(conn).await.map_err(map_write_error)?;
            Ok(id)
        }
        None => {
            let row = catalog_brands::ActiveModel {
                name: Set(staged.name.clone()),
                country: Set(staged.country.clone()),
                logo_url: Set(staged.logo_url.clone()),
                manager: Set(staged.manager.clone()),
                created_at: Set(Utc::now()),
                updated_at: Set(Utc::now()),
                ..Default::default()
            };
            Ok(row.insert(conn).await.map_err(map_write_error)?.id)
        }
    }
}

async fn upsert_vehicle_line<C: ConnectionTrait>(
    conn: &C,
    brand_id: i32,
    staged: &staging_vehicle_lines::Model,
) -> Result<i32, PromotionError> {
    let existing = catalog_vehicle_lines::Entity::find()
        .filter(catalog_vehicle_lines::Column::BrandId.eq(brand_id))
        .filter(catalog_vehicle_lines::Column::Name.eq(staged.name.clone()))
        .one(conn)
        .await?;

    match existing {
        Some(row) => {
            let id = row.id;
            let mut active: catalog_vehicle_lines::ActiveModel = row.into();
            active.description = Set(staged.description.clone());
            active.updated_at = Set(Utc::now());
            active.update(conn).await.map_err(map_write_error)?;
            Ok(id)
        }
        None => {
            let row = catalog_vehicle_lines::ActiveModel {
                brand_id: Set(brand_id),
                name: Set(staged.name.clone()),
                description: Set(staged.description.clone()),
                created_at: Set(Utc::now()),
                updated_at: Set(Utc::now()),
                ..Default::default()
            };
            Ok(row.insert(conn).await.map_err(map_write_error)?.id)
        }
    }
}

async fn upsert_model<C: ConnectionTrait>(
    conn: &C,
    vehicle_line_id: i32,
    staged: &staging_models::Model,
) -> Result<i32, PromotionError> {
    // The code is the global natural key: a model whose code changed
    // between versions lands as a brand-new catalog row
    let existing = catalog_models::Entity::find()
        .filter(catalog_models::Column::Code.eq(staged.code.clone()))
        .one(conn)
        .await?;

    match existing {
        Some(row) => {
            let id = row.id;
            let mut active: catalog_models::ActiveModel = row.into();
            active.name = Set(staged.name.clone());
            active.vehicle_line_id = Set(vehicle_line_id);
            active.release_year = Set(staged.release_year);
            active.price = Set(staged.price);
            active.is_foreign = Set(staged.is_foreign);
            active.updated_at = Set(Utc::now());
            active.update(conn).await.map_err(map_write_error)?;
            Ok(id)
        }
        None => {
            let row = catalog_models::ActiveModel {
                vehicle_line_id: Set(vehicle_line_id),
                name: Set(staged.name.clone()),
                code: Set(staged.code.clone()),
                release_year: Set(staged.release_year),
                price: Set(staged.price),
                is_foreign: Set(staged.is_foreign),
                created_at: Set(Utc::now()),
                updated_at: Set(Utc::now()),
                ..Default::default()
            };
            Ok(row.insert(conn).await.map_err(map_write_error)?.id)
        }
    }
}

async fn upsert_trim<C: ConnectionTrait>(
    conn: &C,
    model_id: i32,
    staged: &staging_trims::Model,
) -> Result<i32, PromotionError> {
    let existing = catalog_trims::Entity::find()
        .filter(catalog_trims::Column::ModelId.eq(model_id))
        .filter(catalog_trims::Column::Name.eq(staged.name.clone()))
        .one(conn)
        .await?;

    match existing {
        Some(row) => {
            let id = row.id;
            let mut active: catalog_trims::ActiveModel = row.into();
            active.car_type = Set(staged.car_type.clone());
            active.fuel_name = Set(staged.fuel_name.clone());
            active.cc = Set(staged.cc);
            active.base_price = Set(staged.base_price);
            active.description = Set(staged.description.clone());
            active.updated_at = Set(Utc::now());
            active.update(conn).await.map_err(map_write_error)?;
            Ok(id)
        }
        None => {
            let row = catalog_trims::ActiveModel {
                model_id: Set(model_id),
                name: Set(staged.name.clone()),
                car_type: Set(staged.car_type.clone()),
                fuel_name: Set(staged.fuel_name.clone()),
                cc: Set(staged.cc),
                base_price: Set(staged.base_price),
                description: Set(staged.description.clone()),
                created_at: Set(Utc::now()),
                updated_at: Set(Utc::now()),
                ..Default::default()
            };
            Ok(row.insert(conn).await.map_err(map_write_error)?.id)
        }
    }
}

async fn upsert_option<C: ConnectionTrait>(
    conn: &C,
    trim_id: i32,
    staged: &staging_options::Model,
) -> Result<i32, PromotionError> {
    let existing = catalog_options::Entity::find()
        .filter(catalog_options::Column::TrimId.eq(trim_id))
        .filter(catalog_options::Column::Name.eq(staged.name.clone()))
        .one(conn)
        .await?;

    match existing {
        Some(row) => {
            let id = row.id;
            let mut active: catalog_options::ActiveModel = row.into();
            active.code = Set(staged.code.clone());
            active.category = Set(staged.category.clone());
            active.description = Set(staged.description.clone());
            active.price = Set(staged.price);
            active.discounted_price = Set(staged.discounted_price);
            active.updated_at = Set(Utc::now());
            active.update(conn).await.map_err(map_write_error)?;
            Ok(id)
        }
        None => {
            let row = catalog_options::ActiveModel {
                trim_id: Set(trim_id),
                name: Set(staged.name.clone()),
                code: Set(staged.code.clone()),
                category: Set(staged.category.clone()),
                description: Set(staged.description.clone()),
                price: Set(staged.price),
                discounted_price: Set(staged.discounted_price),
                created_at: Set(Utc::now()),
                updated_at: Set(Utc::now()),
                ..Default::default()
            };
            Ok(row.insert(conn).await.map_err(map_write_error)?.id)
        }
    }
}
