use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::database::entities::{versions, ApprovalStatus};
use crate::errors::{CatalogError, CatalogResult};
use crate::services::staging_service::{
    collect_version_stats, delete_version_subtree, version_brand_ids, VersionStats,
};

/// Owns the version lifecycle and the approval state machine:
///
/// PENDING -(approve)-> APPROVED -(promotion)-> MIGRATED, with reject
/// returning an APPROVED version to PENDING. Aggregate statistics are
/// derived from the staging tables on read, never stored.
#[derive(Clone)]
pub struct VersionService {
    db: DatabaseConnection,
}

impl VersionService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new PENDING version; `name` is unique globally.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        created_by: &str,
    ) -> CatalogResult<versions::Model> {
        let existing = versions::Entity::find()
            .filter(versions::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CatalogError::DuplicateVersionName(name.to_string()));
        }

        let version = versions::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.map(|d| d.to_string())),
            created_by: Set(created_by.to_string()),
            ..versions::ActiveModel::new()
        };

        let version = version.insert(&self.db).await?;
        info!("created version '{}' (id: {})", version.name, version.id);
        Ok(version)
    }

    pub async fn get(&self, version_id: i32) -> CatalogResult<versions::Model> {
        versions::Entity::find_by_id(version_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::VersionNotFound(version_id))
    }

    /// Version plus derived staging counts.
    pub async fn get_with_stats(
        &self,
        version_id: i32,
    ) -> CatalogResult<(versions::Model, VersionStats)> {
        let version = self.get(version_id).await?;
        let stats = collect_version_stats(&self.db, version_id).await?;
        Ok((version, stats))
    }

    /// Newest first. `page` is zero-based.
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> CatalogResult<(Vec<versions::Model>, u64)> {
        let paginator = versions::Entity::find()
            .order_by_desc(versions::Column::CreatedAt)
            .paginate(&self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page).await?;
        Ok((items, total))
    }

    /// PENDING -> APPROVED. Approving an already-APPROVED version is a
    /// no-op returning the current row; approval after migration fails.
    pub async fn approve(&self, version_id: i32, actor: &str) -> CatalogResult<versions::Model> {
        let txn = self.db.begin().await?;

        let version = versions::Entity::find_by_id(version_id)
            .one(&txn)
            .await?
            .ok_or(CatalogError::VersionNotFound(version_id))?;

        let status = version.status();
        if status == ApprovalStatus::Approved {
            txn.commit().await?;
            return Ok(version);
        }
        let next = status
            .approve()
            .map_err(|from| CatalogError::InvalidTransition {
                id: version_id,
                from: from.as_str().to_string(),
                to: ApprovalStatus::Approved.as_str(),
            })?;

        let mut active: versions::ActiveModel = version.into();
        active.approval_status = Set(next.as_str().to_string());
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!("version {} approved by {}", version_id, actor);
        Ok(updated)
    }

    /// Return a version to PENDING with an explicit note. Idempotent on a
    /// version that is already PENDING.
    pub async fn reject(
        &self,
        version_id: i32,
        actor: &str,
        note: Option<&str>,
    ) -> CatalogResult<versions::Model> {
        let txn = self.db.begin().await?;

        let version = versions::Entity::find_by_id(version_id)
            .one(&txn)
            .await?
            .ok_or(CatalogError::VersionNotFound(version_id))?;

        let next = version
            .status()
            .reject()
            .map_err(|from| CatalogError::InvalidTransition {
                id: version_id,
                from: from.as_str().to_string(),
                to: ApprovalStatus::Pending.as_str(),
            })?;

        let mut active: versions::ActiveModel = version.into();
        active.approval_status = Set(next.as_str().to_string());
        active.rejection_note = Set(Some(
            note.map(|n| n.to_string())
                .unwrap_or_else(|| format!("rejected by {}", actor)),
        ));
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!("version {} rejected by {}", version_id, actor);
        Ok(updated)
    }

    /// Delete a PENDING version together with its staging subtree.
    pub async fn delete(&self, version_id: i32) -> CatalogResult<()> {
        let version = self.get(version_id).await?;
        if version.status() != ApprovalStatus::Pending {
            return Err(CatalogError::VersionNotDeletable {
                id: version_id,
                status: version.approval_status,
            });
        }

        let txn = self.db.begin().await?;
        delete_version_subtree(&txn, version_id).await?;
        versions::Entity::delete_by_id(version_id).exec(&txn).await?;
        txn.commit().await?;

        info!("deleted version {} and its staging subtree", version_id);
        Ok(())
    }

    /// Garbage-collect staging subtrees of MIGRATED versions older than
    /// the retention window. The version rows themselves are kept as an
    /// audit trail. Returns the number of versions swept.
    pub async fn sweep_migrated(&self, retention_days: i64) -> CatalogResult<usize> {
        let cutoff = Utc::now() - Duration::days(retention_days);
        let expired = versions::Entity::find()
            .filter(versions::Column::ApprovalStatus.eq(ApprovalStatus::Migrated.as_str()))
            .filter(versions::Column::UpdatedAt.lt(cutoff))
            .all(&self.db)
            .await?;

        let mut swept = 0;
        for version in expired {
            // Skip versions whose subtree is already gone
            if version_brand_ids(&self.db, version.id).await?.is_empty() {
                continue;
            }
            let txn = self.db.begin().await?;
            delete_version_subtree(&txn, version.id).await?;
            txn.commit().await?;
            info!(
                "swept staging rows of migrated version '{}' (id: {})",
                version.name, version.id
            );
            swept += 1;
        }
        Ok(swept)
    }
}
