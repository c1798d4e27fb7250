use anyhow::{anyhow, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{info, warn};

use crate::database::entities::{jobs, JobStatus, JobType};

/// Persists job records and guards their state machine.
///
/// PENDING -> PROCESSING -> {COMPLETED, FAILED}; terminal states are
/// write-once. Progress is tracked as raw row counters and turned into a
/// percentage on read.
#[derive(Clone)]
pub struct JobService {
    db: DatabaseConnection,
}

impl JobService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a PENDING job, optionally bound to a version.
    pub async fn create(&self, job_type: JobType, version_id: Option<i32>) -> Result<jobs::Model> {
        let job = jobs::ActiveModel {
            job_type: Set(job_type.as_str().to_string()),
            version_id: Set(version_id),
            ..jobs::ActiveModel::new()
        };
        let job = job.insert(&self.db).await?;
        info!("created {} job {}", job.job_type, job.id);
        Ok(job)
    }

    /// Record the external task identity once the runner has assigned it.
    pub async fn bind_task(&self, job_id: i32, task_id: &str) -> Result<jobs::Model> {
        let job = self.require(job_id).await?;
        let mut active: jobs::ActiveModel = job.into();
        active.task_id = Set(Some(task_id.to_string()));
        Ok(active.update(&self.db).await?)
    }

    /// PENDING -> PROCESSING. Idempotent when already PROCESSING so a
    /// retried task can re-enter; each call counts one attempt.
    pub async fn mark_processing(&self, job_id: i32) -> Result<jobs::Model> {
        let job = self.require(job_id).await?;
        let status = job.parse_status();
        let next = status
            .start()
            .map_err(|s| anyhow!("Job {} cannot start from state {}", job_id, s.as_str()))?;

        let attempts = job.attempts + 1;
        let started_at = job.started_at;
        let mut active: jobs::ActiveModel = job.into();
        active.status = Set(next.as_str().to_string());
        active.attempts = Set(attempts);
        if started_at.is_none() {
            active.started_at = Set(Some(Utc::now()));
        }
        Ok(active.update(&self.db).await?)
    }

    /// Update row counters; only valid while PROCESSING. `total` is set
    /// once the workbook has been sized and left alone afterwards.
    pub async fn set_progress(
        &self,
        job_id: i32,
        processed_rows: i32,
        total_rows: Option<i32>,
    ) -> Result<jobs::Model> {
        let job = self.require(job_id).await?;
        if job.parse_status() != JobStatus::Processing {
            return Err(anyhow!(
                "Job {} is {}; progress is only writable while PROCESSING",
                job_id,
                job.status
            ));
        }

        let mut active: jobs::ActiveModel = job.into();
        active.processed_rows = Set(processed_rows);
        if let Some(total) = total_rows {
            active.total_rows = Set(total);
        }
        Ok(active.update(&self.db).await?)
    }

    /// PROCESSING -> COMPLETED with a result blob. Write-once.
    pub async fn complete<T: serde::Serialize>(
        &self,
        job_id: i32,
        result: &T,
    ) -> Result<jobs::Model> {
        let job = self.require(job_id).await?;
        let next = job.parse_status().complete().map_err(|s| {
            anyhow!(
                "Job {} is already {} and cannot complete again",
                job_id,
                s.as_str()
            )
        })?;

        let mut active: jobs::ActiveModel = job.into();
        active.status = Set(next.as_str().to_string());
        active.result = Set(Some(serde_json::to_string(result)?));
        active.completed_at = Set(Some(Utc::now()));
        let updated = active.update(&self.db).await?;
        info!("job {} completed", job_id);
        Ok(updated)
    }

    /// {PENDING, PROCESSING} -> FAILED with an error message. Write-once.
    pub async fn fail(&self, job_id: i32, error_message: &str) -> Result<jobs::Model> {
        let job = self.require(job_id).await?;
        let next = job.parse_status().fail().map_err(|s| {
            anyhow!(
                "Job {} is already {} and cannot fail again",
                job_id,
                s.as_str()
            )
        })?;

        let mut active: jobs::ActiveModel = job.into();
        active.status = Set(next.as_str().to_string());
        active.error_message = Set(Some(error_message.to_string()));
        active.completed_at = Set(Some(Utc::now()));
        let updated = active.update(&self.db).await?;
        warn!("job {} failed: {}", job_id, error_message);
        Ok(updated)
    }

    pub async fn get(&self, job_id: i32) -> Result<Option<jobs::Model>> {
        Ok(jobs::Entity::find_by_id(job_id).one(&self.db).await?)
    }

    /// Filtered listing, newest first. `page` is zero-based.
    pub async fn list(
        &self,
        status: Option<JobStatus>,
        job_type: Option<JobType>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<jobs::Model>, u64)> {
        let mut query = jobs::Entity::find().order_by_desc(jobs::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(jobs::Column::Status.eq(status.as_str()));
        }
        if let Some(job_type) = job_type {
            query = query.filter(jobs::Column::JobType.eq(job_type.as_str()));
        }

        let paginator = query.paginate(&self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page).await?;
        Ok((items, total))
    }

    async fn require(&self, job_id: i32) -> Result<jobs::Model> {
        jobs::Entity::find_by_id(job_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow!("Job {} not found", job_id))
    }
}
