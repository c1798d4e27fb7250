use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

use super::job_state::{JobStatus, JobType};

/// A persisted record of one asynchronous unit of work (excel import,
/// promotion, crawl) with its own small state machine and a JSON result.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub job_type: String,
    pub status: String,
    pub version_id: Option<i32>,
    /// External task identity assigned by the runner once known
    pub task_id: Option<String>,
    pub attempts: i32,
    pub total_rows: i32,
    pub processed_rows: i32,
    /// Result blob, JSON stored as text
    pub result: Option<String>,
    pub error_message: Option<String>,
    pub created_at: ChronoDateTimeUtc,
    pub started_at: Option<ChronoDateTimeUtc>,
    pub completed_at: Option<ChronoDateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::versions::Entity",
        from = "Column::VersionId",
        to = "super::versions::Column::Id"
    )]
    Versions,
}

impl Related<super::versions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Versions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn parse_status(&self) -> JobStatus {
        JobStatus::from_str(&self.status).unwrap_or(JobStatus::Pending)
    }

    pub fn parse_job_type(&self) -> Option<JobType> {
        JobType::from_str(&self.job_type)
    }

    /// Progress percentage 0..100, derived from row counters.
    /// A terminal COMPLETED job always reads 100.
    pub fn progress(&self) -> i32 {
        if self.parse_status() == JobStatus::Completed {
            return 100;
        }
        if self.total_rows <= 0 {
            return 0;
        }
        ((self.processed_rows as i64 * 100) / self.total_rows as i64).clamp(0, 100) as i32
    }
}

impl ActiveModel {
    pub fn new() -> Self {
        Self {
            id: ActiveValue::NotSet,
            job_type: ActiveValue::NotSet,
            status: Set(JobStatus::Pending.as_str().to_string()),
            version_id: ActiveValue::NotSet,
            task_id: ActiveValue::NotSet,
            attempts: Set(0),
            total_rows: Set(0),
            processed_rows: Set(0),
            result: ActiveValue::NotSet,
            error_message: ActiveValue::NotSet,
            created_at: Set(chrono::Utc::now()),
            started_at: ActiveValue::NotSet,
            completed_at: ActiveValue::NotSet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(status: JobStatus, processed: i32, total: i32) -> Model {
        Model {
            id: 1,
            job_type: JobType::ExcelImport.as_str().to_string(),
            status: status.as_str().to_string(),
            version_id: Some(1),
            task_id: None,
            attempts: 0,
            total_rows: total,
            processed_rows: processed,
            result: None,
            error_message: None,
            created_at: chrono::Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn test_progress_is_derived() {
        assert_eq!(job(JobStatus::Processing, 0, 0).progress(), 0);
        assert_eq!(job(JobStatus::Processing, 5, 10).progress(), 50);
        assert_eq!(job(JobStatus::Processing, 10, 10).progress(), 100);
    }

    #[test]
    fn test_completed_jobs_read_full_progress() {
        // completion wins even when the importer never learned a total
        assert_eq!(job(JobStatus::Completed, 0, 0).progress(), 100);
    }
}
