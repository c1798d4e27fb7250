use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::entities::{jobs, JobStatus, JobType};
use crate::server::app::AppState;
use crate::services::JobService;

use super::{Page, Pagination};

/// Job status object served to operators and polling clients.
#[derive(Serialize)]
pub struct JobStatusResponse {
    pub id: i32,
    pub status: String,
    pub job_type: String,
    pub progress: i32,
    pub total_rows: i32,
    pub processed_rows: i32,
    pub result: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<jobs::Model> for JobStatusResponse {
    fn from(job: jobs::Model) -> Self {
        let progress = job.progress();
        let result = job
            .result
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok());
        Self {
            id: job.id,
            status: job.status,
            job_type: job.job_type,
            progress,
            total_rows: job.total_rows,
            processed_rows: job.processed_rows,
            result,
            error_message: job.error_message,
            created_at: job.created_at,
            started_at: job.started_at,
            completed_at: job.completed_at,
        }
    }
}

#[derive(Deserialize)]
pub struct JobFilter {
    pub status: Option<String>,
    pub job_type: Option<String>,
    #[serde(default)]
    pub page: u64,
    pub per_page: Option<u64>,
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<i32>,
) -> Result<Json<JobStatusResponse>, StatusCode> {
    let service = JobService::new(state.db.clone());
    let job = service
        .get(job_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(job.into()))
}

pub async fn list_jobs(
    State(state): State<AppState>,
    Query(filter): Query<JobFilter>,
) -> Result<Json<Page<JobStatusResponse>>, StatusCode> {
    // Unknown filter values are a caller mistake, not an empty result
    let status = match filter.status.as_deref() {
        Some(raw) => Some(JobStatus::from_str(raw).ok_or(StatusCode::BAD_REQUEST)?),
        None => None,
    };
    let job_type = match filter.job_type.as_deref() {
        Some(raw) => Some(JobType::from_str(raw).ok_or(StatusCode::BAD_REQUEST)?),
        None => None,
    };

    let pagination = Pagination {
        page: filter.page,
        per_page: filter.per_page.unwrap_or(50),
    };

    let service = JobService::new(state.db.clone());
    let (items, total) = service
        .list(status, job_type, pagination.page, pagination.per_page)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(Page {
        items: items.into_iter().map(JobStatusResponse::from).collect(),
        total,
        page: pagination.page,
        per_page: pagination.per_page,
    }))
}
