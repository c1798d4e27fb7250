use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::database::entities::{versions, ApprovalStatus, JobType};
use crate::errors::CatalogError;
use crate::runner::TaskPayload;
use crate::server::app::AppState;
use crate::services::{JobService, VersionService, VersionStats};

use super::{catalog_status, Page, Pagination};

#[derive(Deserialize)]
pub struct CreateVersionRequest {
    pub name: String,
    pub description: Option<String>,
    /// Operator identity; authentication lives outside this service
    pub created_by: Option<String>,
}

#[derive(Deserialize)]
pub struct RejectVersionRequest {
    pub note: Option<String>,
    pub actor: Option<String>,
}

#[derive(Deserialize)]
pub struct ActorRequest {
    pub actor: Option<String>,
}

#[derive(Serialize)]
pub struct VersionDetailResponse {
    #[serde(flatten)]
    pub version: versions::Model,
    pub stats: VersionStats,
}

#[derive(Serialize)]
pub struct EnqueuedJobResponse {
    pub job_id: i32,
    pub task_id: String,
}

#[derive(Deserialize)]
pub struct UploadParams {
    pub country: Option<String>,
}

fn actor_or_default(actor: Option<String>) -> String {
    actor.unwrap_or_else(|| "operator".to_string())
}

pub async fn create_version(
    State(state): State<AppState>,
    Json(payload): Json<CreateVersionRequest>,
) -> Result<Json<versions::Model>, StatusCode> {
    let service = VersionService::new(state.db.clone());
    let version = service
        .create(
            &payload.name,
            payload.description.as_deref(),
            &actor_or_default(payload.created_by),
        )
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(version))
}

pub async fn list_versions(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Page<versions::Model>>, StatusCode> {
    let service = VersionService::new(state.db.clone());
    let (items, total) = service
        .list(pagination.page, pagination.per_page)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(Page {
        items,
        total,
        page: pagination.page,
        per_page: pagination.per_page,
    }))
}

pub async fn get_version(
    State(state): State<AppState>,
    Path(version_id): Path<i32>,
) -> Result<Json<VersionDetailResponse>, StatusCode> {
    let service = VersionService::new(state.db.clone());
    let (version, stats) = service
        .get_with_stats(version_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(VersionDetailResponse { version, stats }))
}

pub async fn delete_version(
    State(state): State<AppState>,
    Path(version_id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let service = VersionService::new(state.db.clone());
    service
        .delete(version_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Accept a workbook upload for a PENDING version: create an
/// EXCEL_IMPORT job, hand the bytes to the runner, return the job.
pub async fn upload_workbook(
    State(state): State<AppState>,
    Path(version_id): Path<i32>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<EnqueuedJobResponse>, StatusCode> {
    if body.len() > state.config.max_upload_bytes {
        return Err(StatusCode::PAYLOAD_TOO_LARGE);
    }
    if body.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    // Reject before enqueue when the version cannot take uploads
    let version = VersionService::new(state.db.clone())
        .get(version_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    if version.status() != ApprovalStatus::Pending {
        return Err(catalog_status(&CatalogError::VersionNotEditable {
            id: version_id,
            status: version.approval_status,
        }));
    }

    let jobs = JobService::new(state.db.clone());
    let job = jobs
        .create(JobType::ExcelImport, Some(version_id))
        .await
        .map_err(|e| {
            error!("failed to create import job: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let task_id = state
        .runner
        .dispatch(
            job.id,
            TaskPayload::ExcelImport {
                version_id,
                country: params.country,
                data: body.to_vec(),
            },
        )
        .await
        .map_err(|e| {
            error!("failed to dispatch import task: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(EnqueuedJobResponse {
        job_id: job.id,
        task_id,
    }))
}

pub async fn approve_version(
    State(state): State<AppState>,
    Path(version_id): Path<i32>,
    payload: Option<Json<ActorRequest>>,
) -> Result<Json<versions::Model>, StatusCode> {
    let actor = actor_or_default(payload.and_then(|Json(p)| p.actor));
    let service = VersionService::new(state.db.clone());
    let version = service
        .approve(version_id, &actor)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(version))
}

pub async fn reject_version(
    State(state): State<AppState>,
    Path(version_id): Path<i32>,
    payload: Option<Json<RejectVersionRequest>>,
) -> Result<Json<versions::Model>, StatusCode> {
    let (note, actor) = match payload {
        Some(Json(p)) => (p.note, p.actor),
        None => (None, None),
    };
    let service = VersionService::new(state.db.clone());
    let version = service
        .reject(version_id, &actor_or_default(actor), note.as_deref())
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(version))
}

/// Kick off promotion of an APPROVED version as a background job.
pub async fn promote_version(
    State(state): State<AppState>,
    Path(version_id): Path<i32>,
) -> Result<Json<EnqueuedJobResponse>, StatusCode> {
    let version = VersionService::new(state.db.clone())
        .get(version_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    if version.status() != ApprovalStatus::Approved {
        return Err(StatusCode::CONFLICT);
    }

    let jobs = JobService::new(state.db.clone());
    let job = jobs
        .create(JobType::Promotion, Some(version_id))
        .await
        .map_err(|e| {
            error!("failed to create promotion job: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let task_id = state
        .runner
        .dispatch(job.id, TaskPayload::Promotion { version_id })
        .await
        .map_err(|e| {
            error!("failed to dispatch promotion task: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(EnqueuedJobResponse {
        job_id: job.id,
        task_id,
    }))
}
