mod common;

use common::scenario_workbook;
use showroom::database::entities::{ApprovalStatus, JobType};
use showroom::errors::CatalogError;
use showroom::services::{
    BrandFields, ImportService, JobService, PromotionService, StagingService, VersionService,
};

async fn stage_scenario(db: &sea_orm::DatabaseConnection, version_id: i32) {
    let job = JobService::new(db.clone())
        .create(JobType::ExcelImport, Some(version_id))
        .await
        .unwrap();
    ImportService::new(db.clone())
        .run(job.id, version_id, Some("KR".to_string()), &scenario_workbook(), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn version_names_are_unique() {
    let db = common::setup_db().await;
    let versions = VersionService::new(db.clone());

    versions.create("2026-1차", None, "tester").await.unwrap();
    let err = versions.create("2026-1차", None, "tester").await.unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateVersionName(_)));
}

#[tokio::test]
async fn approve_is_idempotent_and_migrated_is_terminal() {
    let db = common::setup_db().await;
    let versions = VersionService::new(db.clone());
    let version = versions.create("2026-1차", None, "tester").await.unwrap();

    let approved = versions.approve(version.id, "reviewer").await.unwrap();
    assert_eq!(approved.status(), ApprovalStatus::Approved);

    // second approve call is a no-op returning the current status
    let again = versions.approve(version.id, "reviewer").await.unwrap();
    assert_eq!(again.status(), ApprovalStatus::Approved);

    PromotionService::new(db.clone())
        .promote(version.id, "reviewer")
        .await
        .unwrap();

    let err = versions.approve(version.id, "reviewer").await.unwrap_err();
    assert!(matches!(err, CatalogError::InvalidTransition { .. }));
}

#[tokio::test]
async fn reject_returns_to_pending_with_note() {
    let db = common::setup_db().await;
    let versions = VersionService::new(db.clone());
    let version = versions.create("2026-1차", None, "tester").await.unwrap();

    versions.approve(version.id, "reviewer").await.unwrap();
    let rejected = versions
        .reject(version.id, "reviewer", Some("brand list incomplete"))
        .await
        .unwrap();
    assert_eq!(rejected.status(), ApprovalStatus::Pending);
    assert_eq!(rejected.rejection_note.as_deref(), Some("brand list incomplete"));

    // rejecting an already-pending version records the new note
    let re_rejected = versions
        .reject(version.id, "reviewer", Some("still incomplete"))
        .await
        .unwrap();
    assert_eq!(re_rejected.status(), ApprovalStatus::Pending);
    assert_eq!(re_rejected.rejection_note.as_deref(), Some("still incomplete"));
}

#[tokio::test]
async fn deleting_a_pending_version_removes_its_subtree() {
    let db = common::setup_db().await;
    let versions = VersionService::new(db.clone());
    let version = versions.create("2026-1차", None, "tester").await.unwrap();
    stage_scenario(&db, version.id).await;

    let (_, stats) = versions.get_with_stats(version.id).await.unwrap();
    assert_eq!(stats.brand_count, 1);

    versions.delete(version.id).await.unwrap();

    let err = versions.get(version.id).await.unwrap_err();
    assert!(matches!(err, CatalogError::VersionNotFound(_)));
    let staging = StagingService::new(db.clone());
    assert!(staging.list_brands(version.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn non_pending_versions_cannot_be_deleted() {
    let db = common::setup_db().await;
    let versions = VersionService::new(db.clone());
    let version = versions.create("2026-1차", None, "tester").await.unwrap();
    versions.approve(version.id, "reviewer").await.unwrap();

    let err = versions.delete(version.id).await.unwrap_err();
    assert!(matches!(err, CatalogError::VersionNotDeletable { .. }));
}

#[tokio::test]
async fn staging_rows_are_frozen_once_approved() {
    let db = common::setup_db().await;
    let versions = VersionService::new(db.clone());
    let version = versions.create("2026-1차", None, "tester").await.unwrap();
    stage_scenario(&db, version.id).await;

    versions.approve(version.id, "reviewer").await.unwrap();

    let staging = StagingService::new(db.clone());
    let brands = staging.list_brands(version.id).await.unwrap();

    let err = staging
        .update_brand(
            brands[0].id,
            BrandFields {
                name: "현대자동차".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::VersionNotEditable { .. }));

    let err = staging.delete_brand(brands[0].id).await.unwrap_err();
    assert!(matches!(err, CatalogError::VersionNotEditable { .. }));

    let err = staging
        .insert_brand(
            version.id,
            BrandFields {
                name: "기아".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::VersionNotEditable { .. }));
}

#[tokio::test]
async fn derived_stats_follow_staging_contents() {
    let db = common::setup_db().await;
    let versions = VersionService::new(db.clone());
    let version = versions.create("2026-1차", None, "tester").await.unwrap();

    let (_, empty_stats) = versions.get_with_stats(version.id).await.unwrap();
    assert_eq!(empty_stats.brand_count, 0);
    assert_eq!(empty_stats.option_count, 0);

    stage_scenario(&db, version.id).await;

    let (_, stats) = versions.get_with_stats(version.id).await.unwrap();
    assert_eq!(stats.brand_count, 1);
    assert_eq!(stats.vehicle_line_count, 1);
    assert_eq!(stats.model_count, 1);
    assert_eq!(stats.trim_count, 2);
    assert_eq!(stats.option_count, 1);
}

#[tokio::test]
async fn job_progress_and_terminal_states_are_guarded() {
    let db = common::setup_db().await;
    let jobs = JobService::new(db.clone());
    let job = jobs.create(JobType::ExcelImport, None).await.unwrap();

    // progress writes require PROCESSING
    assert!(jobs.set_progress(job.id, 1, Some(10)).await.is_err());

    jobs.mark_processing(job.id).await.unwrap();
    // idempotent re-entry for the retry path
    jobs.mark_processing(job.id).await.unwrap();

    jobs.set_progress(job.id, 5, Some(10)).await.unwrap();
    let current = jobs.get(job.id).await.unwrap().unwrap();
    assert_eq!(current.progress(), 50);

    jobs.fail(job.id, "worker crashed").await.unwrap();

    // terminal states are write-once
    assert!(jobs.fail(job.id, "again").await.is_err());
    assert!(jobs.complete(job.id, &serde_json::json!({})).await.is_err());
    assert!(jobs.mark_processing(job.id).await.is_err());
}
