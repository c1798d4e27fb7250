mod common;

use common::{build_workbook, scenario_workbook, Row};
use showroom::database::entities::{JobStatus, JobType};
use showroom::services::{
    ImportService, ImportSummary, JobService, StagingService, VersionService,
};

async fn import(
    db: &sea_orm::DatabaseConnection,
    version_id: i32,
    data: &[u8],
) -> showroom::database::entities::jobs::Model {
    let jobs = JobService::new(db.clone());
    let job = jobs
        .create(JobType::ExcelImport, Some(version_id))
        .await
        .unwrap();

    ImportService::new(db.clone())
        .run(job.id, version_id, Some("KR".to_string()), data, None)
        .await
        .unwrap();

    jobs.get(job.id).await.unwrap().unwrap()
}

fn summary_of(job: &showroom::database::entities::jobs::Model) -> ImportSummary {
    serde_json::from_str(job.result.as_deref().expect("job result")).expect("summary json")
}

#[tokio::test]
async fn happy_path_import_stages_full_hierarchy() {
    let db = common::setup_db().await;
    let version = VersionService::new(db.clone())
        .create("2026-1차", None, "tester")
        .await
        .unwrap();

    let job = import(&db, version.id, &scenario_workbook()).await;

    assert_eq!(job.parse_status(), JobStatus::Completed);
    let summary = summary_of(&job);
    assert!(summary.success);
    assert_eq!(summary.total_rows, 3);
    assert_eq!(summary.processed_rows, 3);
    assert_eq!(summary.brand_count, 1);
    assert_eq!(summary.vehicle_line_count, 1);
    assert_eq!(summary.model_count, 1);
    assert_eq!(summary.trim_count, 2);
    assert_eq!(summary.option_count, 1);
    assert!(summary.errors.is_empty());

    let staging = StagingService::new(db.clone());
    let brands = staging.list_brands(version.id).await.unwrap();
    assert_eq!(brands.len(), 1);
    assert_eq!(brands[0].name, "현대");
    assert_eq!(brands[0].country.as_deref(), Some("KR"));

    let lines = staging.list_vehicle_lines(brands[0].id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].name, "아반떼");

    let models = staging.list_models(lines[0].id).await.unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].name, "2026 아반떼 가솔린");
    assert_eq!(models[0].release_year, Some(2026));

    let trims = staging.list_trims(models[0].id).await.unwrap();
    assert_eq!(trims.len(), 2);
    assert_eq!(trims[0].name, "스마트");
    assert_eq!(trims[0].base_price, 20_000_000);
    assert_eq!(trims[1].name, "모던");
    assert_eq!(trims[1].base_price, 22_000_000);

    let options = staging.list_options(trims[0].id).await.unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].name, "하이패스");
    assert_eq!(options[0].category.as_deref(), Some("편의"));
    assert_eq!(options[0].price, 200_000);

    let second_trim_options = staging.list_options(trims[1].id).await.unwrap();
    assert!(second_trim_options.is_empty());
}

#[tokio::test]
async fn reupload_of_same_workbook_is_idempotent() {
    let db = common::setup_db().await;
    let version = VersionService::new(db.clone())
        .create("2026-1차", None, "tester")
        .await
        .unwrap();

    let first = import(&db, version.id, &scenario_workbook()).await;
    assert!(summary_of(&first).success);

    let (_, stats_before) = VersionService::new(db.clone())
        .get_with_stats(version.id)
        .await
        .unwrap();

    let second = import(&db, version.id, &scenario_workbook()).await;
    assert_eq!(second.parse_status(), JobStatus::Completed);
    let summary = summary_of(&second);
    assert!(summary.success);
    // everything is a reuse: counters stay at zero
    assert_eq!(summary.brand_count, 0);
    assert_eq!(summary.vehicle_line_count, 0);
    assert_eq!(summary.model_count, 0);
    assert_eq!(summary.trim_count, 0);
    assert_eq!(summary.option_count, 0);

    let (_, stats_after) = VersionService::new(db.clone())
        .get_with_stats(version.id)
        .await
        .unwrap();
    assert_eq!(stats_before, stats_after);
}

#[tokio::test]
async fn option_with_unknown_trim_is_reported_but_does_not_abort() {
    let db = common::setup_db().await;
    let version = VersionService::new(db.clone())
        .create("2026-1차", None, "tester")
        .await
        .unwrap();

    let data = build_workbook(&[(
        "현대",
        vec![
            Row::trim_row(Some("2026 아반떼"), "2026 아반떼 가솔린", "스마트", 20_000_000.0),
            Row::trim_row(None, "2026 아반떼 가솔린", "모던", 22_000_000.0),
            Row::option_row(None, "2026 아반떼 가솔린", "스마트", "편의", "하이패스", "200,000"),
            Row::option_row(None, "2026 아반떼 가솔린", "스포츠", "편의", "선루프", "500,000"),
        ],
    )]);

    let job = import(&db, version.id, &data).await;
    assert_eq!(job.parse_status(), JobStatus::Completed);

    let summary = summary_of(&job);
    assert!(!summary.success);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains("unknown trim reference"));

    // the brand still committed with the valid rows
    let staging = StagingService::new(db.clone());
    let brands = staging.list_brands(version.id).await.unwrap();
    assert_eq!(brands.len(), 1);
    let lines = staging.list_vehicle_lines(brands[0].id).await.unwrap();
    let models = staging.list_models(lines[0].id).await.unwrap();
    let trims = staging.list_trims(models[0].id).await.unwrap();
    assert_eq!(trims.len(), 2);
    assert_eq!(staging.list_options(trims[0].id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn upload_to_non_pending_version_fails_the_job() {
    let db = common::setup_db().await;
    let versions = VersionService::new(db.clone());
    let version = versions.create("2026-1차", None, "tester").await.unwrap();
    versions.approve(version.id, "reviewer").await.unwrap();

    let job = import(&db, version.id, &scenario_workbook()).await;
    assert_eq!(job.parse_status(), JobStatus::Failed);
    assert!(job
        .error_message
        .as_deref()
        .unwrap()
        .contains("not accepting uploads"));

    // nothing was staged
    let staging = StagingService::new(db.clone());
    assert!(staging.list_brands(version.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn unreadable_workbook_fails_the_job() {
    let db = common::setup_db().await;
    let version = VersionService::new(db.clone())
        .create("2026-1차", None, "tester")
        .await
        .unwrap();

    let job = import(&db, version.id, b"definitely not a spreadsheet").await;
    assert_eq!(job.parse_status(), JobStatus::Failed);
    assert!(job
        .error_message
        .as_deref()
        .unwrap()
        .contains("Failed to read workbook"));
}

#[tokio::test]
async fn empty_sheet_is_skipped_without_error() {
    let db = common::setup_db().await;
    let version = VersionService::new(db.clone())
        .create("2026-1차", None, "tester")
        .await
        .unwrap();

    let data = build_workbook(&[("빈시트", vec![])]);
    let job = import(&db, version.id, &data).await;

    assert_eq!(job.parse_status(), JobStatus::Completed);
    let summary = summary_of(&job);
    assert!(summary.success);
    assert_eq!(summary.brand_count, 0);

    let staging = StagingService::new(db.clone());
    assert!(staging.list_brands(version.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn second_ingestion_is_additive() {
    let db = common::setup_db().await;
    let version = VersionService::new(db.clone())
        .create("2026-1차", None, "tester")
        .await
        .unwrap();

    import(&db, version.id, &scenario_workbook()).await;

    // a later vendor drop adds a new trim to the same model
    let data = build_workbook(&[(
        "현대",
        vec![Row::trim_row(
            Some("2026 아반떼"),
            "2026 아반떼 가솔린",
            "인스퍼레이션",
            26_000_000.0,
        )],
    )]);
    let job = import(&db, version.id, &data).await;
    let summary = summary_of(&job);
    assert!(summary.success);
    assert_eq!(summary.brand_count, 0);
    assert_eq!(summary.trim_count, 1);

    let (_, stats) = VersionService::new(db.clone())
        .get_with_stats(version.id)
        .await
        .unwrap();
    assert_eq!(stats.trim_count, 3);
}
