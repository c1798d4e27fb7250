mod common;

use common::{build_workbook, scenario_workbook, Row};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use showroom::database::entities::{
    catalog_brands, catalog_models, catalog_options, catalog_trims, catalog_vehicle_lines,
    ApprovalStatus, JobStatus, JobType,
};
use showroom::errors::PromotionError;
use showroom::services::{ImportService, JobService, PromotionService, VersionService};

async fn staged_version(db: &sea_orm::DatabaseConnection, name: &str, data: &[u8]) -> i32 {
    let version = VersionService::new(db.clone())
        .create(name, None, "tester")
        .await
        .unwrap();
    let job = JobService::new(db.clone())
        .create(JobType::ExcelImport, Some(version.id))
        .await
        .unwrap();
    ImportService::new(db.clone())
        .run(job.id, version.id, Some("KR".to_string()), data, None)
        .await
        .unwrap();
    version.id
}

async fn catalog_counts(db: &sea_orm::DatabaseConnection) -> (usize, usize, usize, usize, usize) {
    (
        catalog_brands::Entity::find().all(db).await.unwrap().len(),
        catalog_vehicle_lines::Entity::find().all(db).await.unwrap().len(),
        catalog_models::Entity::find().all(db).await.unwrap().len(),
        catalog_trims::Entity::find().all(db).await.unwrap().len(),
        catalog_options::Entity::find().all(db).await.unwrap().len(),
    )
}

#[tokio::test]
async fn promotion_requires_an_approved_version() {
    let db = common::setup_db().await;
    let version_id = staged_version(&db, "2026-1차", &scenario_workbook()).await;

    let err = PromotionService::new(db.clone())
        .promote(version_id, "reviewer")
        .await
        .unwrap_err();
    assert!(matches!(err, PromotionError::NotApproved { .. }));

    // nothing leaked into the main catalog
    assert_eq!(catalog_counts(&db).await, (0, 0, 0, 0, 0));
}

#[tokio::test]
async fn promotion_inserts_the_full_tree_and_migrates_the_version() {
    let db = common::setup_db().await;
    let versions = VersionService::new(db.clone());
    let version_id = staged_version(&db, "2026-1차", &scenario_workbook()).await;
    versions.approve(version_id, "reviewer").await.unwrap();

    let summary = PromotionService::new(db.clone())
        .promote(version_id, "reviewer")
        .await
        .unwrap();

    assert_eq!(summary.brand_count, 1);
    assert_eq!(summary.vehicle_line_count, 1);
    assert_eq!(summary.model_count, 1);
    assert_eq!(summary.trim_count, 2);
    assert_eq!(summary.option_count, 1);

    let version = versions.get(version_id).await.unwrap();
    assert_eq!(version.status(), ApprovalStatus::Migrated);

    assert_eq!(catalog_counts(&db).await, (1, 1, 1, 2, 1));
    let brand = catalog_brands::Entity::find()
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(brand.name, "현대");
    assert_eq!(brand.country.as_deref(), Some("KR"));
}

#[tokio::test]
async fn repromoting_equal_contents_leaves_the_catalog_unchanged() {
    let db = common::setup_db().await;
    let versions = VersionService::new(db.clone());

    let v1 = staged_version(&db, "2026-1차", &scenario_workbook()).await;
    versions.approve(v1, "reviewer").await.unwrap();
    PromotionService::new(db.clone())
        .promote(v1, "reviewer")
        .await
        .unwrap();

    let before = catalog_counts(&db).await;
    let model_before = catalog_models::Entity::find()
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    // a second version with identical staged contents
    let v2 = staged_version(&db, "2026-2차", &scenario_workbook()).await;
    versions.approve(v2, "reviewer").await.unwrap();
    PromotionService::new(db.clone())
        .promote(v2, "reviewer")
        .await
        .unwrap();

    let after = catalog_counts(&db).await;
    assert_eq!(before, after);

    let model_after = catalog_models::Entity::find()
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(model_before.id, model_after.id);
    assert_eq!(model_before.code, model_after.code);
    assert_eq!(model_before.name, model_after.name);
    assert_eq!(model_before.release_year, model_after.release_year);
}

#[tokio::test]
async fn renamed_trim_is_added_and_the_old_row_remains() {
    let db = common::setup_db().await;
    let versions = VersionService::new(db.clone());

    let v1 = staged_version(&db, "2026-1차", &scenario_workbook()).await;
    versions.approve(v1, "reviewer").await.unwrap();
    PromotionService::new(db.clone())
        .promote(v1, "reviewer")
        .await
        .unwrap();

    let model = catalog_models::Entity::find()
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    // same model code, trim "모던" renamed to "모던 플러스"
    let renamed = build_workbook(&[(
        "현대",
        vec![
            Row::trim_row(Some("2026 아반떼"), "2026 아반떼 가솔린", "스마트", 20_000_000.0),
            Row::trim_row(None, "2026 아반떼 가솔린", "모던 플러스", 22_500_000.0),
        ],
    )]);
    let v2 = staged_version(&db, "2026-2차", &renamed).await;
    versions.approve(v2, "reviewer").await.unwrap();
    PromotionService::new(db.clone())
        .promote(v2, "reviewer")
        .await
        .unwrap();

    // the model row is untouched, keyed by its code
    let model_after = catalog_models::Entity::find()
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(model.id, model_after.id);

    // promotion never deletes: the old trim remains next to the new one
    let trims = catalog_trims::Entity::find()
        .filter(catalog_trims::Column::ModelId.eq(model.id))
        .all(&db)
        .await
        .unwrap();
    let names: Vec<&str> = trims.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(trims.len(), 3);
    assert!(names.contains(&"스마트"));
    assert!(names.contains(&"모던"));
    assert!(names.contains(&"모던 플러스"));
}

#[tokio::test]
async fn promotion_updates_brand_attributes_on_natural_key_match() {
    let db = common::setup_db().await;
    let versions = VersionService::new(db.clone());

    let v1 = staged_version(&db, "2026-1차", &scenario_workbook()).await;
    versions.approve(v1, "reviewer").await.unwrap();
    PromotionService::new(db.clone())
        .promote(v1, "reviewer")
        .await
        .unwrap();

    // second version imports the same brand under a different country
    let v2 = VersionService::new(db.clone())
        .create("2026-2차", None, "tester")
        .await
        .unwrap()
        .id;
    let job = JobService::new(db.clone())
        .create(JobType::ExcelImport, Some(v2))
        .await
        .unwrap();
    ImportService::new(db.clone())
        .run(job.id, v2, Some("DE".to_string()), &scenario_workbook(), None)
        .await
        .unwrap();
    versions.approve(v2, "reviewer").await.unwrap();
    PromotionService::new(db.clone())
        .promote(v2, "reviewer")
        .await
        .unwrap();

    let brands = catalog_brands::Entity::find().all(&db).await.unwrap();
    assert_eq!(brands.len(), 1);
    assert_eq!(brands[0].country.as_deref(), Some("DE"));
}

#[tokio::test]
async fn promotion_job_wrapper_records_the_summary() {
    let db = common::setup_db().await;
    let versions = VersionService::new(db.clone());
    let version_id = staged_version(&db, "2026-1차", &scenario_workbook()).await;
    versions.approve(version_id, "reviewer").await.unwrap();

    let jobs = JobService::new(db.clone());
    let job = jobs
        .create(JobType::Promotion, Some(version_id))
        .await
        .unwrap();
    PromotionService::new(db.clone())
        .run(job.id, version_id)
        .await
        .unwrap();

    let job = jobs.get(job.id).await.unwrap().unwrap();
    assert_eq!(job.parse_status(), JobStatus::Completed);
    let result: serde_json::Value =
        serde_json::from_str(job.result.as_deref().unwrap()).unwrap();
    assert_eq!(result["trim_count"], 2);
}

#[tokio::test]
async fn failed_promotion_leaves_the_version_approved() {
    let db = common::setup_db().await;
    let versions = VersionService::new(db.clone());
    let version_id = staged_version(&db, "2026-1차", &scenario_workbook()).await;
    // not approved: the job wrapper fails the job and the version stays put
    let jobs = JobService::new(db.clone());
    let job = jobs
        .create(JobType::Promotion, Some(version_id))
        .await
        .unwrap();
    PromotionService::new(db.clone())
        .run(job.id, version_id)
        .await
        .unwrap();

    let job = jobs.get(job.id).await.unwrap().unwrap();
    assert_eq!(job.parse_status(), JobStatus::Failed);

    let version = versions.get(version_id).await.unwrap();
    assert_eq!(version.status(), ApprovalStatus::Pending);
    assert_eq!(catalog_counts(&db).await, (0, 0, 0, 0, 0));
}
