use std::time::Instant;

use anyhow::Result;
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::database::entities::{
    staging_brands, staging_models, staging_options, staging_trims, staging_vehicle_lines,
};
use crate::errors::{CatalogError, ImportError};
use crate::services::job_service::JobService;
use crate::services::staging_service::{
    insert_brand_row, insert_model_row, insert_option_row, insert_trim_row,
    insert_vehicle_line_row, BrandFields, ModelFields, OptionFields, TrimFields,
    VehicleLineFields,
};
use crate::workbook::extractor::{extract_brand, ModelRecord, OptionRecord, TrimRecord};
use crate::workbook::parser::{parse_workbook, ParsedSheet};

/// Result blob written to the job when an import finishes.
/// `success` is true iff `errors` is empty; data-quality problems land in
/// `errors` without aborting the run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub success: bool,
    pub total_rows: i64,
    pub processed_rows: i64,
    pub brand_count: i64,
    pub vehicle_line_count: i64,
    pub model_count: i64,
    pub trim_count: i64,
    pub option_count: i64,
    pub errors: Vec<String>,
}

/// Drives one complete ingestion cycle: parse the workbook, extract the
/// hierarchy per brand sheet, and stage it under the target version, one
/// transaction per sheet. Re-running the same workbook against the same
/// version is a no-op on row counts: every insert becomes a reuse.
#[derive(Clone)]
pub struct ImportService {
    db: DatabaseConnection,
    jobs: JobService,
}

impl ImportService {
    pub fn new(db: DatabaseConnection) -> Self {
        let jobs = JobService::new(db.clone());
        Self { db, jobs }
    }

    /// Execute an import attached to `job_id`. Data problems terminate or
    /// degrade the job; an `Err` return means infrastructure trouble and
    /// is the runner's cue to retry.
    pub async fn run(
        &self,
        job_id: i32,
        version_id: i32,
        country: Option<String>,
        data: &[u8],
        soft_deadline: Option<Instant>,
    ) -> Result<()> {
        self.jobs.mark_processing(job_id).await?;

        // The version must still be accepting uploads
        match crate::services::staging_service::require_version_editable(&self.db, version_id).await
        {
            Ok(_) => {}
            Err(CatalogError::VersionNotFound(_)) | Err(CatalogError::VersionNotEditable { .. }) => {
                let err = ImportError::VersionNotIngestable(version_id);
                self.jobs.fail(job_id, &err.to_string()).await?;
                return Ok(());
            }
            Err(CatalogError::Database(e)) => return Err(e.into()),
            Err(other) => {
                self.jobs.fail(job_id, &other.to_string()).await?;
                return Ok(());
            }
        }

        let workbook = match parse_workbook(data) {
            Ok(workbook) => workbook,
            Err(err) => {
                self.jobs.fail(job_id, &err.to_string()).await?;
                return Ok(());
            }
        };

        let total_rows = workbook.total_rows() as i32;
        self.jobs.set_progress(job_id, 0, Some(total_rows)).await?;

        let mut summary = ImportSummary {
            total_rows: total_rows as i64,
            ..Default::default()
        };

        let total_sheets = workbook.sheets.len();
        for (index, sheet) in workbook.sheets.iter().enumerate() {
            if let Some(deadline) = soft_deadline {
                if Instant::now() >= deadline {
                    let err = ImportError::Timeout {
                        completed_sheets: index,
                        total_sheets,
                    };
                    self.jobs.fail(job_id, &err.to_string()).await?;
                    return Ok(());
                }
            }

            // Empty sheet: brand skipped, no rows, no error
            if sheet.records.is_empty() {
                continue;
            }

            let txn = self.db.begin().await?;
            match import_sheet(&txn, version_id, sheet, country.as_deref(), &mut summary).await {
                Ok(()) => {
                    txn.commit().await?;
                    summary.processed_rows += sheet.records.len() as i64;
                    self.jobs
                        .set_progress(job_id, summary.processed_rows as i32, None)
                        .await?;
                }
                Err(CatalogError::VersionNotEditable { .. })
                | Err(CatalogError::VersionNotFound(_)) => {
                    // An approval raced the import; later sheets would fail
                    // the same way, so the job terminates here
                    txn.rollback().await?;
                    let err = ImportError::VersionNotIngestable(version_id);
                    self.jobs.fail(job_id, &err.to_string()).await?;
                    return Ok(());
                }
                Err(CatalogError::Database(e)) => {
                    txn.rollback().await?;
                    return Err(e.into());
                }
                Err(soft) => {
                    txn.rollback().await?;
                    warn!(
                        "brand sheet '{}' rolled back: {}",
                        sheet.brand_name, soft
                    );
                    summary.errors.push(format!(
                        "brand '{}' rolled back: {}",
                        sheet.brand_name, soft
                    ));
                }
            }
        }

        summary.success = summary.errors.is_empty();
        info!(
            "import job {} finished: {} brands, {} lines, {} models, {} trims, {} options, {} errors",
            job_id,
            summary.brand_count,
            summary.vehicle_line_count,
            summary.model_count,
            summary.trim_count,
            summary.option_count,
            summary.errors.len()
        );
        self.jobs.complete(job_id, &summary).await?;
        Ok(())
    }
}

/// Stage one brand sheet inside the given transaction.
async fn import_sheet<C: ConnectionTrait>(
    conn: &C,
    version_id: i32,
    sheet: &ParsedSheet,
    country: Option<&str>,
    summary: &mut ImportSummary,
) -> Result<(), CatalogError> {
    // Re-check inside the transaction so an approve racing the import
    // cannot land rows under a frozen version
    crate::services::staging_service::require_version_editable(conn, version_id).await?;

    let (brand, brand_created) =
        ensure_brand(conn, version_id, &sheet.brand_name, country).await?;
    if brand_created {
        summary.brand_count += 1;
    }

    let extraction = extract_brand(&sheet.records);
    for warning in &extraction.warnings {
        summary.errors.push(warning.to_string());
    }

    for line in &extraction.vehicle_lines {
        let (line_row, line_created) = ensure_vehicle_line(conn, brand.id, &line.name).await?;
        if line_created {
            summary.vehicle_line_count += 1;
        }

        for model in &line.models {
            let (model_row, model_created) = ensure_model(conn, line_row.id, model).await?;
            if model_created {
                summary.model_count += 1;
            }

            for trim in &model.trims {
                let (trim_row, trim_created) = ensure_trim(conn, model_row.id, trim).await?;
                if trim_created {
                    summary.trim_count += 1;
                }

                for option in &trim.options {
                    let (_, option_created) = ensure_option(conn, trim_row.id, option).await?;
                    if option_created {
                        summary.option_count += 1;
                    }
                }
            }
        }
    }

    Ok(())
}

// Insert-or-reuse: a unique-key collision within the version reuses the
// existing row and does not bump the counters.

async fn ensure_brand<C: ConnectionTrait>(
    conn: &C,
    version_id: i32,
    name: &str,
    country: Option<&str>,
) -> Result<(staging_brands::Model, bool), CatalogError> {
    let existing = staging_brands::Entity::find()
        .filter(staging_brands::Column::VersionId.eq(version_id))
        .filter(staging_brands::Column::Name.eq(name))
        .one(conn)
        .await?;
    if let Some(brand) = existing {
        return Ok((brand, false));
    }

    let fields = BrandFields {
        name: name.to_string(),
        country: country.map(|c| c.to_string()),
        ..Default::default()
    };
    let brand = insert_brand_row(conn, version_id, &fields).await?;
    Ok((brand, true))
}

async fn ensure_vehicle_line<C: ConnectionTrait>(
    conn: &C,
    brand_id: i32,
    name: &str,
) -> Result<(staging_vehicle_lines::Model, bool), CatalogError> {
    let existing = staging_vehicle_lines::Entity::find()
        .filter(staging_vehicle_lines::Column::BrandId.eq(brand_id))
        .filter(staging_vehicle_lines::Column::Name.eq(name))
        .one(conn)
        .await?;
    if let Some(line) = existing {
        return Ok((line, false));
    }

    let fields = VehicleLineFields {
        name: name.to_string(),
        description: None,
    };
    let line = insert_vehicle_line_row(conn, brand_id, &fields).await?;
    Ok((line, true))
}

async fn ensure_model<C: ConnectionTrait>(
    conn: &C,
    vehicle_line_id: i32,
    model: &ModelRecord,
) -> Result<(staging_models::Model, bool), CatalogError> {
    // Imported models default their code to the model name; operators can
    // correct codes through staging CRUD before approval
    let existing = staging_models::Entity::find()
        .filter(staging_models::Column::VehicleLineId.eq(vehicle_line_id))
        .filter(staging_models::Column::Code.eq(model.name.clone()))
        .one(conn)
        .await?;
    if let Some(row) = existing {
        return Ok((row, false));
    }

    let fields = ModelFields {
        name: model.name.clone(),
        code: model.name.clone(),
        release_year: model.release_year,
        price: None,
        is_foreign: false,
    };
    let row = insert_model_row(conn, vehicle_line_id, &fields).await?;
    Ok((row, true))
}

async fn ensure_trim<C: ConnectionTrait>(
    conn: &C,
    model_id: i32,
    trim: &TrimRecord,
) -> Result<(staging_trims::Model, bool), CatalogError> {
    let existing = staging_trims::Entity::find()
        .filter(staging_trims::Column::ModelId.eq(model_id))
        .filter(staging_trims::Column::Name.eq(trim.name.clone()))
        .one(conn)
        .await?;
    if let Some(row) = existing {
        return Ok((row, false));
    }

    let fields = TrimFields {
        name: trim.name.clone(),
        base_price: trim.base_price,
        ..Default::default()
    };
    let row = insert_trim_row(conn, model_id, &fields).await?;
    Ok((row, true))
}

async fn ensure_option<C: ConnectionTrait>(
    conn: &C,
    trim_id: i32,
    option: &OptionRecord,
) -> Result<(staging_options::Model, bool), CatalogError> {
    let existing = staging_options::Entity::find()
        .filter(staging_options::Column::TrimId.eq(trim_id))
        .filter(staging_options::Column::Name.eq(option.name.clone()))
        .one(conn)
        .await?;
    if let Some(row) = existing {
        return Ok((row, false));
    }

    let fields = OptionFields {
        name: option.name.clone(),
        category: option.group.clone(),
        price: option.price,
        ..Default::default()
    };
    let row = insert_option_row(conn, trim_id, &fields).await?;
    Ok((row, true))
}
