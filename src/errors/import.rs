//! Workbook ingestion error types

use thiserror::Error;

/// Errors raised by the workbook parser and the import orchestrator.
///
/// Only `ParseFailure`, `VersionNotIngestable` and `Timeout` terminate a
/// job; data-quality problems are collected into the job result instead.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The workbook is structurally unreadable
    #[error("Failed to read workbook: {0}")]
    ParseFailure(String),

    /// Upload targeted a version that is no longer PENDING
    #[error("Version {0} is not accepting uploads")]
    VersionNotIngestable(i32),

    /// Soft deadline expired between brand sheets
    #[error("Import timed out after {completed_sheets} of {total_sheets} brand sheets")]
    Timeout {
        completed_sheets: usize,
        total_sheets: usize,
    },

    /// Upload rejected before enqueue
    #[error("Workbook is {size} bytes, above the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}
