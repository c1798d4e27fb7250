use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::errors::CatalogError;

pub mod health;
pub mod jobs;
pub mod staging;
pub mod versions;

/// Common pagination query parameters; `page` is zero-based.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_per_page() -> u64 {
    50
}

/// One page of a listing.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Map staging/version domain errors onto response codes.
pub(crate) fn catalog_status(err: &CatalogError) -> StatusCode {
    match err {
        CatalogError::VersionNotFound(_)
        | CatalogError::StagingRowNotFound { .. }
        | CatalogError::MissingParent { .. } => StatusCode::NOT_FOUND,
        CatalogError::DuplicateVersionName(_)
        | CatalogError::DuplicateStagingName { .. }
        | CatalogError::InvalidTransition { .. }
        | CatalogError::VersionNotEditable { .. }
        | CatalogError::VersionNotDeletable { .. } => StatusCode::CONFLICT,
        CatalogError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
