//! Promotion error types

use thiserror::Error;

/// Errors that abort a promotion transaction.
///
/// Any of these leaves the version in APPROVED; no partial writes reach
/// main-catalog readers.
#[derive(Error, Debug)]
pub enum PromotionError {
    /// Version not found by ID
    #[error("Version {0} not found")]
    VersionNotFound(i32),

    /// Promotion requires an APPROVED version
    #[error("Version {id} is {status}; only APPROVED versions can be promoted")]
    NotApproved { id: i32, status: String },

    /// A staging child points at a parent absent from its version.
    /// Should not occur while staging invariants hold; treated as an
    /// internal assertion failure.
    #[error("Staging {kind} {id} references a parent missing from its version")]
    DanglingReference { kind: &'static str, id: i32 },

    /// The main catalog rejected a value
    #[error("Main catalog constraint violation: {0}")]
    ConstraintViolation(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}
