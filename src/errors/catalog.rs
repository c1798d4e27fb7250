//! Staging catalog and version lifecycle error types

use thiserror::Error;

/// Errors raised by staging CRUD and the version state machine
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Version not found by ID
    #[error("Version {0} not found")]
    VersionNotFound(i32),

    /// Version name collides with an existing version
    #[error("Version '{0}' already exists")]
    DuplicateVersionName(String),

    /// Staging row not found by ID
    #[error("Staging {kind} {id} not found")]
    StagingRowNotFound {
        /// Entity kind ("brand", "vehicle line", "model", "trim", "option")
        kind: &'static str,
        id: i32,
    },

    /// Unique-key collision on first insert within a version
    #[error("Staging {kind} '{name}' already exists under parent {parent_id}")]
    DuplicateStagingName {
        kind: &'static str,
        name: String,
        parent_id: i32,
    },

    /// Referenced parent row does not exist in the target version
    #[error("Parent {kind} {id} not found")]
    MissingParent { kind: &'static str, id: i32 },

    /// Mutation attempted while the owning version is not PENDING
    #[error("Version {id} is {status}; staging rows are only editable while PENDING")]
    VersionNotEditable { id: i32, status: String },

    /// Invalid state machine transition on a version
    #[error("Version {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: i32,
        from: String,
        to: &'static str,
    },

    /// Delete attempted on a version that is no longer PENDING
    #[error("Version {id} is {status} and can no longer be deleted")]
    VersionNotDeletable { id: i32, status: String },

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}
