//! Domain-specific error types for showroom
//!
//! Structured error types for the three domains of the service:
//!
//! - **CatalogError**: staging CRUD and version lifecycle violations
//! - **ImportError**: workbook ingestion failures
//! - **PromotionError**: staging-to-catalog promotion failures
//!
//! Services return `anyhow::Result` at their seams; these enums carry the
//! cases callers branch on (unique-key collisions, missing parents, state
//! machine violations) and downcast cleanly through `anyhow`.

pub mod catalog;
pub mod import;
pub mod promotion;

pub use catalog::CatalogError;
pub use import::ImportError;
pub use promotion::PromotionError;

/// Result type alias for staging catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
