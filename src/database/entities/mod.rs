pub mod approval_status;
pub mod job_state;
pub mod jobs;
pub mod versions;

// Staging tree, one subtree per version
pub mod staging_brands;
pub mod staging_models;
pub mod staging_options;
pub mod staging_trims;
pub mod staging_vehicle_lines;

// Main ("live") catalog, promoted from approved versions
pub mod catalog_brands;
pub mod catalog_models;
pub mod catalog_options;
pub mod catalog_trims;
pub mod catalog_vehicle_lines;

// Re-export the state enums; they are used far from the entity modules
pub use approval_status::ApprovalStatus;
pub use job_state::{JobStatus, JobType};
