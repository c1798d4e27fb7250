pub mod import_service;
pub mod job_service;
pub mod promotion_service;
pub mod staging_service;
pub mod version_service;

pub use import_service::{ImportService, ImportSummary};
pub use job_service::JobService;
pub use promotion_service::{PromotionService, PromotionSummary};
pub use staging_service::{
    BrandFields, ModelFields, OptionFields, StagingService, TrimFields, VehicleLineFields,
    VersionStats,
};
pub use version_service::VersionService;
