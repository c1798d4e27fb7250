use serde::{Deserialize, Serialize};

/// Status of an asynchronous job
///
/// ```text
/// PENDING -> PROCESSING -> COMPLETED
///                      \-> FAILED
/// ```
///
/// Terminal states are write-once; `mark_processing` tolerates a repeat
/// call so the runner can retry a crashed task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Convert to the database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Processing => "PROCESSING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
        }
    }

    /// Parse from the database string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(JobStatus::Pending),
            "PROCESSING" => Some(JobStatus::Processing),
            "COMPLETED" => Some(JobStatus::Completed),
            "FAILED" => Some(JobStatus::Failed),
            _ => None,
        }
    }

    /// PENDING -> PROCESSING; idempotent when already PROCESSING
    pub fn start(self) -> Result<Self, Self> {
        match self {
            JobStatus::Pending | JobStatus::Processing => Ok(JobStatus::Processing),
            other => Err(other),
        }
    }

    /// PROCESSING -> COMPLETED
    pub fn complete(self) -> Result<Self, Self> {
        match self {
            JobStatus::Processing => Ok(JobStatus::Completed),
            other => Err(other),
        }
    }

    /// PENDING | PROCESSING -> FAILED
    pub fn fail(self) -> Result<Self, Self> {
        match self {
            JobStatus::Pending | JobStatus::Processing => Ok(JobStatus::Failed),
            other => Err(other),
        }
    }

    /// Whether the job can no longer change state
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Kind of work a job tracks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    ExcelImport,
    Promotion,
    WebCrawling,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::ExcelImport => "EXCEL_IMPORT",
            JobType::Promotion => "PROMOTION",
            JobType::WebCrawling => "WEB_CRAWLING",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "EXCEL_IMPORT" => Some(JobType::ExcelImport),
            "PROMOTION" => Some(JobType::Promotion),
            "WEB_CRAWLING" => Some(JobType::WebCrawling),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            JobStatus::Pending,
            JobStatus::Processing,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(JobStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_terminal_states_are_write_once() {
        assert!(JobStatus::Completed.start().is_err());
        assert!(JobStatus::Completed.fail().is_err());
        assert!(JobStatus::Failed.start().is_err());
        assert!(JobStatus::Failed.complete().is_err());
    }

    #[test]
    fn test_start_is_idempotent() {
        assert_eq!(
            JobStatus::Processing.start().unwrap(),
            JobStatus::Processing
        );
    }

    #[test]
    fn test_pending_can_fail_directly() {
        // enqueue-time precondition failures never reach PROCESSING
        assert_eq!(JobStatus::Pending.fail().unwrap(), JobStatus::Failed);
    }

    #[test]
    fn test_job_type_roundtrip() {
        for job_type in [JobType::ExcelImport, JobType::Promotion, JobType::WebCrawling] {
            assert_eq!(JobType::from_str(job_type.as_str()), Some(job_type));
        }
        assert_eq!(JobType::from_str("other"), None);
    }
}
