use serde::{Deserialize, Serialize};

/// Approval state of a workspace version
///
/// A version is created PENDING, moves forward to APPROVED and then
/// MIGRATED, and can only move backwards through an explicit rejection
/// while still APPROVED has not been reached:
///
/// ```text
/// PENDING --approve--> APPROVED --migrate--> MIGRATED
///    ^                    |
///    +------reject--------+
/// ```
///
/// Transitions go through the methods below; callers never assign the
/// column directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalStatus {
    /// Accepting uploads and staging edits
    Pending,
    /// Frozen for review, awaiting promotion
    Approved,
    /// Promoted into the main catalog
    Migrated,
}

impl ApprovalStatus {
    /// Convert to the database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "PENDING",
            ApprovalStatus::Approved => "APPROVED",
            ApprovalStatus::Migrated => "MIGRATED",
        }
    }

    /// Parse from the database string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(ApprovalStatus::Pending),
            "APPROVED" => Some(ApprovalStatus::Approved),
            "MIGRATED" => Some(ApprovalStatus::Migrated),
            _ => None,
        }
    }

    /// Whether the version still accepts workbook uploads and staging edits
    pub fn is_editable(&self) -> bool {
        matches!(self, ApprovalStatus::Pending)
    }

    /// PENDING -> APPROVED
    pub fn approve(self) -> Result<Self, Self> {
        match self {
            ApprovalStatus::Pending => Ok(ApprovalStatus::Approved),
            other => Err(other),
        }
    }

    /// APPROVED -> PENDING. Rejection of an already-PENDING version is a
    /// no-op so operators can re-record a note.
    pub fn reject(self) -> Result<Self, Self> {
        match self {
            ApprovalStatus::Approved | ApprovalStatus::Pending => Ok(ApprovalStatus::Pending),
            other => Err(other),
        }
    }

    /// APPROVED -> MIGRATED
    pub fn migrate(self) -> Result<Self, Self> {
        match self {
            ApprovalStatus::Approved => Ok(ApprovalStatus::Migrated),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ApprovalStatus::Pending,
            ApprovalStatus::Approved,
            ApprovalStatus::Migrated,
        ] {
            assert_eq!(ApprovalStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(ApprovalStatus::from_str("invalid"), None);
    }

    #[test]
    fn test_forward_transitions() {
        let approved = ApprovalStatus::Pending.approve().unwrap();
        assert_eq!(approved, ApprovalStatus::Approved);
        assert_eq!(approved.migrate().unwrap(), ApprovalStatus::Migrated);
    }

    #[test]
    fn test_migrated_is_terminal() {
        assert!(ApprovalStatus::Migrated.approve().is_err());
        assert!(ApprovalStatus::Migrated.reject().is_err());
        assert!(ApprovalStatus::Migrated.migrate().is_err());
    }

    #[test]
    fn test_reject_returns_to_pending() {
        assert_eq!(
            ApprovalStatus::Approved.reject().unwrap(),
            ApprovalStatus::Pending
        );
        // idempotent on an already-pending version
        assert_eq!(
            ApprovalStatus::Pending.reject().unwrap(),
            ApprovalStatus::Pending
        );
    }
}
