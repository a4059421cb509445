use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use registrar_core::{CertificateId, DomainError, DomainResult, Entity, SectionId, StaffId, StudentId};

/// A request is purged this long after its last status change.
pub const EXPIRY_DAYS: i64 = 90;

/// Bonafide request lifecycle.
///
/// There is no terminal state: both decisions can cycle back to `Applied`
/// through a student re-request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateStatus {
    Applied,
    Approved,
    Rejected,
}

/// A reviewer's verdict on an applied request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewDecision::Approved => "approved",
            ReviewDecision::Rejected => "rejected",
        }
    }
}

impl From<ReviewDecision> for CertificateStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => CertificateStatus::Approved,
            ReviewDecision::Rejected => CertificateStatus::Rejected,
        }
    }
}

/// A bonafide certificate request.
///
/// `section_id` is captured at application time and does not track later
/// section moves. `status` is private so the legal transitions cannot be
/// bypassed: staff drive `Applied → {Approved, Rejected}` via `review`, the
/// owning student drives `{Approved, Rejected} → Applied` via `reapply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: CertificateId,
    pub student_id: StudentId,
    pub section_id: SectionId,
    pub verified_by: Option<StaffId>,
    status: CertificateStatus,
}

impl Certificate {
    /// A fresh application, status `Applied`.
    pub fn apply(id: CertificateId, student_id: StudentId, section_id: SectionId) -> Self {
        Self {
            id,
            student_id,
            section_id,
            verified_by: None,
            status: CertificateStatus::Applied,
        }
    }

    pub fn status(&self) -> CertificateStatus {
        self.status
    }

    pub fn is_applied(&self) -> bool {
        self.status == CertificateStatus::Applied
    }

    /// Whether a request last touched at `updated_at` has aged out.
    pub fn is_expired(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - updated_at > Duration::days(EXPIRY_DAYS)
    }

    /// Record a staff decision on an applied request.
    pub fn review(&mut self, reviewer: StaffId, decision: ReviewDecision) -> DomainResult<()> {
        if self.status != CertificateStatus::Applied {
            return Err(DomainError::invalid_state(
                "only an applied certificate can be reviewed",
            ));
        }
        self.status = decision.into();
        self.verified_by = Some(reviewer);
        Ok(())
    }

    /// Re-open a decided request.
    ///
    /// `verified_by` is left as-is; it is overwritten at the next review.
    pub fn reapply(&mut self) -> DomainResult<()> {
        if self.status == CertificateStatus::Applied {
            return Err(DomainError::invalid_state(
                "certificate is already awaiting review",
            ));
        }
        self.status = CertificateStatus::Applied;
        Ok(())
    }
}

impl Entity for Certificate {
    type Id = CertificateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Certificate {
        Certificate::apply(CertificateId::new(), StudentId::new(), SectionId::new())
    }

    #[test]
    fn application_starts_applied() {
        let cert = fresh();
        assert_eq!(cert.status(), CertificateStatus::Applied);
        assert!(cert.verified_by.is_none());
    }

    #[test]
    fn review_sets_status_and_reviewer() {
        let mut cert = fresh();
        let reviewer = StaffId::new();
        cert.review(reviewer, ReviewDecision::Approved).unwrap();
        assert_eq!(cert.status(), CertificateStatus::Approved);
        assert_eq!(cert.verified_by, Some(reviewer));
    }

    #[test]
    fn reviewing_a_decided_request_is_rejected() {
        let mut cert = fresh();
        cert.review(StaffId::new(), ReviewDecision::Rejected).unwrap();
        let err = cert
            .review(StaffId::new(), ReviewDecision::Approved)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn reapply_cycles_back_and_keeps_stale_reviewer() {
        let mut cert = fresh();
        let reviewer = StaffId::new();
        cert.review(reviewer, ReviewDecision::Rejected).unwrap();

        cert.reapply().unwrap();
        assert_eq!(cert.status(), CertificateStatus::Applied);
        // Stale until the next review.
        assert_eq!(cert.verified_by, Some(reviewer));
    }

    #[test]
    fn reapply_of_pending_request_is_rejected() {
        let mut cert = fresh();
        let err = cert.reapply().unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn expiry_is_ninety_days_after_last_change() {
        let updated_at = Utc::now();
        assert!(!Certificate::is_expired(
            updated_at,
            updated_at + Duration::days(EXPIRY_DAYS)
        ));
        assert!(Certificate::is_expired(
            updated_at,
            updated_at + Duration::days(EXPIRY_DAYS) + Duration::seconds(1)
        ));
    }
}
