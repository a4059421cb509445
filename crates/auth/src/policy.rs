use registrar_core::{DomainError, DomainResult, SectionId, StaffId, StudentId};

use crate::{AuthClaims, Role};

/// An operation a caller wants to perform, with the resource context the
/// policy needs to scope it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create/delete sections, move members between them.
    ManageSections,
    /// Create/update/delete staff records.
    ManageStaff,
    /// Create/update/delete student records.
    ManageStudents,

    /// Review (approve/reject) certificate requests raised in a section.
    ReviewCertificates { section_id: SectionId },
    /// List students or certificate queues of a section.
    ViewSection { section_id: SectionId },
    /// Update a staff member's own contact details.
    UpdateStaffProfile { staff_id: StaffId },

    /// Apply/re-apply for a bonafide certificate.
    RequestCertificate { student_id: StudentId },
    /// Read a student's own profile or certificate status.
    ViewStudentRecords { student_id: StudentId },
    /// Update a student's own contact details.
    UpdateStudentProfile { student_id: StudentId },
}

/// A fully resolved caller for authorization decisions.
///
/// `section_id` is the section the caller belongs to, resolved from the
/// record store by the caller of this module (staff callers only).
/// Construction is intentionally decoupled from storage and transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub claims: AuthClaims,
    pub section_id: Option<SectionId>,
}

impl Caller {
    pub fn new(claims: AuthClaims) -> Self {
        Self {
            claims,
            section_id: None,
        }
    }

    pub fn with_section(claims: AuthClaims, section_id: Option<SectionId>) -> Self {
        Self { claims, section_id }
    }
}

/// Authorize a caller for an action.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
///
/// Denial is always an explicit `Unauthorized`, never a silent no-op.
pub fn authorize(caller: &Caller, action: &Action) -> DomainResult<()> {
    let role = caller.claims.role;
    let granted = match action {
        Action::ManageSections | Action::ManageStaff | Action::ManageStudents => {
            role == Role::Admin
        }

        Action::ReviewCertificates { section_id } | Action::ViewSection { section_id } => {
            role == Role::Staff && caller.section_id == Some(*section_id)
        }
        Action::UpdateStaffProfile { staff_id } => {
            caller.claims.staff_id() == Some(*staff_id)
        }

        Action::RequestCertificate { student_id }
        | Action::ViewStudentRecords { student_id }
        | Action::UpdateStudentProfile { student_id } => {
            caller.claims.student_id() == Some(*student_id)
        }
    };

    if granted {
        Ok(())
    } else {
        Err(DomainError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn claims_for(role: Role) -> AuthClaims {
        let now = Utc::now();
        AuthClaims {
            subject: Uuid::now_v7(),
            role,
            name: "caller".to_string(),
            issued_at: now,
            expires_at: now + Duration::hours(1),
        }
    }

    #[test]
    fn admin_actions_require_admin_role() {
        let admin = Caller::new(claims_for(Role::Admin));
        let staff = Caller::new(claims_for(Role::Staff));

        assert!(authorize(&admin, &Action::ManageSections).is_ok());
        assert_eq!(
            authorize(&staff, &Action::ManageSections),
            Err(DomainError::Unauthorized)
        );
    }

    #[test]
    fn staff_section_scope_is_enforced() {
        let own = SectionId::new();
        let other = SectionId::new();
        let caller = Caller::with_section(claims_for(Role::Staff), Some(own));

        assert!(authorize(&caller, &Action::ReviewCertificates { section_id: own }).is_ok());
        assert_eq!(
            authorize(&caller, &Action::ReviewCertificates { section_id: other }),
            Err(DomainError::Unauthorized)
        );
    }

    #[test]
    fn staff_without_section_cannot_review() {
        let caller = Caller::new(claims_for(Role::Staff));
        let section_id = SectionId::new();
        assert_eq!(
            authorize(&caller, &Action::ViewSection { section_id }),
            Err(DomainError::Unauthorized)
        );
    }

    #[test]
    fn student_ownership_is_enforced() {
        let claims = claims_for(Role::Student);
        let own = StudentId::from_uuid(claims.subject);
        let caller = Caller::new(claims);

        assert!(authorize(&caller, &Action::RequestCertificate { student_id: own }).is_ok());
        assert_eq!(
            authorize(
                &caller,
                &Action::RequestCertificate {
                    student_id: StudentId::new()
                }
            ),
            Err(DomainError::Unauthorized)
        );
    }

    #[test]
    fn student_cannot_use_staff_actions() {
        let claims = claims_for(Role::Student);
        let caller = Caller::new(claims.clone());
        assert_eq!(
            authorize(
                &caller,
                &Action::UpdateStaffProfile {
                    staff_id: StaffId::from_uuid(claims.subject)
                }
            ),
            Err(DomainError::Unauthorized)
        );
    }
}
