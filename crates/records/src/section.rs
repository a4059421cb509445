use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use registrar_core::{DomainError, DomainResult, Entity, SectionId, StaffId, StudentId};

/// A section: one or more supervising staff and zero or more students.
///
/// The membership sets are private on purpose: every change goes through a
/// transition method so the cardinality invariants cannot be bypassed. The
/// paired back-references on `Staff`/`Student` documents are maintained by the
/// membership manager, which calls these transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    id: SectionId,
    name: String,
    staff_ids: BTreeSet<StaffId>,
    student_ids: BTreeSet<StudentId>,
}

impl Section {
    pub fn new(id: SectionId, name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("section name must not be empty"));
        }
        Ok(Self {
            id,
            name,
            staff_ids: BTreeSet::new(),
            student_ids: BTreeSet::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn staff_ids(&self) -> &BTreeSet<StaffId> {
        &self.staff_ids
    }

    pub fn student_ids(&self) -> &BTreeSet<StudentId> {
        &self.student_ids
    }

    pub fn contains_staff(&self, staff_id: StaffId) -> bool {
        self.staff_ids.contains(&staff_id)
    }

    pub fn contains_student(&self, student_id: StudentId) -> bool {
        self.student_ids.contains(&student_id)
    }

    pub fn rename(&mut self, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("section name must not be empty"));
        }
        self.name = name;
        Ok(())
    }

    /// Add a staff member to the section roster.
    pub fn admit_staff(&mut self, staff_id: StaffId) -> DomainResult<()> {
        if !self.staff_ids.insert(staff_id) {
            return Err(DomainError::conflict("staff already assigned to this section"));
        }
        Ok(())
    }

    /// Remove a staff member from the roster.
    ///
    /// Rejected when the removal would leave students without any supervising
    /// staff.
    pub fn withdraw_staff(&mut self, staff_id: StaffId) -> DomainResult<()> {
        if !self.staff_ids.contains(&staff_id) {
            return Err(DomainError::conflict("staff is not a member of this section"));
        }
        if self.staff_ids.len() == 1 && !self.student_ids.is_empty() {
            return Err(DomainError::conflict(
                "section should contain at least one staff",
            ));
        }
        self.staff_ids.remove(&staff_id);
        Ok(())
    }

    /// Add a student to the section roster.
    ///
    /// A section must have a supervising staff member before accepting
    /// students.
    pub fn admit_student(&mut self, student_id: StudentId) -> DomainResult<()> {
        if self.staff_ids.is_empty() {
            return Err(DomainError::conflict(
                "section must have a staff member before accepting students",
            ));
        }
        if !self.student_ids.insert(student_id) {
            return Err(DomainError::conflict(
                "student already assigned to this section",
            ));
        }
        Ok(())
    }

    /// Remove a student from the roster.
    pub fn withdraw_student(&mut self, student_id: StudentId) -> DomainResult<()> {
        if !self.student_ids.remove(&student_id) {
            return Err(DomainError::conflict(
                "student is not a member of this section",
            ));
        }
        Ok(())
    }
}

impl Entity for Section {
    type Id = SectionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> Section {
        Section::new(SectionId::new(), "III CSE A").unwrap()
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Section::new(SectionId::new(), "  ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn admit_staff_twice_conflicts() {
        let mut s = section();
        let t1 = StaffId::new();
        s.admit_staff(t1).unwrap();
        let err = s.admit_staff(t1).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn students_require_a_staff_member() {
        let mut s = section();
        let err = s.admit_student(StudentId::new()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        s.admit_staff(StaffId::new()).unwrap();
        s.admit_student(StudentId::new()).unwrap();
    }

    #[test]
    fn last_staff_cannot_leave_while_students_remain() {
        let mut s = section();
        let t1 = StaffId::new();
        let p1 = StudentId::new();
        s.admit_staff(t1).unwrap();
        s.admit_student(p1).unwrap();

        let err = s.withdraw_staff(t1).unwrap_err();
        assert_eq!(
            err,
            DomainError::conflict("section should contain at least one staff")
        );

        s.withdraw_student(p1).unwrap();
        s.withdraw_staff(t1).unwrap();
        assert!(s.staff_ids().is_empty());
    }

    #[test]
    fn second_staff_frees_the_first() {
        let mut s = section();
        let t1 = StaffId::new();
        let t2 = StaffId::new();
        s.admit_staff(t1).unwrap();
        s.admit_staff(t2).unwrap();
        s.admit_student(StudentId::new()).unwrap();

        s.withdraw_staff(t1).unwrap();
        assert!(s.contains_staff(t2));
        assert!(!s.contains_staff(t1));
    }

    #[test]
    fn withdrawing_non_member_conflicts() {
        let mut s = section();
        assert!(matches!(
            s.withdraw_staff(StaffId::new()).unwrap_err(),
            DomainError::Conflict(_)
        ));
        assert!(matches!(
            s.withdraw_student(StudentId::new()).unwrap_err(),
            DomainError::Conflict(_)
        ));
    }
}
