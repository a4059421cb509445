//! Section↔Staff↔Student membership manager.
//!
//! Keeps the bidirectional relationship (roster set on the section, single
//! back-reference on the member) consistent across two documents that the
//! store only updates one at a time. Writes go member-first, section-second;
//! a failed second write is compensated by rolling the first back, and a
//! failed rollback surfaces as `Inconsistent`.
//!
//! All mutations serialize through one mutex, so concurrent calls touching
//! the same section cannot interleave their read-check-write cycles.

use std::collections::BTreeSet;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use registrar_core::{
    DomainError, DomainResult, Document, Entity, SectionId, StaffId, StudentId,
};
use registrar_records::{
    ContactUpdate, Section, Staff, StaffProfile, Student, StudentProfile,
};

use crate::entity_store::EntityStore;

/// Section state returned by every membership operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSnapshot {
    pub id: SectionId,
    pub name: String,
    pub staff_ids: BTreeSet<StaffId>,
    pub student_ids: BTreeSet<StudentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document<Section>> for SectionSnapshot {
    fn from(doc: Document<Section>) -> Self {
        Self {
            id: *doc.body.id(),
            name: doc.body.name().to_string(),
            staff_ids: doc.body.staff_ids().clone(),
            student_ids: doc.body.student_ids().clone(),
            created_at: doc.timestamps.created_at,
            updated_at: doc.timestamps.updated_at,
        }
    }
}

/// Maintains section rosters and member back-references.
pub struct MembershipManager<S> {
    store: S,
    /// Serializes every roster mutation; the member write and the section
    /// write are not transactional, so interleaved cycles lose updates.
    mutation_lock: Mutex<()>,
}

impl<S: EntityStore> MembershipManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            mutation_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn lock(&self) -> DomainResult<std::sync::MutexGuard<'_, ()>> {
        self.mutation_lock
            .lock()
            .map_err(|_| DomainError::inconsistent("membership lock poisoned"))
    }

    // ── Admin-side record creation ───────────────────────────────────────

    pub fn create_section(&self, name: &str) -> DomainResult<SectionSnapshot> {
        let section = Section::new(SectionId::new(), name)?;
        Ok(self.store.insert_section(section)?.into())
    }

    pub fn create_staff(&self, profile: StaffProfile) -> DomainResult<Document<Staff>> {
        let staff = Staff::new(StaffId::new(), profile)?;
        Ok(self.store.insert_staff(staff)?)
    }

    pub fn create_student(&self, profile: StudentProfile) -> DomainResult<Document<Student>> {
        let student = Student::new(StudentId::new(), profile)?;
        Ok(self.store.insert_student(student)?)
    }

    pub fn update_staff_contact(
        &self,
        staff_id: StaffId,
        update: &ContactUpdate,
    ) -> DomainResult<Document<Staff>> {
        let mut staff = self
            .store
            .find_staff(staff_id)?
            .ok_or(DomainError::NotFound)?
            .body;
        staff.apply_contact_update(update)?;
        Ok(self.store.update_staff(staff)?)
    }

    pub fn update_student_contact(
        &self,
        student_id: StudentId,
        update: &ContactUpdate,
    ) -> DomainResult<Document<Student>> {
        let mut student = self
            .store
            .find_student(student_id)?
            .ok_or(DomainError::NotFound)?
            .body;
        student.apply_contact_update(update)?;
        Ok(self.store.update_student(student)?)
    }

    pub fn rename_section(
        &self,
        section_id: SectionId,
        name: &str,
    ) -> DomainResult<SectionSnapshot> {
        // Whole-document write; takes the roster lock so it cannot clobber a
        // concurrent membership update.
        let _guard = self.lock()?;

        let mut section = self
            .store
            .find_section(section_id)?
            .ok_or(DomainError::NotFound)?
            .body;
        section.rename(name)?;
        Ok(self.store.update_section(section)?.into())
    }

    pub fn section(&self, section_id: SectionId) -> DomainResult<SectionSnapshot> {
        Ok(self
            .store
            .find_section(section_id)?
            .ok_or(DomainError::NotFound)?
            .into())
    }

    // ── Roster mutations ─────────────────────────────────────────────────

    /// Put a staff member in charge of a section.
    pub fn assign_staff(
        &self,
        section_id: SectionId,
        staff_id: StaffId,
    ) -> DomainResult<SectionSnapshot> {
        let _guard = self.lock()?;

        let mut section = self
            .store
            .find_section(section_id)?
            .ok_or(DomainError::NotFound)?
            .body;
        let mut staff = self
            .store
            .find_staff(staff_id)?
            .ok_or(DomainError::NotFound)?
            .body;

        if staff.section_id.is_some() {
            return Err(DomainError::conflict("staff already assigned to a section"));
        }
        section.admit_staff(staff_id)?;

        staff.section_id = Some(section_id);
        self.store.update_staff(staff.clone())?;

        match self.store.update_section(section) {
            Ok(doc) => Ok(doc.into()),
            Err(err) => {
                staff.section_id = None;
                self.roll_back_staff(staff, section_id, err)
            }
        }
    }

    /// Release a staff member from a section.
    pub fn release_staff(
        &self,
        section_id: SectionId,
        staff_id: StaffId,
    ) -> DomainResult<SectionSnapshot> {
        let _guard = self.lock()?;

        let mut section = self
            .store
            .find_section(section_id)?
            .ok_or(DomainError::NotFound)?
            .body;
        let mut staff = self
            .store
            .find_staff(staff_id)?
            .ok_or(DomainError::NotFound)?
            .body;

        if staff.section_id != Some(section_id) {
            return Err(DomainError::conflict("staff is not a member of this section"));
        }
        section.withdraw_staff(staff_id)?;

        staff.section_id = None;
        self.store.update_staff(staff.clone())?;

        match self.store.update_section(section) {
            Ok(doc) => Ok(doc.into()),
            Err(err) => {
                staff.section_id = Some(section_id);
                self.roll_back_staff(staff, section_id, err)
            }
        }
    }

    /// Enrol a student into a section.
    pub fn assign_student(
        &self,
        section_id: SectionId,
        student_id: StudentId,
    ) -> DomainResult<SectionSnapshot> {
        let _guard = self.lock()?;

        let mut section = self
            .store
            .find_section(section_id)?
            .ok_or(DomainError::NotFound)?
            .body;
        let mut student = self
            .store
            .find_student(student_id)?
            .ok_or(DomainError::NotFound)?
            .body;

        if student.section_id.is_some() {
            return Err(DomainError::conflict(
                "student already assigned to a section",
            ));
        }
        section.admit_student(student_id)?;

        student.section_id = Some(section_id);
        self.store.update_student(student.clone())?;

        match self.store.update_section(section) {
            Ok(doc) => Ok(doc.into()),
            Err(err) => {
                student.section_id = None;
                self.roll_back_student(student, section_id, err)
            }
        }
    }

    /// Release a student from a section.
    pub fn release_student(
        &self,
        section_id: SectionId,
        student_id: StudentId,
    ) -> DomainResult<SectionSnapshot> {
        let _guard = self.lock()?;

        let mut section = self
            .store
            .find_section(section_id)?
            .ok_or(DomainError::NotFound)?
            .body;
        let mut student = self
            .store
            .find_student(student_id)?
            .ok_or(DomainError::NotFound)?
            .body;

        if student.section_id != Some(section_id) {
            return Err(DomainError::conflict(
                "student is not a member of this section",
            ));
        }
        section.withdraw_student(student_id)?;

        student.section_id = None;
        self.store.update_student(student.clone())?;

        match self.store.update_section(section) {
            Ok(doc) => Ok(doc.into()),
            Err(err) => {
                student.section_id = Some(section_id);
                self.roll_back_student(student, section_id, err)
            }
        }
    }

    // ── Deletions ────────────────────────────────────────────────────────

    /// Delete a section, cascade-clearing every member's back-reference.
    ///
    /// The section document goes first; a back-reference clear that fails
    /// afterwards is a detected partial write and surfaces as
    /// `Inconsistent`.
    pub fn delete_section(&self, section_id: SectionId) -> DomainResult<SectionSnapshot> {
        let _guard = self.lock()?;

        let removed = self.store.delete_section(section_id)?;

        let mut failures = Vec::new();
        for staff_id in removed.body.staff_ids() {
            match self.store.find_staff(*staff_id) {
                Ok(Some(doc)) => {
                    let mut staff = doc.body;
                    staff.section_id = None;
                    if let Err(err) = self.store.update_staff(staff) {
                        failures.push(format!("staff {staff_id}: {err}"));
                    }
                }
                Ok(None) => {}
                Err(err) => failures.push(format!("staff {staff_id}: {err}")),
            }
        }
        for student_id in removed.body.student_ids() {
            match self.store.find_student(*student_id) {
                Ok(Some(doc)) => {
                    let mut student = doc.body;
                    student.section_id = None;
                    if let Err(err) = self.store.update_student(student) {
                        failures.push(format!("student {student_id}: {err}"));
                    }
                }
                Ok(None) => {}
                Err(err) => failures.push(format!("student {student_id}: {err}")),
            }
        }

        if failures.is_empty() {
            Ok(removed.into())
        } else {
            let detail = failures.join("; ");
            tracing::error!(
                section_id = %section_id,
                detail = %detail,
                "section deleted but back-reference clears failed"
            );
            Err(DomainError::inconsistent(format!(
                "section {section_id} deleted but back-references remain: {detail}"
            )))
        }
    }

    /// Delete a staff record, pulling it from its section's roster first.
    ///
    /// Fails with `Conflict` if the section would lose its only staff while
    /// students remain.
    pub fn delete_staff(&self, staff_id: StaffId) -> DomainResult<()> {
        let _guard = self.lock()?;

        let staff = self
            .store
            .find_staff(staff_id)?
            .ok_or(DomainError::NotFound)?
            .body;

        if let Some(section_id) = staff.section_id {
            let mut section = self
                .store
                .find_section(section_id)?
                .ok_or_else(|| {
                    DomainError::inconsistent(format!(
                        "staff {staff_id} references missing section {section_id}"
                    ))
                })?
                .body;
            section.withdraw_staff(staff_id)?;
            self.store.update_section(section.clone())?;

            if let Err(err) = self.store.delete_staff(staff_id) {
                section.admit_staff(staff_id).ok();
                return self.roll_back_section(section, staff_id.to_string(), err);
            }
        } else {
            self.store.delete_staff(staff_id)?;
        }

        Ok(())
    }

    /// Delete a student record, pulling it from its section's roster first.
    pub fn delete_student(&self, student_id: StudentId) -> DomainResult<()> {
        let _guard = self.lock()?;

        let student = self
            .store
            .find_student(student_id)?
            .ok_or(DomainError::NotFound)?
            .body;

        if let Some(section_id) = student.section_id {
            let mut section = self
                .store
                .find_section(section_id)?
                .ok_or_else(|| {
                    DomainError::inconsistent(format!(
                        "student {student_id} references missing section {section_id}"
                    ))
                })?
                .body;
            section.withdraw_student(student_id)?;
            self.store.update_section(section.clone())?;

            if let Err(err) = self.store.delete_student(student_id) {
                section.admit_student(student_id).ok();
                return self.roll_back_section(section, student_id.to_string(), err);
            }
        } else {
            self.store.delete_student(student_id)?;
        }

        Ok(())
    }

    // ── Compensation ─────────────────────────────────────────────────────

    fn roll_back_staff(
        &self,
        staff: Staff,
        section_id: SectionId,
        cause: crate::entity_store::StoreError,
    ) -> DomainResult<SectionSnapshot> {
        let staff_id = staff.id;
        match self.store.update_staff(staff) {
            Ok(_) => {
                tracing::warn!(
                    section_id = %section_id,
                    staff_id = %staff_id,
                    cause = %cause,
                    "section write failed; staff write rolled back"
                );
                Err(cause.into())
            }
            Err(rollback_err) => {
                tracing::error!(
                    section_id = %section_id,
                    staff_id = %staff_id,
                    cause = %cause,
                    rollback_error = %rollback_err,
                    "membership write rolled back unsuccessfully"
                );
                Err(DomainError::inconsistent(format!(
                    "staff {staff_id} written but section {section_id} write failed ({cause}); \
                     rollback failed ({rollback_err})"
                )))
            }
        }
    }

    fn roll_back_student(
        &self,
        student: Student,
        section_id: SectionId,
        cause: crate::entity_store::StoreError,
    ) -> DomainResult<SectionSnapshot> {
        let student_id = student.id;
        match self.store.update_student(student) {
            Ok(_) => {
                tracing::warn!(
                    section_id = %section_id,
                    student_id = %student_id,
                    cause = %cause,
                    "section write failed; student write rolled back"
                );
                Err(cause.into())
            }
            Err(rollback_err) => {
                tracing::error!(
                    section_id = %section_id,
                    student_id = %student_id,
                    cause = %cause,
                    rollback_error = %rollback_err,
                    "membership write rolled back unsuccessfully"
                );
                Err(DomainError::inconsistent(format!(
                    "student {student_id} written but section {section_id} write failed ({cause}); \
                     rollback failed ({rollback_err})"
                )))
            }
        }
    }

    fn roll_back_section<T>(
        &self,
        section: Section,
        member: String,
        cause: crate::entity_store::StoreError,
    ) -> DomainResult<T> {
        let section_id = *section.id();
        match self.store.update_section(section) {
            Ok(_) => {
                tracing::warn!(
                    section_id = %section_id,
                    member = %member,
                    cause = %cause,
                    "member delete failed; roster write rolled back"
                );
                Err(cause.into())
            }
            Err(rollback_err) => {
                tracing::error!(
                    section_id = %section_id,
                    member = %member,
                    cause = %cause,
                    rollback_error = %rollback_err,
                    "member deletion rolled back unsuccessfully"
                );
                Err(DomainError::inconsistent(format!(
                    "section {section_id} roster updated but member {member} delete failed \
                     ({cause}); rollback failed ({rollback_err})"
                )))
            }
        }
    }
}
