//! Record-store port: typed per-document accessors, no business logic.
//!
//! Every method is a single-document atomic read or read-modify-write; there
//! are no multi-document transactions. Cross-document consistency is the
//! membership manager's job.

use chrono::{DateTime, Utc};
use thiserror::Error;

use registrar_certificates::Certificate;
use registrar_core::{
    AdminId, CertificateId, Document, DomainError, SectionId, StaffId, StudentId,
};
use registrar_records::{Admin, Section, Staff, Student};

mod in_memory;

pub use in_memory::InMemoryEntityStore;

/// Store-level failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed document does not exist.
    #[error("document not found")]
    NotFound,

    /// The store could not serve the call (e.g. poisoned lock, lost
    /// connection).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => DomainError::NotFound,
            StoreError::Unavailable(msg) => DomainError::inconsistent(msg),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Typed accessors over the persistent record store for the five entity
/// kinds.
///
/// `insert_*` stamps the timestamp pair; `update_*` keeps `created_at`,
/// touches `updated_at`, and fails with `NotFound` for an absent document;
/// `delete_*` returns the removed document.
pub trait EntityStore: Send + Sync {
    // Sections
    fn find_section(&self, id: SectionId) -> StoreResult<Option<Document<Section>>>;
    fn insert_section(&self, section: Section) -> StoreResult<Document<Section>>;
    fn update_section(&self, section: Section) -> StoreResult<Document<Section>>;
    fn delete_section(&self, id: SectionId) -> StoreResult<Document<Section>>;
    fn sections(&self) -> StoreResult<Vec<Document<Section>>>;

    // Staff
    fn find_staff(&self, id: StaffId) -> StoreResult<Option<Document<Staff>>>;
    fn insert_staff(&self, staff: Staff) -> StoreResult<Document<Staff>>;
    fn update_staff(&self, staff: Staff) -> StoreResult<Document<Staff>>;
    fn delete_staff(&self, id: StaffId) -> StoreResult<Document<Staff>>;
    fn staff_members(&self) -> StoreResult<Vec<Document<Staff>>>;

    // Students
    fn find_student(&self, id: StudentId) -> StoreResult<Option<Document<Student>>>;
    fn find_student_by_register(&self, register_number: u64)
    -> StoreResult<Option<Document<Student>>>;
    fn insert_student(&self, student: Student) -> StoreResult<Document<Student>>;
    fn update_student(&self, student: Student) -> StoreResult<Document<Student>>;
    fn delete_student(&self, id: StudentId) -> StoreResult<Document<Student>>;
    fn students(&self) -> StoreResult<Vec<Document<Student>>>;

    // Admins
    fn find_admin(&self, id: AdminId) -> StoreResult<Option<Document<Admin>>>;
    fn insert_admin(&self, admin: Admin) -> StoreResult<Document<Admin>>;

    // Certificates
    fn find_certificate(&self, id: CertificateId) -> StoreResult<Option<Document<Certificate>>>;
    fn insert_certificate(&self, certificate: Certificate) -> StoreResult<Document<Certificate>>;
    fn update_certificate(&self, certificate: Certificate) -> StoreResult<Document<Certificate>>;
    fn delete_certificate(&self, id: CertificateId) -> StoreResult<Document<Certificate>>;
    fn certificates_for_student(
        &self,
        student_id: StudentId,
    ) -> StoreResult<Vec<Document<Certificate>>>;
    fn certificates_for_section(
        &self,
        section_id: SectionId,
    ) -> StoreResult<Vec<Document<Certificate>>>;

    /// Remove certificates whose last status change is older than the expiry
    /// window. Returns the number purged.
    fn purge_expired_certificates(&self, now: DateTime<Utc>) -> StoreResult<usize>;
}

impl<S> EntityStore for std::sync::Arc<S>
where
    S: EntityStore + ?Sized,
{
    fn find_section(&self, id: SectionId) -> StoreResult<Option<Document<Section>>> {
        (**self).find_section(id)
    }
    fn insert_section(&self, section: Section) -> StoreResult<Document<Section>> {
        (**self).insert_section(section)
    }
    fn update_section(&self, section: Section) -> StoreResult<Document<Section>> {
        (**self).update_section(section)
    }
    fn delete_section(&self, id: SectionId) -> StoreResult<Document<Section>> {
        (**self).delete_section(id)
    }
    fn sections(&self) -> StoreResult<Vec<Document<Section>>> {
        (**self).sections()
    }

    fn find_staff(&self, id: StaffId) -> StoreResult<Option<Document<Staff>>> {
        (**self).find_staff(id)
    }
    fn insert_staff(&self, staff: Staff) -> StoreResult<Document<Staff>> {
        (**self).insert_staff(staff)
    }
    fn update_staff(&self, staff: Staff) -> StoreResult<Document<Staff>> {
        (**self).update_staff(staff)
    }
    fn delete_staff(&self, id: StaffId) -> StoreResult<Document<Staff>> {
        (**self).delete_staff(id)
    }
    fn staff_members(&self) -> StoreResult<Vec<Document<Staff>>> {
        (**self).staff_members()
    }

    fn find_student(&self, id: StudentId) -> StoreResult<Option<Document<Student>>> {
        (**self).find_student(id)
    }
    fn find_student_by_register(
        &self,
        register_number: u64,
    ) -> StoreResult<Option<Document<Student>>> {
        (**self).find_student_by_register(register_number)
    }
    fn insert_student(&self, student: Student) -> StoreResult<Document<Student>> {
        (**self).insert_student(student)
    }
    fn update_student(&self, student: Student) -> StoreResult<Document<Student>> {
        (**self).update_student(student)
    }
    fn delete_student(&self, id: StudentId) -> StoreResult<Document<Student>> {
        (**self).delete_student(id)
    }
    fn students(&self) -> StoreResult<Vec<Document<Student>>> {
        (**self).students()
    }

    fn find_admin(&self, id: AdminId) -> StoreResult<Option<Document<Admin>>> {
        (**self).find_admin(id)
    }
    fn insert_admin(&self, admin: Admin) -> StoreResult<Document<Admin>> {
        (**self).insert_admin(admin)
    }

    fn find_certificate(&self, id: CertificateId) -> StoreResult<Option<Document<Certificate>>> {
        (**self).find_certificate(id)
    }
    fn insert_certificate(&self, certificate: Certificate) -> StoreResult<Document<Certificate>> {
        (**self).insert_certificate(certificate)
    }
    fn update_certificate(&self, certificate: Certificate) -> StoreResult<Document<Certificate>> {
        (**self).update_certificate(certificate)
    }
    fn delete_certificate(&self, id: CertificateId) -> StoreResult<Document<Certificate>> {
        (**self).delete_certificate(id)
    }
    fn certificates_for_student(
        &self,
        student_id: StudentId,
    ) -> StoreResult<Vec<Document<Certificate>>> {
        (**self).certificates_for_student(student_id)
    }
    fn certificates_for_section(
        &self,
        section_id: SectionId,
    ) -> StoreResult<Vec<Document<Certificate>>> {
        (**self).certificates_for_section(section_id)
    }
    fn purge_expired_certificates(&self, now: DateTime<Utc>) -> StoreResult<usize> {
        (**self).purge_expired_certificates(now)
    }
}
