use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use registrar_certificates::Certificate;
use registrar_core::{
    AdminId, CertificateId, Document, Entity, SectionId, StaffId, StudentId, Timestamps,
};
use registrar_records::{Admin, Section, Staff, Student};

use super::{EntityStore, StoreError, StoreResult};

/// One entity kind's documents.
#[derive(Debug)]
struct Collection<K, V> {
    inner: RwLock<HashMap<K, Document<V>>>,
}

impl<K, V> Default for Collection<K, V> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Collection<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn find(&self, id: &K) -> StoreResult<Option<Document<V>>> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(map.get(id).cloned())
    }

    fn insert(&self, id: K, body: V) -> StoreResult<Document<V>> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        let doc = Document {
            body,
            timestamps: Timestamps::at(Utc::now()),
        };
        map.insert(id, doc.clone());
        Ok(doc)
    }

    fn update(&self, id: &K, body: V) -> StoreResult<Document<V>> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        let existing = map.get_mut(id).ok_or(StoreError::NotFound)?;
        existing.body = body;
        existing.timestamps = existing.timestamps.touched(Utc::now());
        Ok(existing.clone())
    }

    fn delete(&self, id: &K) -> StoreResult<Document<V>> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        map.remove(id).ok_or(StoreError::NotFound)
    }

    fn all(&self) -> StoreResult<Vec<Document<V>>> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(map.values().cloned().collect())
    }

    fn filtered(&self, pred: impl Fn(&Document<V>) -> bool) -> StoreResult<Vec<Document<V>>> {
        Ok(self.all()?.into_iter().filter(|d| pred(d)).collect())
    }
}

/// In-memory record store.
///
/// Intended for tests/dev. Per-document operations are atomic under the
/// collection lock, matching the contract of the external document store.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    sections: Collection<SectionId, Section>,
    staff: Collection<StaffId, Staff>,
    students: Collection<StudentId, Student>,
    admins: Collection<AdminId, Admin>,
    certificates: Collection<CertificateId, Certificate>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewind a certificate's `updated_at` to simulate age.
    #[cfg(test)]
    pub(crate) fn backdate_certificate(&self, id: CertificateId, updated_at: DateTime<Utc>) {
        if let Ok(mut map) = self.certificates.inner.write() {
            if let Some(doc) = map.get_mut(&id) {
                doc.timestamps.updated_at = updated_at;
            }
        }
    }
}

impl EntityStore for InMemoryEntityStore {
    fn find_section(&self, id: SectionId) -> StoreResult<Option<Document<Section>>> {
        self.sections.find(&id)
    }

    fn insert_section(&self, section: Section) -> StoreResult<Document<Section>> {
        let id = *section.id();
        self.sections.insert(id, section)
    }

    fn update_section(&self, section: Section) -> StoreResult<Document<Section>> {
        let id = *section.id();
        self.sections.update(&id, section)
    }

    fn delete_section(&self, id: SectionId) -> StoreResult<Document<Section>> {
        self.sections.delete(&id)
    }

    fn sections(&self) -> StoreResult<Vec<Document<Section>>> {
        self.sections.all()
    }

    fn find_staff(&self, id: StaffId) -> StoreResult<Option<Document<Staff>>> {
        self.staff.find(&id)
    }

    fn insert_staff(&self, staff: Staff) -> StoreResult<Document<Staff>> {
        self.staff.insert(staff.id, staff)
    }

    fn update_staff(&self, staff: Staff) -> StoreResult<Document<Staff>> {
        let id = staff.id;
        self.staff.update(&id, staff)
    }

    fn delete_staff(&self, id: StaffId) -> StoreResult<Document<Staff>> {
        self.staff.delete(&id)
    }

    fn staff_members(&self) -> StoreResult<Vec<Document<Staff>>> {
        self.staff.all()
    }

    fn find_student(&self, id: StudentId) -> StoreResult<Option<Document<Student>>> {
        self.students.find(&id)
    }

    fn find_student_by_register(
        &self,
        register_number: u64,
    ) -> StoreResult<Option<Document<Student>>> {
        Ok(self
            .students
            .filtered(|d| d.body.profile.register_number == register_number)?
            .into_iter()
            .next())
    }

    fn insert_student(&self, student: Student) -> StoreResult<Document<Student>> {
        self.students.insert(student.id, student)
    }

    fn update_student(&self, student: Student) -> StoreResult<Document<Student>> {
        let id = student.id;
        self.students.update(&id, student)
    }

    fn delete_student(&self, id: StudentId) -> StoreResult<Document<Student>> {
        self.students.delete(&id)
    }

    fn students(&self) -> StoreResult<Vec<Document<Student>>> {
        self.students.all()
    }

    fn find_admin(&self, id: AdminId) -> StoreResult<Option<Document<Admin>>> {
        self.admins.find(&id)
    }

    fn insert_admin(&self, admin: Admin) -> StoreResult<Document<Admin>> {
        self.admins.insert(admin.id, admin)
    }

    fn find_certificate(&self, id: CertificateId) -> StoreResult<Option<Document<Certificate>>> {
        self.certificates.find(&id)
    }

    fn insert_certificate(&self, certificate: Certificate) -> StoreResult<Document<Certificate>> {
        self.certificates.insert(certificate.id, certificate)
    }

    fn update_certificate(&self, certificate: Certificate) -> StoreResult<Document<Certificate>> {
        let id = certificate.id;
        self.certificates.update(&id, certificate)
    }

    fn delete_certificate(&self, id: CertificateId) -> StoreResult<Document<Certificate>> {
        self.certificates.delete(&id)
    }

    fn certificates_for_student(
        &self,
        student_id: StudentId,
    ) -> StoreResult<Vec<Document<Certificate>>> {
        self.certificates.filtered(|d| d.body.student_id == student_id)
    }

    fn certificates_for_section(
        &self,
        section_id: SectionId,
    ) -> StoreResult<Vec<Document<Certificate>>> {
        self.certificates.filtered(|d| d.body.section_id == section_id)
    }

    fn purge_expired_certificates(&self, now: DateTime<Utc>) -> StoreResult<usize> {
        let mut map = self
            .certificates
            .inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        let before = map.len();
        map.retain(|_, doc| !Certificate::is_expired(doc.timestamps.updated_at, now));
        Ok(before - map.len())
    }
}
