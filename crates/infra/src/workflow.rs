//! Bonafide certificate workflow service.
//!
//! Drives a request through `applied → approved/rejected → applied` against
//! the record store and routes each transition's notification to the right
//! audience. Notifications go out only after the authoritative state change
//! commits, and a failed send never rolls it back.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use registrar_certificates::{Certificate, CertificateStatus, ReviewDecision};
use registrar_core::{
    CertificateId, DomainError, DomainResult, Document, SectionId, StaffId, StudentId,
};
use registrar_notify::{Mailer, NotificationDispatcher, templates};

use crate::entity_store::EntityStore;

/// A certificate row populated with the student's identity, as staff
/// review queues show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateView {
    pub certificate: Document<Certificate>,
    pub student_name: String,
    pub register_number: u64,
}

/// Orchestrates the certificate lifecycle.
pub struct CertificateWorkflow<S, M> {
    store: S,
    dispatcher: NotificationDispatcher<M>,
}

impl<S: EntityStore, M: Mailer> CertificateWorkflow<S, M> {
    pub fn new(store: S, dispatcher: NotificationDispatcher<M>) -> Self {
        Self { store, dispatcher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Raise a new bonafide request for a student.
    ///
    /// The student must belong to a section. Nothing stops a student from
    /// holding several live `applied` requests at once; each call creates a
    /// fresh document. The section read here can race with a concurrent
    /// release of the student; the staleness window is accepted.
    pub fn apply(&self, student_id: StudentId) -> DomainResult<Document<Certificate>> {
        let student = self
            .store
            .find_student(student_id)?
            .ok_or(DomainError::NotFound)?
            .body;
        let section_id = student
            .section_id
            .ok_or_else(|| DomainError::invalid_state("must belong to a section"))?;

        let certificate = Certificate::apply(CertificateId::new(), student_id, section_id);
        let doc = self.store.insert_certificate(certificate)?;
        tracing::info!(
            certificate_id = %doc.body.id,
            student_id = %student_id,
            section_id = %section_id,
            "bonafide applied"
        );

        let (subject, html) = templates::new_application(
            &student.profile.name,
            self.dispatcher.site_url(),
        );
        self.notify_section_staff(section_id, &subject, html);

        Ok(doc)
    }

    /// Record a staff decision on an applied request and tell the student.
    pub fn review(
        &self,
        certificate_id: CertificateId,
        reviewer_id: StaffId,
        decision: ReviewDecision,
    ) -> DomainResult<Document<Certificate>> {
        let mut certificate = self.live_certificate(certificate_id)?.body;
        self.store
            .find_staff(reviewer_id)?
            .ok_or(DomainError::NotFound)?;

        certificate.review(reviewer_id, decision)?;
        let doc = self.store.update_certificate(certificate)?;
        tracing::info!(
            certificate_id = %certificate_id,
            reviewer_id = %reviewer_id,
            decision = decision.as_str(),
            "bonafide reviewed"
        );

        if let Some(student) = self.store.find_student(doc.body.student_id)? {
            let (subject, html) = templates::decision(
                &student.body.profile.name,
                decision.as_str(),
                self.dispatcher.site_url(),
            );
            self.dispatcher
                .dispatch(&[student.body.profile.email.clone()], &subject, html);
        }

        Ok(doc)
    }

    /// Re-open a decided request for the owning student and re-notify the
    /// staff list.
    pub fn reapply(
        &self,
        certificate_id: CertificateId,
        student_id: StudentId,
    ) -> DomainResult<Document<Certificate>> {
        let mut certificate = self.live_certificate(certificate_id)?.body;
        if certificate.student_id != student_id {
            return Err(DomainError::Unauthorized);
        }

        let student = self
            .store
            .find_student(student_id)?
            .ok_or(DomainError::NotFound)?
            .body;
        let section_id = student
            .section_id
            .ok_or_else(|| DomainError::invalid_state("must belong to a section"))?;

        certificate.reapply()?;
        let doc = self.store.update_certificate(certificate)?;
        tracing::info!(
            certificate_id = %certificate_id,
            student_id = %student_id,
            "bonafide re-requested"
        );

        let (subject, html) =
            templates::re_request(&student.profile.name, self.dispatcher.site_url());
        self.notify_section_staff(section_id, &subject, html);

        Ok(doc)
    }

    /// Pending requests of the staff member's own section.
    pub fn list_applied(&self, staff_id: StaffId) -> DomainResult<Vec<CertificateView>> {
        self.section_queue(staff_id, |status| status == CertificateStatus::Applied)
    }

    /// Decided (non-applied) requests of the staff member's own section.
    pub fn list_history(&self, staff_id: StaffId) -> DomainResult<Vec<CertificateView>> {
        self.section_queue(staff_id, |status| status != CertificateStatus::Applied)
    }

    /// A student's current certificate, if any: the most recently updated
    /// live document.
    pub fn status_for(&self, student_id: StudentId) -> DomainResult<Option<Document<Certificate>>> {
        let now = Utc::now();
        Ok(self
            .store
            .certificates_for_student(student_id)?
            .into_iter()
            .filter(|doc| !Certificate::is_expired(doc.timestamps.updated_at, now))
            .max_by_key(|doc| doc.timestamps.updated_at))
    }

    /// Drop requests whose last status change is older than the expiry
    /// window. Returns the number purged.
    pub fn purge_expired(&self) -> DomainResult<usize> {
        let purged = self.store.purge_expired_certificates(Utc::now())?;
        if purged > 0 {
            tracing::info!(purged, "expired certificates purged");
        }
        Ok(purged)
    }

    // ── Internals ────────────────────────────────────────────────────────

    /// Load a certificate, treating an expired one as absent.
    fn live_certificate(&self, id: CertificateId) -> DomainResult<Document<Certificate>> {
        let doc = self
            .store
            .find_certificate(id)?
            .ok_or(DomainError::NotFound)?;
        if Certificate::is_expired(doc.timestamps.updated_at, Utc::now()) {
            return Err(DomainError::NotFound);
        }
        Ok(doc)
    }

    fn section_queue(
        &self,
        staff_id: StaffId,
        keep: impl Fn(CertificateStatus) -> bool,
    ) -> DomainResult<Vec<CertificateView>> {
        let staff = self
            .store
            .find_staff(staff_id)?
            .ok_or(DomainError::NotFound)?
            .body;
        let section_id = staff
            .section_id
            .ok_or_else(|| DomainError::invalid_state("staff does not belong to a section"))?;

        let now = Utc::now();
        let mut rows = Vec::new();
        for doc in self.store.certificates_for_section(section_id)? {
            if Certificate::is_expired(doc.timestamps.updated_at, now) || !keep(doc.body.status()) {
                continue;
            }
            match self.store.find_student(doc.body.student_id)? {
                Some(student) => rows.push(CertificateView {
                    certificate: doc,
                    student_name: student.body.profile.name.clone(),
                    register_number: student.body.profile.register_number,
                }),
                None => {
                    tracing::warn!(
                        certificate_id = %doc.body.id,
                        student_id = %doc.body.student_id,
                        "certificate references missing student; skipped from queue"
                    );
                }
            }
        }
        rows.sort_by_key(|row| row.certificate.timestamps.created_at);
        Ok(rows)
    }

    /// Send one message to the full staff distribution list of a section.
    ///
    /// Runs after the state change has committed; any failure here (missing
    /// section, missing staff, transport) is logged and absorbed.
    fn notify_section_staff(&self, section_id: SectionId, subject: &str, html: String) {
        let recipients = match self.staff_emails(section_id) {
            Ok(emails) => emails,
            Err(err) => {
                tracing::warn!(
                    section_id = %section_id,
                    error = %err,
                    "staff distribution list unavailable; notification dropped"
                );
                return;
            }
        };
        self.dispatcher.dispatch(&recipients, subject, html);
    }

    fn staff_emails(&self, section_id: SectionId) -> DomainResult<Vec<String>> {
        let section = self
            .store
            .find_section(section_id)?
            .ok_or(DomainError::NotFound)?
            .body;
        let mut emails = Vec::with_capacity(section.staff_ids().len());
        for staff_id in section.staff_ids() {
            if let Some(staff) = self.store.find_staff(*staff_id)? {
                emails.push(staff.body.profile.email.clone());
            }
        }
        Ok(emails)
    }
}
