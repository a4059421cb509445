//! `registrar-certificates` — bonafide request state machine.
//!
//! Pure lifecycle logic only. Orchestration (store reads/writes, staff
//! lookups, notifications) lives in the infrastructure layer's workflow
//! service.

pub mod certificate;

pub use certificate::{Certificate, CertificateStatus, EXPIRY_DAYS, ReviewDecision};
