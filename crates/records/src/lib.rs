//! `registrar-records` — people and section entities.
//!
//! Pure domain types for the academic-record side: sections with their
//! membership rosters, staff and student profiles with their validators.
//! Cross-document orchestration (keeping rosters and back-references in
//! step) lives in the infrastructure layer's membership manager.

pub mod admin;
pub mod profile;
pub mod section;
pub mod staff;
pub mod student;

pub use admin::Admin;
pub use profile::ContactUpdate;
pub use section::Section;
pub use staff::{Staff, StaffProfile};
pub use student::{Student, StudentProfile};
