use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use registrar_core::{DomainError, DomainResult, Entity, SectionId, StudentId};

use crate::profile::{ContactUpdate, validate_email, validate_phone, validate_required};

/// Register numbers are issued from a fixed institutional block.
pub const REGISTER_NUMBER_MIN: u64 = 810_000_000_000;
pub const REGISTER_NUMBER_MAX: u64 = 810_025_999_999;

/// Student profile fields, validated as one schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub register_number: u64,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub degree: String,
    pub department: String,
    pub batch: String,
    pub campus: String,
    pub phone_number: u64,
    pub email: String,
}

impl StudentProfile {
    pub fn validate(&self) -> DomainResult<()> {
        if !(REGISTER_NUMBER_MIN..=REGISTER_NUMBER_MAX).contains(&self.register_number) {
            return Err(DomainError::validation("register number must be valid"));
        }
        validate_required("name", &self.name)?;
        validate_required("degree", &self.degree)?;
        validate_required("department", &self.department)?;
        validate_required("batch", &self.batch)?;
        validate_required("campus", &self.campus)?;
        validate_phone(self.phone_number)?;
        validate_email(&self.email)
    }
}

/// A student. `section_id` is the back-reference of the Section↔Student
/// relationship: at most one section, maintained by the membership manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub profile: StudentProfile,
    pub section_id: Option<SectionId>,
}

impl Student {
    pub fn new(id: StudentId, profile: StudentProfile) -> DomainResult<Self> {
        profile.validate()?;
        Ok(Self {
            id,
            profile,
            section_id: None,
        })
    }

    pub fn apply_contact_update(&mut self, update: &ContactUpdate) -> DomainResult<()> {
        update.validate()?;
        if let Some(phone) = update.phone_number {
            self.profile.phone_number = phone;
        }
        if let Some(email) = &update.email {
            self.profile.email = email.clone();
        }
        Ok(())
    }
}

impl Entity for Student {
    type Id = StudentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> StudentProfile {
        StudentProfile {
            register_number: 810_012_345_678,
            name: "Arun Prasad".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2003, 6, 14).unwrap(),
            degree: "B.Tech".to_string(),
            department: "IT".to_string(),
            batch: "2021".to_string(),
            campus: "Main".to_string(),
            phone_number: 8_765_432_109,
            email: "arun@univ.edu".to_string(),
        }
    }

    #[test]
    fn valid_profile_constructs() {
        let student = Student::new(StudentId::new(), profile()).unwrap();
        assert!(student.section_id.is_none());
    }

    #[test]
    fn register_number_outside_block_is_rejected() {
        let mut p = profile();
        p.register_number = 810_026_000_000;
        let err = Student::new(StudentId::new(), p).unwrap_err();
        assert_eq!(err, DomainError::validation("register number must be valid"));
    }

    #[test]
    fn bad_email_is_rejected() {
        let mut p = profile();
        p.email = "arun-at-univ".to_string();
        assert!(Student::new(StudentId::new(), p).is_err());
    }
}
