use serde::{Deserialize, Serialize};

use registrar_core::{DomainResult, Entity, SectionId, StaffId};

use crate::profile::{ContactUpdate, validate_email, validate_phone, validate_required};

/// Staff profile fields, validated as one schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffProfile {
    pub name: String,
    pub designation: String,
    pub department: String,
    pub campus: String,
    pub phone_number: u64,
    pub email: String,
}

impl StaffProfile {
    pub fn validate(&self) -> DomainResult<()> {
        validate_required("name", &self.name)?;
        validate_required("designation", &self.designation)?;
        validate_required("department", &self.department)?;
        validate_required("campus", &self.campus)?;
        validate_phone(self.phone_number)?;
        validate_email(&self.email)
    }
}

/// A staff member. `section_id` is the back-reference of the
/// Section↔Staff relationship: at most one section, and only the membership
/// manager sets or clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub profile: StaffProfile,
    pub section_id: Option<SectionId>,
}

impl Staff {
    pub fn new(id: StaffId, profile: StaffProfile) -> DomainResult<Self> {
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

impl Entity for Staff {
    type Id = StaffId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> StaffProfile {
        StaffProfile {
            name: "Meera Nair".to_string(),
            designation: "Assistant Professor".to_string(),
            department: "CSE".to_string(),
            campus: "Main".to_string(),
            phone_number: 9_876_543_210,
            email: "meera@univ.edu".to_string(),
        }
    }

    #[test]
    fn valid_profile_constructs() {
        let staff = Staff::new(StaffId::new(), profile()).unwrap();
        assert!(staff.section_id.is_none());
    }

    #[test]
    fn blank_designation_is_rejected() {
        let mut p = profile();
        p.designation = "".to_string();
        assert!(Staff::new(StaffId::new(), p).is_err());
    }

    #[test]
    fn contact_update_applies_only_given_fields() {
        let mut staff = Staff::new(StaffId::new(), profile()).unwrap();
        let old_phone = staff.profile.phone_number;
        staff
            .apply_contact_update(&ContactUpdate {
                phone_number: None,
                email: Some("meera.nair@univ.edu".to_string()),
            })
            .unwrap();
        assert_eq!(staff.profile.phone_number, old_phone);
        assert_eq!(staff.profile.email, "meera.nair@univ.edu");
    }
}
