//! Shared profile field validation.
//!
//! One validator per entity (see `StaffProfile::validate` /
//! `StudentProfile::validate`) applied uniformly before the membership
//! manager or certificate workflow is invoked, instead of per-field checks
//! scattered across handlers.

use serde::{Deserialize, Serialize};

use registrar_core::{DomainError, DomainResult};

/// Valid mobile numbers are ten digits not starting 0-3.
pub const PHONE_MIN: u64 = 4_444_444_444;
pub const PHONE_MAX: u64 = 9_999_999_999;

pub(crate) fn validate_required(field: &'static str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn validate_phone(phone_number: u64) -> DomainResult<()> {
    if !(PHONE_MIN..=PHONE_MAX).contains(&phone_number) {
        return Err(DomainError::validation("mobile number must be valid"));
    }
    Ok(())
}

/// Structural email check: `local@domain.tld` with a non-empty local part
/// and a dot somewhere in the domain. Deliverability is the mail
/// transport's problem.
pub(crate) fn validate_email(email: &str) -> DomainResult<()> {
    let ok = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !ok {
        return Err(DomainError::validation("email must be valid"));
    }
    Ok(())
}

/// Partial contact update (phone and/or email).
///
/// An update specifying no fields is rejected rather than silently
/// no-opping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactUpdate {
    pub phone_number: Option<u64>,
    pub email: Option<String>,
}

impl ContactUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        if self.phone_number.is_none() && self.email.is_none() {
            return Err(DomainError::validation("no fields specified"));
        }
        if let Some(phone) = self.phone_number {
            validate_phone(phone)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_bounds() {
        assert!(validate_phone(PHONE_MIN).is_ok());
        assert!(validate_phone(PHONE_MAX).is_ok());
        assert!(validate_phone(1_234_567_890).is_err());
        assert!(validate_phone(10_000_000_000).is_err());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("asha@univ.edu").is_ok());
        assert!(validate_email("asha@univ").is_err());
        assert!(validate_email("@univ.edu").is_err());
        assert!(validate_email("asha").is_err());
        assert!(validate_email("asha@.edu").is_err());
    }

    #[test]
    fn empty_contact_update_is_rejected() {
        let err = ContactUpdate::default().validate().unwrap_err();
        assert_eq!(err, DomainError::validation("no fields specified"));
    }

    #[test]
    fn partial_contact_update_validates_present_fields() {
        let upd = ContactUpdate {
            phone_number: None,
            email: Some("bad-email".to_string()),
        };
        assert!(upd.validate().is_err());

        let upd = ContactUpdate {
            phone_number: Some(9_888_777_666),
            email: None,
        };
        assert!(upd.validate().is_ok());
    }
}
