use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use registrar_core::{AdminId, StaffId, StudentId};

use crate::Role;

/// Bearer-token claims model (transport-agnostic).
///
/// This is the minimal set of claims the core expects once a token has been
/// decoded/verified by whatever credential store is in use: who is acting
/// (`subject`, `name`) and as what (`role`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Subject identifier; interpreted per `role`.
    pub subject: Uuid,

    /// Role granted by the credential store.
    pub role: Role,

    /// Display name of the subject.
    pub name: String,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl AuthClaims {
    pub fn admin_id(&self) -> Option<AdminId> {
        (self.role == Role::Admin).then(|| AdminId::from_uuid(self.subject))
    }

    pub fn staff_id(&self) -> Option<StaffId> {
        (self.role == Role::Staff).then(|| StaffId::from_uuid(self.subject))
    }

    pub fn student_id(&self) -> Option<StudentId> {
        (self.role == Role::Student).then(|| StudentId::from_uuid(self.subject))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate token claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// is intentionally outside this crate.
pub fn validate_claims(claims: &AuthClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> AuthClaims {
        AuthClaims {
            subject: Uuid::now_v7(),
            role: Role::Student,
            name: "Priya".to_string(),
            issued_at,
            expires_at,
        }
    }

    #[test]
    fn valid_window_passes() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(5), now + Duration::hours(1));
        assert!(validate_claims(&c, now).is_ok());
    }

    #[test]
    fn expired_token_rejected() {
        let now = Utc::now();
        let c = claims(now - Duration::hours(2), now - Duration::hours(1));
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::Expired));
    }

    #[test]
    fn inverted_window_rejected() {
        let now = Utc::now();
        let c = claims(now, now - Duration::hours(1));
        assert_eq!(
            validate_claims(&c, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn typed_subject_follows_role() {
        let now = Utc::now();
        let c = claims(now, now + Duration::hours(1));
        assert!(c.student_id().is_some());
        assert!(c.staff_id().is_none());
        assert!(c.admin_id().is_none());
    }
}
