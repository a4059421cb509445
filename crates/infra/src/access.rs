//! Caller resolution: claims + record store → policy input.
//!
//! The policy check itself is pure (`registrar_auth::authorize`); the one
//! thing it needs from storage, the section a staff caller belongs to, is
//! resolved here, once, before any operation runs.

use registrar_auth::{AuthClaims, Caller, Role};
use registrar_core::{DomainError, DomainResult};

use crate::entity_store::EntityStore;

/// Build the policy-ready caller for a set of verified claims.
///
/// Staff callers get their own `section_id` resolved from the store; a
/// token whose subject no longer has a staff record is denied outright.
pub fn resolve_caller<S: EntityStore>(store: &S, claims: AuthClaims) -> DomainResult<Caller> {
    let section_id = match claims.role {
        Role::Staff => {
            let staff_id = claims.staff_id().ok_or(DomainError::Unauthorized)?;
            let staff = store
                .find_staff(staff_id)?
                .ok_or(DomainError::Unauthorized)?;
            staff.body.section_id
        }
        Role::Admin | Role::Student => None,
    };
    Ok(Caller::with_section(claims, section_id))
}
