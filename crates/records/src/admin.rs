use serde::{Deserialize, Serialize};

use registrar_core::{AdminId, DomainResult, Entity};

use crate::profile::{validate_email, validate_required};

/// An administrator account. Only the policy layer cares about admins; the
/// record itself is a thin profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub id: AdminId,
    pub name: String,
    pub email: String,
}

impl Admin {
    pub fn new(id: AdminId, name: impl Into<String>, email: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let email = email.into();
        validate_required("name", &name)?;
        validate_email(&email)?;
        Ok(Self { id, name, email })
    }
}

impl Entity for Admin {
    type Id = AdminId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
