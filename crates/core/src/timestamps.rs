//! Creation/modification timestamps, owned and advanced by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-maintained timestamp pair.
///
/// The store stamps `created_at` on insert and bumps `updated_at` on every
/// update. Domain code treats these as read-only.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timestamps {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touched(self, now: DateTime<Utc>) -> Self {
        Self {
            updated_at: now,
            ..self
        }
    }
}
