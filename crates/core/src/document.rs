//! Stored-document wrapper: entity body + store-owned timestamps.

use serde::{Deserialize, Serialize};

use crate::timestamps::Timestamps;

/// An entity as held by the record store.
///
/// The store stamps `timestamps` on insert and touches `updated_at` on every
/// per-document write; domain code never sets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document<T> {
    #[serde(flatten)]
    pub body: T,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl<T> Document<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Document<U> {
        Document {
            body: f(self.body),
            timestamps: self.timestamps,
        }
    }
}
