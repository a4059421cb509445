//! Entity trait: things with identity that persist across edits.

/// Minimal interface for a stored entity.
///
/// Two entities are "the same" when their ids match, whatever their field
/// values; the record store addresses documents by this id.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
