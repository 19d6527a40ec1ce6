//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and defined entirely by their attribute
/// values; two with the same values are the same value. Contrast with
/// [`crate::Entity`], where identity persists across state changes.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
