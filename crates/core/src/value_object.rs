//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects (a city, a product category, a role) have no identity of
/// their own and are compared by their attributes. They are immutable: to
/// "change" one, construct another.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
