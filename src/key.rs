//! Service identifiers.

use std::any::TypeId;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Key for service storage and lookup.
///
/// A key identifies one abstract contract: a concrete type, or a trait object
/// type such as `dyn Logger`. Both have a `TypeId`, so the same key shape
/// covers classes and interfaces. The type name is carried for diagnostics
/// only and does not take part in comparisons.
///
/// # Examples
///
/// ```rust
/// use graft_di::Key;
///
/// trait Logger: Send + Sync {}
///
/// let a = Key::of::<String>();
/// let b = Key::of::<String>();
/// assert_eq!(a, b);
/// assert_eq!(a.display_name(), "alloc::string::String");
///
/// let logger = Key::of::<dyn Logger>();
/// assert_ne!(a, logger);
/// assert!(logger.display_name().contains("Logger"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Key for `T`, sized or not.
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Key {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The `TypeId` backing this key.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Get the type or trait name for display
    ///
    /// Returns the `std::any::type_name` of the keyed type.
    #[inline]
    pub fn display_name(&self) -> &'static str {
        self.name
    }
}

// TypeId-only equality and hashing; the name is diagnostic
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl Hash for Key {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Key {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Helper function for creating type keys
#[inline(always)]
pub fn key_of_type<T: ?Sized + 'static>() -> Key {
    Key::of::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    trait Marker {}

    #[test]
    fn trait_objects_and_concrete_types_get_distinct_keys() {
        struct Concrete;
        impl Marker for Concrete {}

        let keys: HashSet<Key> = [Key::of::<Concrete>(), Key::of::<dyn Marker>(), Key::of::<Concrete>()]
            .into_iter()
            .collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn ordering_is_consistent_with_equality() {
        let a = Key::of::<u8>();
        let b = Key::of::<u16>();
        assert_eq!(a.cmp(&a), Ordering::Equal);
        assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }

    #[test]
    fn display_uses_type_name() {
        assert_eq!(Key::of::<u32>().to_string(), "u32");
        assert_eq!(key_of_type::<u32>(), Key::of::<u32>());
    }
}
