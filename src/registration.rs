//! Binding registry.

use std::collections::HashMap;

use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::key::Key;

#[cfg(feature = "ahash")]
type Map<K, V> = HashMap<K, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
type Map<K, V> = HashMap<K, V>;

/// Append-only mapping from service key to descriptor.
///
/// Registration order is kept separately for introspection.
#[derive(Default)]
pub(crate) struct Registry {
    descriptors: Map<Key, ServiceDescriptor>,
    order: Vec<Key>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a descriptor; an existing binding for the key is left intact
    /// and the insert fails.
    pub(crate) fn insert(&mut self, descriptor: ServiceDescriptor) -> DiResult<()> {
        let key = descriptor.service_key();
        if self.descriptors.contains_key(&key) {
            return Err(DiError::DuplicateBinding(key.display_name()));
        }
        self.descriptors.insert(key, descriptor);
        self.order.push(key);
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn get(&self, key: &Key) -> Option<&ServiceDescriptor> {
        self.descriptors.get(key)
    }

    #[inline(always)]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.descriptors.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Descriptors in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.order.iter().filter_map(move |key| self.descriptors.get(key))
    }
}
