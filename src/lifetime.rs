//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use graft_di::{Binder, Constructor, Injectable, Resolver, TypeShape};
/// use std::sync::Arc;
///
/// struct Clock;
/// impl Injectable for Clock {
///     fn shape() -> TypeShape {
///         TypeShape::concrete(vec![Constructor::<Self>::new("new").inject().build(|_| Ok(Clock))])
///     }
/// }
///
/// struct Request(u64);
/// impl Injectable for Request {
///     fn shape() -> TypeShape {
///         TypeShape::concrete(vec![Constructor::<Self>::new("new").inject().build(|_| Ok(Request(0)))])
///     }
/// }
///
/// let mut binder = Binder::new();
/// binder.bind_singleton::<Clock>().unwrap();
/// binder.bind_transient::<Request>().unwrap();
/// let container = binder.build().unwrap();
///
/// // Singleton: same instance on every resolution
/// assert!(Arc::ptr_eq(&container.get_required::<Clock>(), &container.get_required::<Clock>()));
///
/// // Transient: new instance every time
/// let a = container.get_required::<Request>();
/// let b = container.get_required::<Request>();
/// assert!(!Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Single instance per container, created on first use and cached forever
    ///
    /// The cached instance is shared across all threads. Pre-built instance
    /// bindings are always singletons.
    Singleton,
    /// New instance per resolution, never cached
    ///
    /// Every resolution reconstructs the subgraph rooted at the service;
    /// singleton dependencies inside that subgraph still come from their
    /// own cache.
    Transient,
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifetime::Singleton => f.write_str("singleton"),
            Lifetime::Transient => f.write_str("transient"),
        }
    }
}
