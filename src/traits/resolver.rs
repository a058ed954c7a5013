//! Resolver traits for service resolution.

use std::sync::Arc;

use crate::error::DiResult;
use crate::key::Key;
use crate::reflect::{downcast_service, AnyArc};

/// Core resolver trait for object-safe service resolution.
///
/// Most users should use the [`Resolver`] trait instead, which adds typed
/// generic methods on top of this one.
pub trait ResolverCore: Send + Sync {
    /// Resolves the service bound to `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(AnyArc)` - The resolved service, an erased `Arc<S>`
    /// * `Err(DiError)` - Resolution error (unbound, cycle, no concrete implementation, ...)
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc>;
}

/// Typed resolution on top of [`ResolverCore`].
///
/// `T` may be a concrete type or a trait object; either way the service
/// comes back as `Arc<T>`.
///
/// # Examples
///
/// ```
/// use graft_di::{Binder, Resolver};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct English;
/// impl Greeter for English { fn greet(&self) -> String { "hello".into() } }
///
/// let mut binder = Binder::new();
/// binder.bind_singleton_value("configuration".to_string()).unwrap();
/// binder.bind_singleton_instance::<dyn Greeter>(Arc::new(English)).unwrap();
/// let container = binder.build().unwrap();
///
/// assert_eq!(&*container.get::<String>().unwrap(), "configuration");
/// assert_eq!(container.get_required::<dyn Greeter>().greet(), "hello");
/// assert!(container.get::<u8>().is_err());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves service `T`.
    fn get<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        let any = self.resolve_any(&Key::of::<T>())?;
        downcast_service::<T>(&any)
    }

    /// Resolves service `T`, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics with the resolution error message if `T` cannot be resolved.
    fn get_required<T: ?Sized + Send + Sync + 'static>(&self) -> Arc<T> {
        match self.get::<T>() {
            Ok(service) => service,
            Err(e) => panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e),
        }
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
