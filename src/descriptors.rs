//! Service descriptors: one record per binding.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::DiResult;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::reflect::{downcast_service, erase, AnyArc, ConstructorInfo, Implements};

/// Converts an erased implementation view into an erased service view.
pub(crate) type Caster = Arc<dyn Fn(AnyArc) -> DiResult<AnyArc> + Send + Sync>;

/// Caster from `Arc<I>` to `Arc<S>`.
pub(crate) fn caster<S, I>() -> Caster
where
    S: ?Sized + Send + Sync + 'static,
    I: ?Sized + Implements<S>,
{
    Arc::new(|value: AnyArc| {
        let implementation = downcast_service::<I>(&value)?;
        Ok(erase::<S>(<I as Implements<S>>::upcast(implementation)))
    })
}

/// A constructor together with the cast that turns its output into the
/// service view of the descriptor it is used for.
#[derive(Clone)]
pub(crate) struct Plan {
    pub(crate) ctor: Arc<ConstructorInfo>,
    pub(crate) cast: Caster,
}

impl Plan {
    /// Same constructor, output passed through `next` afterwards.
    pub(crate) fn then(&self, next: Caster) -> Plan {
        let first = self.cast.clone();
        Plan {
            ctor: self.ctor.clone(),
            cast: Arc::new(move |value| next(first(value)?)),
        }
    }
}

/// A realized service plus the plan that produced it, if any.
///
/// The plan is the runtime concrete type of the instance: alias bindings use
/// it to find the constructor they redirect to.
#[derive(Clone)]
pub(crate) struct Realized {
    pub(crate) value: AnyArc,
    pub(crate) origin: Option<Plan>,
}

/// Service descriptor
///
/// Binding metadata is fixed when the descriptor is created. Two memo cells
/// are filled at most once after the container is built: the singleton
/// instance, and for alias bindings the redirected constructor. Both are
/// `OnceCell`s, so concurrent first resolutions race to a single published
/// value.
///
/// # Examples
///
/// ```rust
/// use graft_di::{Binder, Constructor, Injectable, Key, Lifetime, TypeShape};
///
/// struct Database;
/// impl Injectable for Database {
///     fn shape() -> TypeShape {
///         TypeShape::concrete(vec![Constructor::<Self>::new("connect").inject().build(|_| Ok(Database))])
///     }
/// }
///
/// let mut binder = Binder::new();
/// binder.bind_singleton::<Database>().unwrap();
/// binder.bind_singleton_value(8080u16).unwrap();
/// let container = binder.build().unwrap();
///
/// let db = container.descriptor(&Key::of::<Database>()).unwrap();
/// assert_eq!(db.lifetime(), Lifetime::Singleton);
/// assert_eq!(db.constructor_name(), Some("connect"));
/// assert!(!db.is_realized());
///
/// let port = container.descriptor(&Key::of::<u16>()).unwrap();
/// assert!(port.is_instance_binding());
/// assert!(port.is_realized());
/// ```
pub struct ServiceDescriptor {
    service: Key,
    implementation: Option<Key>,
    lifetime: Lifetime,
    constructor: Option<Arc<ConstructorInfo>>,
    instance_bound: bool,
    cast: Caster,
    instance: OnceCell<Realized>,
    redirect: OnceCell<Option<Plan>>,
}

impl ServiceDescriptor {
    /// Descriptor for a pre-built singleton.
    pub(crate) fn for_instance<S>(instance: Arc<S>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        Self {
            service: Key::of::<S>(),
            implementation: None,
            lifetime: Lifetime::Singleton,
            constructor: None,
            instance_bound: true,
            cast: caster::<S, S>(),
            instance: OnceCell::with_value(Realized {
                value: erase(instance),
                origin: None,
            }),
            redirect: OnceCell::new(),
        }
    }

    /// Descriptor for a type binding. `implementation` is `None` for
    /// self-bindings.
    pub(crate) fn for_type<S, I>(
        lifetime: Lifetime,
        implementation: Option<Key>,
        constructor: Option<Arc<ConstructorInfo>>,
    ) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: ?Sized + Implements<S>,
    {
        Self {
            service: Key::of::<S>(),
            implementation,
            lifetime,
            constructor,
            instance_bound: false,
            cast: caster::<S, I>(),
            instance: OnceCell::new(),
            redirect: OnceCell::new(),
        }
    }

    /// The service identifier this descriptor is keyed by.
    pub fn service_key(&self) -> Key {
        self.service
    }

    /// The implementation type, when it differs from the service type.
    pub fn implementation_key(&self) -> Option<Key> {
        self.implementation
    }

    /// The type that is actually constructed or redirected to.
    pub fn effective_implementation(&self) -> Key {
        self.implementation.unwrap_or(self.service)
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Name of the selected injectable constructor, if the implementation is
    /// concrete.
    pub fn constructor_name(&self) -> Option<&'static str> {
        self.constructor.as_ref().map(|ctor| ctor.name())
    }

    /// Parameter types of the selected constructor; empty for aliases and
    /// instance bindings.
    pub fn dependencies(&self) -> &[Key] {
        self.constructor.as_ref().map(|ctor| ctor.params()).unwrap_or(&[])
    }

    /// True for bindings whose implementation is abstract.
    pub fn is_alias(&self) -> bool {
        self.constructor.is_none() && !self.instance_bound
    }

    pub fn is_instance_binding(&self) -> bool {
        self.instance_bound
    }

    /// True once a singleton instance is cached (always true for instance
    /// bindings, never for transients).
    pub fn is_realized(&self) -> bool {
        self.instance.get().is_some()
    }

    /// True once an alias has discovered the constructor it redirects to.
    pub fn is_redirect_resolved(&self) -> bool {
        matches!(self.redirect.get(), Some(Some(_)))
    }

    pub(crate) fn constructor(&self) -> Option<&Arc<ConstructorInfo>> {
        self.constructor.as_ref()
    }

    pub(crate) fn cast(&self) -> &Caster {
        &self.cast
    }

    pub(crate) fn cached(&self) -> Option<&Realized> {
        self.instance.get()
    }

    pub(crate) fn cached_redirect(&self) -> Option<&Option<Plan>> {
        self.redirect.get()
    }

    /// Publishes the redirected plan; the first writer wins.
    pub(crate) fn remember_redirect(&self, plan: Option<Plan>) -> Option<Plan> {
        self.redirect.get_or_init(|| plan).clone()
    }

    /// Caches a singleton; transients pass through untouched.
    ///
    /// Returns whatever value is published, which under a concurrent first
    /// use may be another thread's instance.
    pub(crate) fn memoize(&self, realized: Realized) -> Realized {
        match self.lifetime {
            Lifetime::Singleton => self.instance.get_or_init(|| realized).clone(),
            Lifetime::Transient => realized,
        }
    }
}

impl std::fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("service", &self.service.display_name())
            .field("implementation", &self.implementation.map(|key| key.display_name()))
            .field("lifetime", &self.lifetime)
            .field("constructor", &self.constructor_name())
            .field("instance_bound", &self.instance_bound)
            .field("realized", &self.is_realized())
            .finish()
    }
}
