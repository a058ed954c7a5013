//! The frozen container and its resolution engine.
//!
//! A [`Container`] owns the registry produced by the installation phase and
//! turns service keys into fully constructed instances:
//!
//! 1. an already cached instance is returned as is;
//! 2. an alias binding (abstract implementation) resolves its target and
//!    reuses the constructor that produced the target's concrete instance;
//! 3. otherwise every constructor parameter is resolved, in declaration
//!    order, through this same algorithm, and the constructor is invoked;
//! 4. singletons publish the result in their descriptor.
//!
//! Each top-level request carries its own resolution path, so cycles are
//! reported as [`DiError::DependencyCycle`] instead of recursing forever.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ContainerOptions;
use crate::descriptors::{Plan, Realized, ServiceDescriptor};
use crate::error::{DiError, DiResult};
use crate::internal::ResolutionPath;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::observer::Observers;
use crate::reflect::AnyArc;
use crate::registration::Registry;
use crate::traits::ResolverCore;

/// Dependency injection container.
///
/// Built once by [`Binder::build`](crate::Binder::build) and immutable
/// afterwards apart from the lazily filled singleton and redirect caches.
/// Cloning is cheap and every clone shares those caches. The container is
/// `Send + Sync`; resolution may run concurrently from any number of threads.
///
/// # Examples
///
/// ```
/// use graft_di::{abstract_type, implements, Binder, Constructor, Injectable, Resolver, TypeShape};
/// use std::sync::Arc;
///
/// trait Openable: Send + Sync { fn open(&self) -> &'static str; }
/// abstract_type!(dyn Openable);
///
/// struct Door;
/// impl Openable for Door { fn open(&self) -> &'static str { "creak" } }
/// implements!(Door => dyn Openable);
/// impl Injectable for Door {
///     fn shape() -> TypeShape {
///         TypeShape::concrete(vec![Constructor::<Self>::new("new").inject().build(|_| Ok(Door))])
///     }
/// }
///
/// struct Human { door: Arc<dyn Openable> }
/// impl Injectable for Human {
///     fn shape() -> TypeShape {
///         TypeShape::concrete(vec![
///             Constructor::<Self>::new("new")
///                 .inject()
///                 .param::<dyn Openable>()
///                 .build(|args| Ok(Human { door: args.next()? })),
///         ])
///     }
/// }
///
/// let mut binder = Binder::new();
/// binder.bind_singleton_to::<dyn Openable, Door>().unwrap();
/// binder.bind_singleton::<Human>().unwrap();
/// let container = binder.build().unwrap();
///
/// let human = container.get_required::<Human>();
/// assert_eq!(human.door.open(), "creak");
/// assert!(Arc::ptr_eq(&human.door, &container.get_required::<dyn Openable>()));
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

struct ContainerInner {
    registry: Registry,
    observers: Observers,
    options: ContainerOptions,
}

/// Outcome of following an alias binding.
enum Redirect {
    /// Construct through this plan.
    Construct(Plan),
    /// Serve this already realized value.
    Share(Realized),
}

impl Container {
    pub(crate) fn new(registry: Registry, observers: Observers, options: ContainerOptions) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registry,
                observers,
                options,
            }),
        }
    }

    pub fn options(&self) -> &ContainerOptions {
        &self.inner.options
    }

    /// Looks up the descriptor bound to `key`.
    pub fn descriptor(&self, key: &Key) -> Option<&ServiceDescriptor> {
        self.inner.registry.get(key)
    }

    /// All descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.inner.registry.iter()
    }

    /// Whether `T` has a binding.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.inner.registry.contains_key(&Key::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Container Debug ===\n");
        for d in self.descriptors() {
            let target = d
                .implementation_key()
                .map(|k| k.display_name())
                .unwrap_or("self");
            s.push_str(&format!(
                "  {} -> {} [{}] ctor={:?} realized={}\n",
                d.service_key().display_name(),
                target,
                d.lifetime(),
                d.constructor_name(),
                d.is_realized(),
            ));
        }
        s
    }

    /// Resolves `key` on an existing path.
    pub(crate) fn resolve_on_path(&self, key: &Key, path: &mut ResolutionPath) -> DiResult<Realized> {
        let descriptor = self
            .inner
            .registry
            .get(key)
            .ok_or(DiError::UnboundService(key.display_name()))?;

        if let Some(realized) = descriptor.cached() {
            tracing::trace!(service = key.display_name(), "singleton cache hit");
            return Ok(realized.clone());
        }

        path.enter(*key)?;
        let result = self.observe(key, |container| container.realize(descriptor, path));
        path.leave(*key);
        result
    }

    fn observe<F>(&self, key: &Key, realize: F) -> DiResult<Realized>
    where
        F: FnOnce(&Self) -> DiResult<Realized>,
    {
        let observers = &self.inner.observers;
        if !observers.has_observers() {
            return realize(self).inspect_err(|error| {
                tracing::debug!(service = key.display_name(), %error, "resolution failed");
            });
        }

        let start = Instant::now();
        observers.resolving(key);
        let result = realize(self);
        match &result {
            Ok(_) => observers.resolved(key, start.elapsed()),
            Err(error) => {
                tracing::debug!(service = key.display_name(), %error, "resolution failed");
                observers.failed(key, error);
            }
        }
        result
    }

    fn realize(&self, descriptor: &ServiceDescriptor, path: &mut ResolutionPath) -> DiResult<Realized> {
        let plan = match descriptor.constructor() {
            Some(ctor) => Plan {
                ctor: ctor.clone(),
                cast: descriptor.cast().clone(),
            },
            None => match self.redirect(descriptor, path)? {
                Redirect::Construct(plan) => plan,
                Redirect::Share(realized) => return Ok(descriptor.memoize(realized)),
            },
        };

        let value = self.construct(&plan, path)?;
        Ok(descriptor.memoize(Realized {
            value,
            origin: Some(plan),
        }))
    }

    /// Follows an alias binding to its target.
    ///
    /// The target's concrete constructor is cached in the descriptor the
    /// first time the target is realized. Singleton aliases share the
    /// target's instance; transient aliases construct fresh ones through
    /// the cached constructor.
    fn redirect(&self, descriptor: &ServiceDescriptor, path: &mut ResolutionPath) -> DiResult<Redirect> {
        let service = descriptor.service_key();
        let target = descriptor.effective_implementation();
        if target == service {
            return Err(DiError::UnresolvableAbstraction(service.display_name()));
        }

        if descriptor.lifetime() == Lifetime::Transient {
            if let Some(Some(plan)) = descriptor.cached_redirect() {
                return Ok(Redirect::Construct(plan.clone()));
            }
        }

        tracing::trace!(
            service = service.display_name(),
            target = target.display_name(),
            "following alias binding"
        );
        let resolved = self.resolve_on_path(&target, path)?;
        let origin = descriptor.remember_redirect(
            resolved
                .origin
                .as_ref()
                .map(|plan| plan.then(descriptor.cast().clone())),
        );

        match (descriptor.lifetime(), origin) {
            (Lifetime::Transient, Some(plan)) => Ok(Redirect::Construct(plan)),
            (_, origin) => Ok(Redirect::Share(Realized {
                value: (descriptor.cast())(resolved.value)?,
                origin,
            })),
        }
    }

    fn construct(&self, plan: &Plan, path: &mut ResolutionPath) -> DiResult<AnyArc> {
        let params = plan.ctor.params();
        let mut values = Vec::with_capacity(params.len());
        for param in params {
            values.push(self.resolve_on_path(param, path)?.value);
        }

        tracing::debug!(
            service = plan.ctor.owner().display_name(),
            constructor = plan.ctor.name(),
            depth = path.depth(),
            "invoking constructor"
        );
        let raw = plan.ctor.invoke(values)?;
        (plan.cast)(raw)
    }
}

impl ResolverCore for Container {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        let mut path = ResolutionPath::new(self.inner.options.max_depth);
        self.resolve_on_path(key, &mut path).map(|realized| realized.value)
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("services", &self.len())
            .field("options", &self.inner.options)
            .finish()
    }
}

#[cfg(all(test, feature = "diagnostics"))]
mod tests {
    use crate::{Binder, Constructor, Injectable, Resolver, TypeShape};

    struct Clock;

    impl Injectable for Clock {
        fn shape() -> TypeShape {
            TypeShape::concrete(vec![Constructor::<Self>::new("new").inject().build(|_| Ok(Clock))])
        }
    }

    #[test]
    fn debug_string_lists_each_descriptor() {
        let mut binder = Binder::new();
        binder
            .bind_singleton_value(5u8)
            .unwrap()
            .bind_singleton::<Clock>()
            .unwrap();
        let container = binder.build().unwrap();

        let dump = container.to_debug_string();
        assert!(dump.starts_with("=== Container Debug ===\n"));
        assert!(dump.contains("  u8 -> self [singleton] ctor=None realized=true\n"));

        let clock = std::any::type_name::<Clock>();
        let pending = format!("  {clock} -> self [singleton] ctor=Some(\"new\") realized=false\n");
        assert!(dump.contains(&pending));

        container.get_required::<Clock>();
        let done = format!("  {clock} -> self [singleton] ctor=Some(\"new\") realized=true\n");
        assert!(container.to_debug_string().contains(&done));
    }
}
