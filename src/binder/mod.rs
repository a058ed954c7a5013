//! Binder: the registration side of the container.
//!
//! The binder is only alive during the installation phase. Each `bind_*`
//! call selects the implementation's injectable constructor immediately and
//! appends one descriptor; [`Binder::build`] then moves the accumulated
//! registry into a [`Container`] and the binder is gone.

use std::sync::Arc;

use crate::config::ContainerOptions;
use crate::descriptors::ServiceDescriptor;
use crate::error::DiResult;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::observer::{DiObserver, Observers};
use crate::reflect::{Implements, Injectable};
use crate::registration::Registry;
use crate::selector::select_constructor;
use crate::Container;

pub mod installer;
pub use installer::*;

/// Collects bindings during the installation phase.
///
/// Every registration method returns `DiResult<&mut Self>` so calls can be
/// chained with `?`. A failing call leaves the binder exactly as it was.
///
/// # Examples
///
/// ```rust
/// use graft_di::{Binder, Constructor, DiError, Injectable, Resolver, TypeShape};
///
/// struct Config { port: u16 }
/// struct Server { port: u16 }
///
/// impl Injectable for Server {
///     fn shape() -> TypeShape {
///         TypeShape::concrete(vec![
///             Constructor::<Self>::new("new")
///                 .inject()
///                 .param::<Config>()
///                 .build(|args| Ok(Server { port: args.next::<Config>()?.port })),
///         ])
///     }
/// }
///
/// # fn main() -> Result<(), DiError> {
/// let mut binder = Binder::new();
/// binder
///     .bind_singleton_value(Config { port: 8080 })?
///     .bind_transient::<Server>()?;
///
/// // re-binding is a configuration error
/// assert!(matches!(binder.bind_transient::<Server>(), Err(DiError::DuplicateBinding(_))));
///
/// let container = binder.build()?;
/// assert_eq!(container.get::<Server>()?.port, 8080);
/// # Ok(())
/// # }
/// ```
pub struct Binder {
    registry: Registry,
    observers: Observers,
    options: ContainerOptions,
}

impl Binder {
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    pub fn with_options(options: ContainerOptions) -> Self {
        Self {
            registry: Registry::new(),
            observers: Observers::new(),
            options,
        }
    }

    pub fn options(&self) -> &ContainerOptions {
        &self.options
    }

    // ----- Instance Bindings -----

    /// Binds `S` to an already constructed instance.
    ///
    /// The instance is always returned as is; no constructor is ever run for
    /// this binding.
    pub fn bind_singleton_instance<S>(&mut self, instance: Arc<S>) -> DiResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        tracing::debug!(service = std::any::type_name::<S>(), "binding singleton instance");
        self.registry.insert(ServiceDescriptor::for_instance(instance))?;
        Ok(self)
    }

    /// Binds a sized value as its own singleton instance.
    pub fn bind_singleton_value<T>(&mut self, value: T) -> DiResult<&mut Self>
    where
        T: Send + Sync + 'static,
    {
        self.bind_singleton_instance(Arc::new(value))
    }

    // ----- Type Bindings -----

    /// Binds `S` to itself as a lazily constructed singleton.
    pub fn bind_singleton<S>(&mut self) -> DiResult<&mut Self>
    where
        S: ?Sized + Injectable + Send + Sync,
    {
        self.bind_type::<S, S>(Lifetime::Singleton)
    }

    /// Binds `S` to implementation `I` as a lazily constructed singleton.
    ///
    /// `I` may itself be abstract; the binding then aliases whatever `I` is
    /// bound to.
    pub fn bind_singleton_to<S, I>(&mut self) -> DiResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
        I: ?Sized + Injectable + Implements<S>,
    {
        self.bind_type::<S, I>(Lifetime::Singleton)
    }

    /// Binds `S` to itself; every resolution constructs a new instance.
    pub fn bind_transient<S>(&mut self) -> DiResult<&mut Self>
    where
        S: ?Sized + Injectable + Send + Sync,
    {
        self.bind_type::<S, S>(Lifetime::Transient)
    }

    /// Binds `S` to implementation `I`; every resolution constructs a new
    /// instance.
    pub fn bind_transient_to<S, I>(&mut self) -> DiResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
        I: ?Sized + Injectable + Implements<S>,
    {
        self.bind_type::<S, I>(Lifetime::Transient)
    }

    fn bind_type<S, I>(&mut self, lifetime: Lifetime) -> DiResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
        I: ?Sized + Injectable + Implements<S>,
    {
        let service = Key::of::<S>();
        let implementation = Some(Key::of::<I>()).filter(|key| *key != service);
        let constructor = select_constructor::<I>()?;

        tracing::debug!(
            service = service.display_name(),
            implementation = implementation.map(|key| key.display_name()).unwrap_or("self"),
            lifetime = %lifetime,
            constructor = constructor.as_ref().map(|c| c.name()).unwrap_or("<abstract>"),
            "binding type"
        );

        self.registry.insert(ServiceDescriptor::for_type::<S, I>(
            lifetime,
            implementation,
            constructor,
        ))?;
        Ok(self)
    }

    // ----- Installation -----

    /// Runs one installer against this binder.
    pub fn install<I: Installer + ?Sized>(&mut self, installer: &I) -> DiResult<&mut Self> {
        tracing::debug!(installer = installer.name(), "running installer");
        installer.install(self)?;
        Ok(self)
    }

    /// Registers an observer for resolution events.
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    // ----- Introspection -----

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.registry.contains_key(&Key::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ends the installation phase and freezes the bindings.
    ///
    /// With [`ContainerOptions::validate_on_build`] set, the bindings are
    /// validated first and the first issue is returned as the error.
    ///
    /// Fails with [`DiError::InvalidOptions`](crate::DiError::InvalidOptions)
    /// when `max_depth` is zero.
    pub fn build(self) -> DiResult<Container> {
        let options = self.options.check()?;
        let services = self.registry.len();
        let validate = options.validate_on_build;
        let container = Container::new(self.registry, self.observers, options);

        if validate {
            container.validate().into_result()?;
        }

        tracing::info!(services, "container built");
        Ok(container)
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Binder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder")
            .field("services", &self.registry.len())
            .field("options", &self.options)
            .finish()
    }
}
