//! Constructor metadata: the reflection capability the container runs on.
//!
//! Rust has no runtime reflection, so every injectable type describes itself
//! through [`Injectable::shape`]: either it is abstract (a trait object that
//! must be resolved through another binding), or it lists its constructors,
//! each with ordered parameter keys and an optional injection marker.
//!
//! [`Implements`] is the "is-a" relation between an implementation and the
//! service it is bound to. It is what lets `Arc<Door>` be handed out as
//! `Arc<dyn Openable>`.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;

/// Type-erased shared service.
///
/// The erased value is always an `Arc<S>` for the service type `S` it was
/// resolved as, so sized types and trait objects share one representation.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

#[inline]
pub(crate) fn erase<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> AnyArc {
    Arc::new(value)
}

#[inline]
pub(crate) fn downcast_service<T: ?Sized + 'static>(value: &AnyArc) -> DiResult<Arc<T>> {
    value
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or(DiError::TypeMismatch(std::any::type_name::<T>()))
}

/// Shape of a type as seen by the constructor selector.
pub enum TypeShape {
    /// Interface or abstract type; resolution redirects to another binding.
    Abstract,
    /// Concrete type with its declared constructors.
    Concrete(Vec<ConstructorInfo>),
}

impl TypeShape {
    /// Concrete shape from any list of constructors.
    pub fn concrete(constructors: impl IntoIterator<Item = ConstructorInfo>) -> Self {
        TypeShape::Concrete(constructors.into_iter().collect())
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, TypeShape::Abstract)
    }
}

impl fmt::Debug for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeShape::Abstract => f.write_str("Abstract"),
            TypeShape::Concrete(ctors) => f.debug_tuple("Concrete").field(ctors).finish(),
        }
    }
}

/// Types the container can bind.
///
/// Concrete types return [`TypeShape::Concrete`] with their constructors;
/// trait objects return [`TypeShape::Abstract`], usually through the
/// [`abstract_type!`](crate::abstract_type) macro.
///
/// # Examples
///
/// ```rust
/// use graft_di::{Constructor, Injectable, TypeShape};
/// use std::sync::Arc;
///
/// struct Config { port: u16 }
/// struct Server { config: Arc<Config> }
///
/// impl Injectable for Server {
///     fn shape() -> TypeShape {
///         TypeShape::concrete(vec![
///             Constructor::<Self>::new("new")
///                 .inject()
///                 .param::<Config>()
///                 .build(|args| Ok(Server { config: args.next()? })),
///             // not marked, never chosen by the container
///             Constructor::<Self>::new("with_default_port")
///                 .build(|_| Ok(Server { config: Arc::new(Config { port: 80 }) })),
///         ])
///     }
/// }
///
/// assert!(!Server::shape().is_abstract());
/// ```
pub trait Injectable: 'static {
    /// Describes this type's constructors, or marks it abstract.
    fn shape() -> TypeShape;
}

/// "Is-a" relation from an implementation to a service type.
///
/// Every type implements itself. Concrete types implement the trait objects
/// they can stand in for via [`implements!`](crate::implements); a trait
/// object can also implement one of its supertraits, which is what makes
/// interface-to-interface bindings possible.
pub trait Implements<S: ?Sized>: Send + Sync + 'static {
    /// Converts a shared implementation into the service view.
    fn upcast(this: Arc<Self>) -> Arc<S>;
}

impl<T: ?Sized + Send + Sync + 'static> Implements<T> for T {
    #[inline]
    fn upcast(this: Arc<Self>) -> Arc<T> {
        this
    }
}

/// Declares that a type can be served as one or more other types.
///
/// ```rust
/// use graft_di::{implements, Implements};
/// use std::sync::Arc;
///
/// trait Grabbable: Send + Sync { fn grab(&self) -> &'static str; }
/// trait Openable: Grabbable { fn open(&self) -> &'static str; }
///
/// struct Door;
/// impl Grabbable for Door { fn grab(&self) -> &'static str { "knob" } }
/// impl Openable for Door { fn open(&self) -> &'static str { "open" } }
///
/// implements!(Door => dyn Openable, dyn Grabbable);
/// implements!(dyn Openable => dyn Grabbable);
///
/// let door: Arc<dyn Openable> = <Door as Implements<dyn Openable>>::upcast(Arc::new(Door));
/// let grabbable: Arc<dyn Grabbable> = <dyn Openable as Implements<dyn Grabbable>>::upcast(door);
/// assert_eq!(grabbable.grab(), "knob");
/// ```
#[macro_export]
macro_rules! implements {
    ($implementation:ty => $($service:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$service> for $implementation {
                #[inline]
                fn upcast(this: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$service> {
                    this
                }
            }
        )+
    };
}

/// Marks trait object types as abstract [`Injectable`]s.
///
/// ```rust
/// use graft_di::{abstract_type, Injectable};
///
/// trait Repository: Send + Sync {}
/// abstract_type!(dyn Repository);
///
/// assert!(<dyn Repository as Injectable>::shape().is_abstract());
/// ```
#[macro_export]
macro_rules! abstract_type {
    ($($service:ty),+ $(,)?) => {
        $(
            impl $crate::Injectable for $service {
                fn shape() -> $crate::TypeShape {
                    $crate::TypeShape::Abstract
                }
            }
        )+
    };
}

type Invoke = Arc<dyn Fn(&mut Args) -> DiResult<AnyArc> + Send + Sync>;

/// Type-erased constructor of a concrete type.
///
/// Built with [`Constructor`]. The container only ever invokes the single
/// constructor carrying the injection marker.
pub struct ConstructorInfo {
    owner: Key,
    name: &'static str,
    injectable: bool,
    params: Vec<Key>,
    invoke: Invoke,
}

impl ConstructorInfo {
    /// The type this constructor builds.
    pub fn owner(&self) -> Key {
        self.owner
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the constructor carries the injection marker.
    pub fn is_injectable(&self) -> bool {
        self.injectable
    }

    /// Parameter types in declaration order.
    pub fn params(&self) -> &[Key] {
        &self.params
    }

    /// Runs the constructor with already-resolved arguments.
    ///
    /// The result is the erased `Arc<Owner>`.
    pub(crate) fn invoke(&self, values: Vec<AnyArc>) -> DiResult<AnyArc> {
        let mut args = Args::new(self.owner.display_name(), values);
        (self.invoke)(&mut args)
    }
}

impl fmt::Debug for ConstructorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorInfo")
            .field("owner", &self.owner.display_name())
            .field("name", &self.name)
            .field("injectable", &self.injectable)
            .field("params", &self.params.iter().map(Key::display_name).collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`ConstructorInfo`].
///
/// Declare parameters with [`param`](Self::param) in the same order the body
/// pulls them from [`Args::next`].
pub struct Constructor<T> {
    name: &'static str,
    injectable: bool,
    params: Vec<Key>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> Constructor<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            injectable: false,
            params: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Attaches the injection marker.
    pub fn inject(mut self) -> Self {
        self.injectable = true;
        self
    }

    /// Declares the next parameter type.
    pub fn param<P: ?Sized + 'static>(mut self) -> Self {
        self.params.push(Key::of::<P>());
        self
    }

    /// Finishes the constructor with its body.
    pub fn build<F>(self, body: F) -> ConstructorInfo
    where
        F: Fn(&mut Args) -> DiResult<T> + Send + Sync + 'static,
    {
        ConstructorInfo {
            owner: Key::of::<T>(),
            name: self.name,
            injectable: self.injectable,
            params: self.params,
            invoke: Arc::new(move |args| body(args).map(|value| erase(Arc::new(value)))),
        }
    }
}

/// Resolved arguments handed to a constructor or injection method.
pub struct Args {
    owner: &'static str,
    values: std::vec::IntoIter<AnyArc>,
    position: usize,
}

impl Args {
    pub(crate) fn new(owner: &'static str, values: Vec<AnyArc>) -> Self {
        Self {
            owner,
            values: values.into_iter(),
            position: 0,
        }
    }

    /// Takes the next argument as `Arc<P>`.
    ///
    /// Fails with [`DiError::TypeMismatch`] when the declared parameter at
    /// this position was not `P`, and with [`DiError::MissingArgument`] when
    /// all declared parameters have been consumed.
    pub fn next<P: ?Sized + 'static>(&mut self) -> DiResult<Arc<P>> {
        let position = self.position;
        self.position += 1;
        let value = self.values.next().ok_or(DiError::MissingArgument {
            owner: self.owner,
            position,
        })?;
        downcast_service::<P>(&value)
    }

    /// Number of arguments not yet taken.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf(u32);

    #[test]
    fn builder_records_marker_and_params_in_order() {
        let ctor = Constructor::<Leaf>::new("new")
            .inject()
            .param::<u8>()
            .param::<str>()
            .build(|_| Ok(Leaf(1)));

        assert!(ctor.is_injectable());
        assert_eq!(ctor.name(), "new");
        assert_eq!(ctor.owner(), Key::of::<Leaf>());
        assert_eq!(ctor.params(), &[Key::of::<u8>(), Key::of::<str>()]);
    }

    #[test]
    fn invoke_erases_result_as_shared_owner() {
        let ctor = Constructor::<Leaf>::new("new")
            .param::<u32>()
            .build(|args| Ok(Leaf(*args.next::<u32>()? + 1)));

        let value = ctor.invoke(vec![erase(Arc::new(41u32))]).unwrap();
        let leaf = downcast_service::<Leaf>(&value).unwrap();
        assert_eq!(leaf.0, 42);
    }

    #[test]
    fn args_report_mismatch_and_exhaustion() {
        let mut args = Args::new("Leaf", vec![erase(Arc::new(1u8))]);
        assert_eq!(args.remaining(), 1);
        assert_eq!(
            args.next::<u16>().unwrap_err(),
            DiError::TypeMismatch("u16")
        );
        assert_eq!(
            args.next::<u8>().unwrap_err(),
            DiError::MissingArgument { owner: "Leaf", position: 1 }
        );
    }

    #[test]
    fn every_type_implements_itself() {
        let value = Arc::new(7u64);
        let same = <u64 as Implements<u64>>::upcast(value.clone());
        assert!(Arc::ptr_eq(&value, &same));
    }
}
