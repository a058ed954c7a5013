//! Method injection into objects the container did not construct.
//!
//! Objects created elsewhere (by a host framework, a scene loader, a test)
//! can still receive dependencies: every method carrying the injection
//! marker is invoked with its parameters resolved from the container.

use std::fmt;
use std::marker::PhantomData;

use crate::error::DiResult;
use crate::key::Key;
use crate::reflect::Args;
use crate::traits::ResolverCore;
use crate::Container;

type InvokeMethod<T> = Box<dyn Fn(&mut T, &mut Args) -> DiResult<()> + Send + Sync>;

/// Injection method of `T`.
pub struct MethodInfo<T> {
    name: &'static str,
    injectable: bool,
    params: Vec<Key>,
    invoke: InvokeMethod<T>,
}

impl<T> MethodInfo<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_injectable(&self) -> bool {
        self.injectable
    }

    pub fn params(&self) -> &[Key] {
        &self.params
    }
}

impl<T> fmt::Debug for MethodInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("injectable", &self.injectable)
            .field("params", &self.params.iter().map(Key::display_name).collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`MethodInfo`], mirroring [`Constructor`](crate::Constructor).
pub struct Method<T> {
    name: &'static str,
    injectable: bool,
    params: Vec<Key>,
    _marker: PhantomData<fn(&mut T)>,
}

impl<T: 'static> Method<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            injectable: false,
            params: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn inject(mut self) -> Self {
        self.injectable = true;
        self
    }

    pub fn param<P: ?Sized + 'static>(mut self) -> Self {
        self.params.push(Key::of::<P>());
        self
    }

    pub fn build<F>(self, body: F) -> MethodInfo<T>
    where
        F: Fn(&mut T, &mut Args) -> DiResult<()> + Send + Sync + 'static,
    {
        MethodInfo {
            name: self.name,
            injectable: self.injectable,
            params: self.params,
            invoke: Box::new(body),
        }
    }
}

/// Types that expose injection methods.
///
/// # Examples
///
/// ```rust
/// use graft_di::{Binder, Method, MethodInjectable, MethodInfo};
/// use std::sync::Arc;
///
/// struct Greeting(&'static str);
///
/// #[derive(Default)]
/// struct Widget { greeting: Option<Arc<Greeting>> }
///
/// impl MethodInjectable for Widget {
///     fn methods() -> Vec<MethodInfo<Self>> {
///         vec![
///             Method::<Self>::new("construct")
///                 .inject()
///                 .param::<Greeting>()
///                 .build(|widget, args| {
///                     widget.greeting = Some(args.next()?);
///                     Ok(())
///                 }),
///         ]
///     }
/// }
///
/// let mut binder = Binder::new();
/// binder.bind_singleton_value(Greeting("hi")).unwrap();
/// let container = binder.build().unwrap();
///
/// let mut widget = Widget::default();
/// assert_eq!(container.inject_into(&mut widget).unwrap(), 1);
/// assert_eq!(widget.greeting.unwrap().0, "hi");
/// ```
pub trait MethodInjectable: Sized + 'static {
    /// All methods of the type, marked or not, in declaration order.
    fn methods() -> Vec<MethodInfo<Self>>;
}

impl Container {
    /// Invokes every marked method of `target` in declaration order.
    ///
    /// Returns how many methods were invoked. Arguments of each method are
    /// resolved right before it runs; the first failure stops injection, and
    /// methods already invoked are not rolled back.
    pub fn inject_into<T: MethodInjectable>(&self, target: &mut T) -> DiResult<usize> {
        let mut invoked = 0;
        for method in T::methods().into_iter().filter(MethodInfo::is_injectable) {
            let values = method
                .params
                .iter()
                .map(|param| self.resolve_any(param))
                .collect::<DiResult<Vec<_>>>()?;

            tracing::debug!(
                target_type = std::any::type_name::<T>(),
                method = method.name,
                "invoking injection method"
            );
            let mut args = Args::new(std::any::type_name::<T>(), values);
            (method.invoke)(target, &mut args)?;
            invoked += 1;
        }
        Ok(invoked)
    }
}
