//! Constructor selection.
//!
//! Runs once per binding, while the binder is being populated, so a type
//! with a missing or ambiguous injection marker fails the installation
//! instead of the first resolution.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::reflect::{ConstructorInfo, Injectable, TypeShape};

/// Selects the injectable constructor of `I`.
///
/// Returns `Ok(None)` for abstract types: their descriptors resolve through
/// another binding.
///
/// # Examples
///
/// ```rust
/// use graft_di::{selector, Constructor, DiError, Injectable, TypeShape};
///
/// struct Unmarked;
/// impl Injectable for Unmarked {
///     fn shape() -> TypeShape {
///         TypeShape::concrete(vec![Constructor::<Self>::new("new").build(|_| Ok(Unmarked))])
///     }
/// }
///
/// assert!(matches!(
///     selector::select_constructor::<Unmarked>(),
///     Err(DiError::NoInjectableConstructor(_))
/// ));
/// ```
pub fn select_constructor<I: Injectable + ?Sized>() -> DiResult<Option<Arc<ConstructorInfo>>> {
    select(I::shape(), std::any::type_name::<I>())
}

/// Applies the cardinality rule to an already-described type.
///
/// Exactly one marked constructor is selected; zero or several are fatal.
pub fn select(shape: TypeShape, type_name: &'static str) -> DiResult<Option<Arc<ConstructorInfo>>> {
    let constructors = match shape {
        TypeShape::Abstract => return Ok(None),
        TypeShape::Concrete(constructors) => constructors,
    };

    let mut marked = constructors.into_iter().filter(ConstructorInfo::is_injectable);
    match (marked.next(), marked.next()) {
        (Some(only), None) => Ok(Some(Arc::new(only))),
        (None, _) => Err(DiError::NoInjectableConstructor(type_name)),
        (Some(_), Some(_)) => Err(DiError::AmbiguousInjectableConstructor {
            type_name,
            count: 2 + marked.count(),
        }),
    }
}
