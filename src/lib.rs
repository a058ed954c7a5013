//! # graft-di
//!
//! Constructor-injection container with interface-to-implementation
//! bindings, lazy singletons and transients, for Rust.
//!
//! ## Features
//!
//! - **Two-phase lifecycle**: bindings are registered on a [`Binder`], then
//!   frozen into an immutable [`Container`]
//! - **Interface bindings**: `dyn Trait` services bound to concrete types or
//!   to other interfaces, resolved through alias chains
//! - **Marked constructors**: each type declares exactly one injectable
//!   constructor; ambiguity is a bind-time error
//! - **Thread-safe**: singletons are published once, even under concurrent
//!   first use
//! - **Circular dependency detection**: cycles are reported with the cyclic
//!   path instead of overflowing the stack
//!
//! ## Quick Start
//!
//! ```rust
//! use graft_di::{abstract_type, implements, Binder, Constructor, Injectable, Resolver, TypeShape};
//! use std::sync::Arc;
//!
//! trait Openable: Send + Sync {
//!     fn open(&self) -> String;
//! }
//! abstract_type!(dyn Openable);
//!
//! struct Door;
//! impl Openable for Door {
//!     fn open(&self) -> String { "door opened".into() }
//! }
//! implements!(Door => dyn Openable);
//! impl Injectable for Door {
//!     fn shape() -> TypeShape {
//!         TypeShape::concrete(vec![Constructor::<Self>::new("new").inject().build(|_| Ok(Door))])
//!     }
//! }
//!
//! struct Human {
//!     door: Arc<dyn Openable>,
//! }
//! impl Injectable for Human {
//!     fn shape() -> TypeShape {
//!         TypeShape::concrete(vec![
//!             Constructor::<Self>::new("new")
//!                 .inject()
//!                 .param::<dyn Openable>()
//!                 .build(|args| Ok(Human { door: args.next()? })),
//!         ])
//!     }
//! }
//!
//! let mut binder = Binder::new();
//! binder
//!     .bind_singleton_to::<dyn Openable, Door>().unwrap()
//!     .bind_transient::<Human>().unwrap();
//! let container = binder.build().unwrap();
//!
//! let human = container.get_required::<Human>();
//! assert_eq!(human.door.open(), "door opened");
//! ```
//!
//! ## Lifetimes
//!
//! - **Singleton**: constructed on first resolution, then shared
//! - **Transient**: constructed on every resolution
//!
//! ## Installers
//!
//! Related bindings are grouped into [`Installer`]s and run in order by
//! [`Container::from_installers`]. The process-wide facade in [`global`]
//! wraps the same flow for code that cannot receive a container directly.

pub mod binder;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod global;
pub mod injection;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod provider;
pub mod reflect;
pub mod selector;
pub mod traits;
pub mod validation;

// Internal modules
mod internal;
mod registration;

pub use binder::{Binder, Installer};
pub use config::ContainerOptions;
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult};
pub use injection::{Method, MethodInfo, MethodInjectable};
pub use key::{key_of_type, Key};
pub use lifetime::Lifetime;
pub use observer::{DiObserver, LoggingObserver, MetricsObserver};
pub use provider::Container;
pub use reflect::{AnyArc, Args, Constructor, ConstructorInfo, Implements, Injectable, TypeShape};
pub use traits::{Resolver, ResolverCore};
pub use validation::{ValidationIssue, ValidationReport};
