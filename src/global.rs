//! Process-wide container facade.
//!
//! Call sites that cannot receive a container through their constructor
//! (entry points, objects created by a host framework) reach the single
//! global container through these free functions. The facade is initialized
//! once; later attempts fail with [`DiError::AlreadyInitialized`].
//!
//! ```rust
//! use graft_di::{global, Binder, DiResult};
//!
//! # fn main() -> DiResult<()> {
//! let app = |binder: &mut Binder| -> DiResult<()> {
//!     binder.bind_singleton_value(String::from("shared"))?;
//!     Ok(())
//! };
//! global::initialize(&[&app])?;
//!
//! assert_eq!(global::get::<String>()?.as_str(), "shared");
//! assert!(global::initialize(&[&app]).is_err());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::binder::Installer;
use crate::error::{DiError, DiResult};
use crate::injection::MethodInjectable;
use crate::key::Key;
use crate::reflect::AnyArc;
use crate::traits::{Resolver, ResolverCore};
use crate::Container;

static CONTAINER: OnceCell<Container> = OnceCell::new();

/// Publishes `container` as the global container.
pub fn install(container: Container) -> DiResult<&'static Container> {
    let mut published = false;
    let global = CONTAINER.get_or_init(|| {
        published = true;
        container
    });
    if !published {
        return Err(DiError::AlreadyInitialized);
    }
    tracing::info!(services = global.len(), "global container installed");
    Ok(global)
}

/// Runs `installers`, builds the container and publishes it.
///
/// Installers are not run at all when a global container already exists.
pub fn initialize(installers: &[&dyn Installer]) -> DiResult<&'static Container> {
    if is_installed() {
        return Err(DiError::AlreadyInitialized);
    }
    install(Container::from_installers(installers)?)
}

/// The global container.
pub fn container() -> DiResult<&'static Container> {
    CONTAINER.get().ok_or(DiError::NotInitialized)
}

pub fn is_installed() -> bool {
    CONTAINER.get().is_some()
}

/// Resolves `T` from the global container.
pub fn get<T: ?Sized + Send + Sync + 'static>() -> DiResult<Arc<T>> {
    container()?.get::<T>()
}

/// Resolves `key` from the global container, type-erased.
pub fn get_any(key: &Key) -> DiResult<AnyArc> {
    container()?.resolve_any(key)
}

/// Method injection through the global container.
pub fn inject_into<T: MethodInjectable>(target: &mut T) -> DiResult<usize> {
    container()?.inject_into(target)
}
