//! Installers: reusable units of registration.
//!
//! An installer only registers bindings. It has no access to resolution,
//! since the container does not exist until every installer has run.

use crate::binder::Binder;
use crate::config::ContainerOptions;
use crate::error::DiResult;
use crate::Container;

/// A unit of registration run once during the installation phase.
///
/// # Example
///
/// ```rust
/// use graft_di::{Binder, Container, DiResult, Installer, Resolver};
///
/// struct ConfigInstaller;
///
/// impl Installer for ConfigInstaller {
///     fn install(&self, binder: &mut Binder) -> DiResult<()> {
///         binder.bind_singleton_value(String::from("postgres://localhost"))?;
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let limits = |binder: &mut Binder| -> DiResult<()> {
///     binder.bind_singleton_value(100u32)?;
///     Ok(())
/// };
///
/// let container = Container::from_installers(&[&ConfigInstaller, &limits])?;
/// assert_eq!(*container.get::<u32>()?, 100);
/// # Ok(())
/// # }
/// ```
pub trait Installer {
    /// Registers this installer's bindings.
    fn install(&self, binder: &mut Binder) -> DiResult<()>;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<F> Installer for F
where
    F: Fn(&mut Binder) -> DiResult<()>,
{
    fn install(&self, binder: &mut Binder) -> DiResult<()> {
        self(binder)
    }
}

impl Container {
    /// Runs every installer once, in order, then builds the container.
    ///
    /// The first installer error aborts the build; no container is produced
    /// from a partially installed binder.
    pub fn from_installers(installers: &[&dyn Installer]) -> DiResult<Container> {
        Self::from_installers_with_options(installers, ContainerOptions::default())
    }

    pub fn from_installers_with_options(
        installers: &[&dyn Installer],
        options: ContainerOptions,
    ) -> DiResult<Container> {
        let mut binder = Binder::with_options(options);
        for installer in installers {
            binder.install(*installer)?;
        }
        binder.build()
    }
}
