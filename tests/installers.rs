use graft_di::{
    abstract_type, implements, Binder, Constructor, Container, ContainerOptions, DiError, DiResult,
    Injectable, Installer, Resolver, TypeShape,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}
abstract_type!(dyn Clock);

struct FixedClock;
impl Clock for FixedClock {
    fn now(&self) -> u64 {
        1_700_000_000
    }
}
implements!(FixedClock => dyn Clock);

impl Injectable for FixedClock {
    fn shape() -> TypeShape {
        TypeShape::concrete(vec![Constructor::<Self>::new("new").inject().build(|_| Ok(FixedClock))])
    }
}

struct Scheduler {
    clock: Arc<dyn Clock>,
}

impl Injectable for Scheduler {
    fn shape() -> TypeShape {
        TypeShape::concrete(vec![
            Constructor::<Self>::new("new")
                .inject()
                .param::<dyn Clock>()
                .build(|args| Ok(Scheduler { clock: args.next()? })),
        ])
    }
}

struct TimeInstaller {
    runs: AtomicUsize,
}

impl Installer for TimeInstaller {
    fn install(&self, binder: &mut Binder) -> DiResult<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        binder.bind_singleton_to::<dyn Clock, FixedClock>()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "time"
    }
}

struct SchedulingInstaller;

impl Installer for SchedulingInstaller {
    fn install(&self, binder: &mut Binder) -> DiResult<()> {
        binder.bind_transient::<Scheduler>()?;
        Ok(())
    }
}

#[test]
fn test_installers_compose_one_container() {
    let time = TimeInstaller { runs: AtomicUsize::new(0) };
    let container = Container::from_installers(&[&time, &SchedulingInstaller]).unwrap();

    assert_eq!(time.runs.load(Ordering::SeqCst), 1);
    assert_eq!(container.get_required::<Scheduler>().clock.now(), 1_700_000_000);
}

#[test]
fn test_installer_order_does_not_matter_for_resolution() {
    let time = TimeInstaller { runs: AtomicUsize::new(0) };
    let container = Container::from_installers(&[&SchedulingInstaller, &time]).unwrap();
    assert!(container.get::<Scheduler>().is_ok());
}

#[test]
fn test_failing_installer_aborts() {
    let time = TimeInstaller { runs: AtomicUsize::new(0) };
    let result = Container::from_installers(&[&time, &time]);

    assert!(matches!(result, Err(DiError::DuplicateBinding(_))));
    assert_eq!(time.runs.load(Ordering::SeqCst), 2);
}

#[test]
fn test_installers_with_options_validate() {
    let options = ContainerOptions::default().with_validate_on_build(true);
    let result = Container::from_installers_with_options(&[&SchedulingInstaller], options);
    assert!(matches!(result, Err(DiError::MissingDependency { .. })));
}

#[test]
fn test_binder_install_chains() {
    let time = TimeInstaller { runs: AtomicUsize::new(0) };
    let closure = |binder: &mut Binder| -> DiResult<()> {
        binder.bind_singleton_value(5u8)?;
        Ok(())
    };

    let mut binder = Binder::new();
    binder.install(&time).unwrap().install(&closure).unwrap();

    assert!(binder.contains::<dyn Clock>());
    assert!(binder.contains::<u8>());
    assert_eq!(time.name(), "time");
}
