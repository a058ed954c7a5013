use graft_di::{abstract_type, implements, Binder, Constructor, Injectable, Resolver, TypeShape};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

const THREADS: usize = 16;

static SLOW_BUILT: AtomicUsize = AtomicUsize::new(0);

struct Slow {
    id: usize,
}

impl Injectable for Slow {
    fn shape() -> TypeShape {
        TypeShape::concrete(vec![Constructor::<Self>::new("new").inject().build(|_| {
            thread::sleep(Duration::from_millis(5));
            Ok(Slow {
                id: SLOW_BUILT.fetch_add(1, Ordering::SeqCst),
            })
        })])
    }
}

#[test]
fn test_concurrent_first_use_publishes_one_singleton() {
    let mut binder = Binder::new();
    binder.bind_singleton::<Slow>().unwrap();
    let container = binder.build().unwrap();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                container.get_required::<Slow>()
            })
        })
        .collect();

    let results: Vec<Arc<Slow>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for slow in &results[1..] {
        assert!(Arc::ptr_eq(&results[0], slow));
    }
    let later = container.get_required::<Slow>();
    assert!(Arc::ptr_eq(&results[0], &later));
    assert_eq!(later.id, results[0].id);
}

trait Store: Send + Sync {
    fn id(&self) -> usize;
}
abstract_type!(dyn Store);

struct MemoryStore(usize);
impl Store for MemoryStore {
    fn id(&self) -> usize {
        self.0
    }
}
implements!(MemoryStore => dyn Store);

static STORES: AtomicUsize = AtomicUsize::new(0);

impl Injectable for MemoryStore {
    fn shape() -> TypeShape {
        TypeShape::concrete(vec![Constructor::<Self>::new("new")
            .inject()
            .build(|_| Ok(MemoryStore(STORES.fetch_add(1, Ordering::SeqCst))))])
    }
}

#[test]
fn test_concurrent_interface_resolution() {
    let mut binder = Binder::new();
    binder.bind_singleton_to::<dyn Store, MemoryStore>().unwrap();
    let container = binder.build().unwrap();
    let barrier = Arc::new(Barrier::new(THREADS));

    let ids: Vec<usize> = (0..THREADS)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                container.get_required::<dyn Store>().id()
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    assert!(ids.iter().all(|id| *id == ids[0]));
}

#[test]
fn test_transients_under_contention_are_distinct() {
    let mut binder = Binder::new();
    binder.bind_transient::<Slow>().unwrap();
    let container = binder.build().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let container = container.clone();
            thread::spawn(move || container.get_required::<Slow>())
        })
        .collect();
    let results: Vec<Arc<Slow>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for (i, a) in results.iter().enumerate() {
        for b in &results[i + 1..] {
            assert!(!Arc::ptr_eq(a, b));
        }
    }
}

#[test]
fn test_container_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<graft_di::Container>();
}
