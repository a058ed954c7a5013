use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use graft_di::*;
use std::sync::Arc;

// ===== Fixtures =====

trait ReadOnly: Send + Sync {
    fn read(&self) -> u64;
}
abstract_type!(dyn ReadOnly);

trait Repository: ReadOnly {
    fn id(&self) -> u64;
}
abstract_type!(dyn Repository);

struct MemoryRepository;

impl Repository for MemoryRepository {
    fn id(&self) -> u64 {
        7
    }
}

impl ReadOnly for MemoryRepository {
    fn read(&self) -> u64 {
        7
    }
}

implements!(MemoryRepository => dyn Repository, dyn ReadOnly);
implements!(dyn Repository => dyn ReadOnly);

impl Injectable for MemoryRepository {
    fn shape() -> TypeShape {
        TypeShape::concrete(vec![Constructor::<Self>::new("new")
            .inject()
            .build(|_| Ok(MemoryRepository))])
    }
}

struct Service {
    data: [u8; 64],
}

impl Injectable for Service {
    fn shape() -> TypeShape {
        TypeShape::concrete(vec![Constructor::<Self>::new("new")
            .inject()
            .build(|_| Ok(Service { data: [0; 64] }))])
    }
}

struct Expensive {
    data: Vec<u64>,
}

impl Injectable for Expensive {
    fn shape() -> TypeShape {
        TypeShape::concrete(vec![Constructor::<Self>::new("new").inject().build(|_| {
            Ok(Expensive {
                data: (0..1000).collect(),
            })
        })])
    }
}

macro_rules! chain {
    ($first:ident $(, $prev:ident => $next:ident)*) => {
        struct $first;
        impl Injectable for $first {
            fn shape() -> TypeShape {
                TypeShape::concrete(vec![Constructor::<Self>::new("new").inject().build(|_| Ok($first))])
            }
        }
        $(
            #[allow(dead_code)]
            struct $next(Arc<$prev>);
            impl Injectable for $next {
                fn shape() -> TypeShape {
                    TypeShape::concrete(vec![Constructor::<Self>::new("new")
                        .inject()
                        .param::<$prev>()
                        .build(|args| Ok($next(args.next()?)))])
                }
            }
        )*
    };
}

chain!(Level1, Level1 => Level2, Level2 => Level3, Level3 => Level4,
       Level4 => Level5, Level5 => Level6, Level6 => Level7, Level7 => Level8);

fn chain_container(binder: &mut Binder) -> DiResult<()> {
    binder
        .bind_transient::<Level1>()?
        .bind_transient::<Level2>()?
        .bind_transient::<Level3>()?
        .bind_transient::<Level4>()?
        .bind_transient::<Level5>()?
        .bind_transient::<Level6>()?
        .bind_transient::<Level7>()?
        .bind_transient::<Level8>()?;
    Ok(())
}

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let mut binder = Binder::new();
    binder.bind_singleton_value(42u64).unwrap();
    let container = binder.build().unwrap();

    c.bench_function("singleton_hit_u64", |b| {
        b.iter(|| {
            let v = container.get::<u64>().unwrap();
            black_box(v);
        })
    });
}

fn bench_singleton_cold(c: &mut Criterion) {
    c.bench_function("singleton_cold_expensive", |b| {
        b.iter_batched(
            || {
                let mut binder = Binder::new();
                binder.bind_singleton::<Expensive>().unwrap();
                binder.build().unwrap()
            },
            |container| {
                let v = container.get::<Expensive>().unwrap();
                black_box(v.data.len());
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_singleton_vs_transient(c: &mut Criterion) {
    let mut group = c.benchmark_group("singleton_vs_transient");

    let mut binder = Binder::new();
    binder.bind_singleton::<Service>().unwrap();
    let singleton = binder.build().unwrap();

    group.bench_function("singleton_hit", |b| {
        b.iter(|| {
            let v = singleton.get::<Service>().unwrap();
            black_box(&v.data);
        })
    });

    let mut binder = Binder::new();
    binder.bind_transient::<Service>().unwrap();
    let transient = binder.build().unwrap();

    group.bench_function("transient", |b| {
        b.iter(|| {
            let v = transient.get::<Service>().unwrap();
            black_box(&v.data);
        })
    });

    group.finish();
}

fn bench_interface_bindings(c: &mut Criterion) {
    let mut group = c.benchmark_group("interface_bindings");

    let mut binder = Binder::new();
    binder
        .bind_transient_to::<dyn Repository, MemoryRepository>()
        .unwrap()
        .bind_transient_to::<dyn ReadOnly, dyn Repository>()
        .unwrap()
        .bind_transient::<MemoryRepository>()
        .unwrap();
    let container = binder.build().unwrap();

    group.bench_function("concrete", |b| {
        b.iter(|| black_box(container.get::<MemoryRepository>().unwrap().id()))
    });

    group.bench_function("interface", |b| {
        b.iter(|| black_box(container.get::<dyn Repository>().unwrap().id()))
    });

    group.bench_function("interface_alias", |b| {
        b.iter(|| black_box(container.get::<dyn ReadOnly>().unwrap().read()))
    });

    group.finish();
}

fn bench_chain_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("circular_detection");

    let container = Container::from_installers(&[&chain_container]).unwrap();

    group.bench_function("transient_chain_depth_8", |b| {
        b.iter(|| {
            let service = container.get::<Level8>().unwrap();
            black_box(&service);
        })
    });

    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");

    let mut binder = Binder::new();
    binder.bind_singleton_value(42u64).unwrap();
    let container = binder.build().unwrap();

    for &thread_count in &[1u64, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("singleton_threads", thread_count),
            &thread_count,
            |b, &threads| {
                b.iter_custom(|iters| {
                    let start = std::time::Instant::now();
                    std::thread::scope(|s| {
                        for _ in 0..threads {
                            let container = &container;
                            s.spawn(move || {
                                for _ in 0..iters / threads {
                                    black_box(container.get::<u64>().unwrap());
                                }
                            });
                        }
                    });
                    start.elapsed()
                })
            },
        );
    }

    group.finish();
}

// ===== Macro Benchmarks =====

fn bench_build_and_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    group.bench_function("bind_and_build_chain", |b| {
        b.iter(|| black_box(Container::from_installers(&[&chain_container]).unwrap()))
    });

    let container = Container::from_installers(&[&chain_container]).unwrap();
    group.bench_function("validate_chain", |b| {
        b.iter(|| black_box(container.validate().is_valid()))
    });

    group.finish();
}

fn bench_observer_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("observers");

    for observed in [false, true] {
        let mut binder = Binder::new();
        binder.bind_transient::<Service>().unwrap();
        if observed {
            binder.add_observer(Arc::new(MetricsObserver::new()));
        }
        let container = binder.build().unwrap();

        group.bench_with_input(
            BenchmarkId::new("transient_with_metrics", observed),
            &observed,
            |b, _| b.iter(|| black_box(container.get::<Service>().unwrap())),
        );
    }

    group.finish();
}

criterion_group!(
    micro_benches,
    bench_singleton_hit,
    bench_singleton_cold,
    bench_singleton_vs_transient,
    bench_interface_bindings,
    bench_chain_depth,
    bench_contention
);

criterion_group!(macro_benches, bench_build_and_validate, bench_observer_overhead);

criterion_main!(micro_benches, macro_benches);
