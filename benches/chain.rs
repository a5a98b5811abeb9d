use chain_di::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let injector = create_injector().provide_factory("answer", Injectable::function("answer", [], |_| Ok(42u64)));

    // Prime the singleton
    let _ = injector.resolve::<u64>("answer").unwrap();

    c.bench_function("singleton_hit_u64", |b| {
        b.iter(|| {
            let v = injector.resolve::<u64>("answer").unwrap();
            black_box(v);
        })
    });
}

fn bench_singleton_cold(c: &mut Criterion) {
    struct ExpensiveToCreate {
        data: Vec<u64>,
    }

    c.bench_function("singleton_cold_expensive", |b| {
        b.iter_batched(
            || {
                create_injector().provide_class(
                    "expensive",
                    Injectable::class("ExpensiveToCreate", [], |_| {
                        Ok(ExpensiveToCreate {
                            data: (0..1000).collect(),
                        })
                    }),
                )
            },
            |injector| {
                let v = injector.resolve::<ExpensiveToCreate>("expensive").unwrap();
                black_box(v.data.len());
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_singleton_vs_transient(c: &mut Criterion) {
    struct Service {
        data: [u8; 64],
    }

    let mut group = c.benchmark_group("singleton_vs_transient");
    let service = Injectable::class("Service", [], |_| Ok(Service { data: [0; 64] }));

    let singleton = create_injector().provide_class("svc", service.clone());
    group.bench_function("singleton", |b| {
        b.iter(|| {
            let v = singleton.resolve::<Service>("svc").unwrap();
            black_box(v.data[0]);
        })
    });

    // Untracked, so the node does not grow across iterations.
    let transient = create_injector().provide_class_scoped("svc", service, Scope::Transient);
    group.bench_function("transient", |b| {
        b.iter(|| {
            let v = transient.resolve::<Service>("svc").unwrap();
            black_box(v.data[0]);
        })
    });

    group.finish();
}

fn bench_injection_with_dependencies(c: &mut Criterion) {
    let sum = Injectable::function(
        "sum",
        [Token::new("a"), Token::new("b"), Token::new("c"), INJECTOR_TOKEN],
        |args| Ok(*args.next::<u64>()? + *args.next::<u64>()? + *args.next::<u64>()?),
    );
    let injector = create_injector()
        .provide_value("a", 1u64)
        .provide_value("b", 2u64)
        .provide_value("c", 3u64);

    c.bench_function("inject_function_three_args", |b| {
        b.iter(|| black_box(injector.inject_function(&sum).unwrap()))
    });
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");

    let injector = create_injector().provide_factory("answer", Injectable::function("answer", [], |_| Ok(42u64)));

    // Prime the singleton
    let _ = injector.resolve::<u64>("answer").unwrap();

    for &thread_count in &[1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("singleton_threads", thread_count),
            &thread_count,
            |b, &threads| {
                b.iter_custom(|iters| {
                    let start = std::time::Instant::now();
                    crossbeam_utils::thread::scope(|s| {
                        for _ in 0..threads {
                            let injector_ref = &injector;
                            s.spawn(move |_| {
                                for _ in 0..iters / threads as u64 {
                                    let v = injector_ref.resolve::<u64>("answer").unwrap();
                                    black_box(v);
                                }
                            });
                        }
                    })
                    .unwrap();
                    start.elapsed()
                })
            },
        );
    }

    group.finish();
}

// ===== Macro Benchmarks =====

fn bench_chain_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_depth");

    for &depth in &[10usize, 100, 1000] {
        // The resolved token sits at the root end, so lookup walks the whole chain.
        let mut injector = create_injector().provide_value("target", 42u64);
        for i in 0..depth {
            injector = injector.provide_value(format!("pad{}", i), i);
        }

        group.bench_with_input(BenchmarkId::new("walk_to_root", depth), &injector, |b, injector| {
            b.iter(|| {
                let v = injector.resolve::<u64>("target").unwrap();
                black_box(v);
            })
        });
    }

    group.finish();
}

fn bench_dispose(c: &mut Criterion) {
    struct Closeable;
    impl Dispose for Closeable {
        fn dispose(&self) {
            black_box(self);
        }
    }

    c.bench_function("dispose_100_tracked", |b| {
        b.iter_batched(
            || {
                let injector = create_injector().provide_class_scoped(
                    "c",
                    Injectable::class("Closeable", [], |_| Ok(Closeable)).disposable(),
                    Scope::Transient,
                );
                for _ in 0..100 {
                    let _ = injector.resolve::<Closeable>("c").unwrap();
                }
                injector
            },
            |injector| injector.dispose(),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    micro_benches,
    bench_singleton_hit,
    bench_singleton_cold,
    bench_singleton_vs_transient,
    bench_injection_with_dependencies,
    bench_contention
);

criterion_group!(macro_benches, bench_chain_depth, bench_dispose);

criterion_main!(micro_benches, macro_benches);
