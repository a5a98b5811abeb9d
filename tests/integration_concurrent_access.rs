/// Concurrent access integration tests
///
/// These tests verify that a shared chain behaves correctly when resolved
/// from many threads at once: singletons stay single, transients stay
/// distinct and disposal still sees every tracked instance exactly once.

use chain_di::{create_injector, Dispose, Injectable, Injector, Resolver, Scope, Token};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[derive(Debug)]
pub struct CounterService {
    disposals: Arc<AtomicU32>,
    thread_id: String,
}

impl CounterService {
    pub fn new(disposals: Arc<AtomicU32>) -> Self {
        Self {
            disposals,
            thread_id: format!("created-by-{:?}", thread::current().id()),
        }
    }
}

impl Dispose for CounterService {
    fn dispose(&self) {
        self.disposals.fetch_add(1, Ordering::SeqCst);
    }
}

fn counted(constructions: &Arc<AtomicU32>, disposals: &Arc<AtomicU32>) -> Injectable<CounterService> {
    let (c, d) = (constructions.clone(), disposals.clone());
    Injectable::class("CounterService", [], move |_| {
        c.fetch_add(1, Ordering::SeqCst);
        Ok(CounterService::new(d.clone()))
    })
    .disposable()
}

#[test]
fn test_concurrent_singleton_resolution() {
    let constructions = Arc::new(AtomicU32::new(0));
    let disposals = Arc::new(AtomicU32::new(0));
    let injector = create_injector().provide_class("counter", counted(&constructions, &disposals));

    const THREADS: usize = 16;
    let barrier = Barrier::new(THREADS);
    let mut seen = Vec::new();

    crossbeam_utils::thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let injector = &injector;
                let barrier = &barrier;
                s.spawn(move |_| {
                    barrier.wait();
                    injector.resolve::<CounterService>("counter").unwrap()
                })
            })
            .collect();
        for handle in handles {
            seen.push(handle.join().unwrap());
        }
    })
    .unwrap();

    // Every thread sees the winner; losing instances are torn down right away.
    assert!(seen.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert!(seen[0].thread_id.starts_with("created-by-"));
    let built = constructions.load(Ordering::SeqCst);
    assert!(built >= 1);
    assert_eq!(disposals.load(Ordering::SeqCst), built - 1);

    injector.dispose();
    assert_eq!(disposals.load(Ordering::SeqCst), built);
}

#[test]
fn test_concurrent_transient_tracking() {
    let constructions = Arc::new(AtomicU32::new(0));
    let disposals = Arc::new(AtomicU32::new(0));
    let injector =
        create_injector().provide_class_scoped("counter", counted(&constructions, &disposals), Scope::Transient);

    const THREADS: u32 = 8;
    const PER_THREAD: u32 = 25;

    crossbeam_utils::thread::scope(|s| {
        for _ in 0..THREADS {
            let injector = &injector;
            s.spawn(move |_| {
                for _ in 0..PER_THREAD {
                    injector.resolve::<CounterService>("counter").unwrap();
                }
            });
        }
    })
    .unwrap();

    assert_eq!(constructions.load(Ordering::SeqCst), THREADS * PER_THREAD);

    injector.dispose();
    assert_eq!(disposals.load(Ordering::SeqCst), THREADS * PER_THREAD);
}

#[test]
fn test_threads_extend_shared_chain_independently() {
    let base = create_injector().provide_value("base", 10u32);

    let results: Vec<u32> = thread::scope(|s| {
        let handles: Vec<_> = (0..8u32)
            .map(|i| {
                let base = base.clone();
                s.spawn(move || {
                    let sum = Injectable::function("sum", [Token::new("base"), Token::new("own")], |args| {
                        Ok(*args.next::<u32>()? + *args.next::<u32>()?)
                    });
                    base.provide_value("own", i).inject_function(&sum).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results, (10..18).collect::<Vec<_>>());
    assert!(base.resolve::<u32>("own").is_err());
}

#[test]
fn test_injector_handle_moves_across_threads() {
    let injector: Injector = create_injector().provide_value("greeting", "hello".to_string());

    let handle = thread::spawn(move || injector.resolve::<String>("greeting").unwrap().to_string());
    assert_eq!(handle.join().unwrap(), "hello");
}

#[test]
fn test_losing_singleton_instance_is_torn_down() {
    let disposals = Arc::new(AtomicU32::new(0));
    let both_constructing = Arc::new(Barrier::new(2));

    let (d, b) = (disposals.clone(), both_constructing.clone());
    let racy = Injectable::class("CounterService", [], move |_| {
        // Both threads are inside the constructor before either stores its instance.
        b.wait();
        Ok(CounterService::new(d.clone()))
    })
    .disposable();
    let injector = create_injector().provide_class("counter", racy);

    let resolved: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..2)
            .map(|_| s.spawn(|| injector.resolve::<CounterService>("counter").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(Arc::ptr_eq(&resolved[0], &resolved[1]));
    assert_eq!(disposals.load(Ordering::SeqCst), 1);

    injector.dispose();
    assert_eq!(disposals.load(Ordering::SeqCst), 2);
}
