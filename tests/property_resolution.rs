/// Property-based tests for chain resolution
///
/// These tests verify that lookup, shadowing and caching follow the chain
/// regardless of how long it is or where bindings sit.

use chain_di::{create_injector, Injectable, Injector, Resolver, Scope};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn token_name() -> impl Strategy<Value = String> {
    "[a-e]"
}

fn build_chain(bindings: &[(String, u32)]) -> Vec<Injector> {
    let mut nodes = vec![create_injector()];
    for (name, value) in bindings {
        let next = nodes[nodes.len() - 1].provide_value(name.clone(), *value);
        nodes.push(next);
    }
    nodes
}

// Property: a node sees the nearest binding at or above it, and nothing below it
proptest! {
    #[test]
    fn nearest_binding_wins(bindings in prop::collection::vec((token_name(), any::<u32>()), 0..24)) {
        let nodes = build_chain(&bindings);

        for (depth, node) in nodes.iter().enumerate() {
            prop_assert_eq!(node.depth(), depth);

            for name in ["a", "b", "c", "d", "e"] {
                let expected = bindings[..depth]
                    .iter()
                    .rev()
                    .find(|(n, _)| n == name)
                    .map(|(_, v)| *v);

                match (node.resolve::<u32>(name), expected) {
                    (Ok(v), Some(e)) => prop_assert_eq!(*v, e),
                    (Err(err), None) => prop_assert_eq!(err.to_string(), format!("No provider found for \"{}\"!", name)),
                    (got, want) => prop_assert!(false, "depth {} token {}: got {:?}, want {:?}", depth, name, got.map(|v| *v), want),
                }
            }
        }
    }
}

// Property: a singleton binding constructs once no matter how often or from where it is resolved
proptest! {
    #[test]
    fn singleton_constructs_once(extra in 0usize..16, resolutions in 1usize..32) {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        let base = create_injector().provide_factory(
            "svc",
            Injectable::function("svc", [], move |_| Ok(c.fetch_add(1, Ordering::SeqCst))),
        );

        let mut leaf = base.clone();
        for i in 0..extra {
            leaf = leaf.provide_value(format!("pad{}", i), i);
        }

        let first = leaf.resolve::<usize>("svc").unwrap();
        for i in 0..resolutions {
            let from = if i % 2 == 0 { &leaf } else { &base };
            prop_assert!(Arc::ptr_eq(&first, &from.resolve::<usize>("svc").unwrap()));
        }
        prop_assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}

// Property: a transient binding constructs on every resolution
proptest! {
    #[test]
    fn transient_constructs_every_time(resolutions in 1usize..32) {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        let injector = create_injector().provide_factory_scoped(
            "svc",
            Injectable::function("svc", [], move |_| Ok(c.fetch_add(1, Ordering::SeqCst))),
            Scope::Transient,
        );

        for expected in 0..resolutions {
            prop_assert_eq!(*injector.resolve::<usize>("svc").unwrap(), expected);
        }
        prop_assert_eq!(counter.load(Ordering::SeqCst), resolutions);
    }
}
