#![no_main]

use chain_di::{create_injector, DiError, Dispose, Injectable, Injector, ResolverCore, Scope, Token};
use libfuzzer_sys::fuzz_target;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const NAMES: [&str; 4] = ["a", "b", "c", "d"];

struct Closeable(Arc<AtomicUsize>);

impl Dispose for Closeable {
    fn dispose(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fuzz_target!(|data: &[u8]| {
    let disposed = Arc::new(AtomicUsize::new(0));
    let mut nodes: Vec<Injector> = vec![create_injector()];

    for chunk in data.chunks(2) {
        let op = chunk[0];
        let arg = chunk.get(1).copied().unwrap_or(0);
        let name = NAMES[(arg % 4) as usize];
        let node = nodes[(arg as usize / 4) % nodes.len()].clone();

        match op % 6 {
            0 => nodes.push(node.provide_value(name, arg as u32)),
            1 => {
                let d = disposed.clone();
                let class = Injectable::class("Closeable", [], move |_| Ok(Closeable(d.clone()))).disposable();
                let scope = if arg & 0x80 == 0 { Scope::Singleton } else { Scope::Transient };
                nodes.push(node.provide_class_scoped(name, class, scope));
            }
            2 => {
                // Depends on another token, possibly itself.
                let dep = NAMES[(op as usize / 6) % 4];
                let factory = Injectable::function("dependent", [Token::new(dep)], |args| {
                    Ok(args.argument(0).is_some() as u32)
                });
                nodes.push(node.provide_factory(name, factory));
            }
            3 => match node.resolve_any(&Token::new(name)) {
                Ok(_) => assert!(!node.is_disposed()),
                Err(DiError::Disposed { .. }) => assert!(node.is_disposed() || ancestor_disposed(&nodes)),
                Err(_) => {}
            },
            4 => {
                node.dispose();
                assert!(node.is_disposed());
            }
            _ => {
                let before = disposed.load(Ordering::SeqCst);
                node.dispose();
                node.dispose();
                let after_first = disposed.load(Ordering::SeqCst);
                node.dispose();
                assert_eq!(after_first, disposed.load(Ordering::SeqCst));
                assert!(after_first >= before);
            }
        }
    }

    for node in &nodes {
        node.dispose();
    }
});

fn ancestor_disposed(nodes: &[Injector]) -> bool {
    nodes.iter().any(Injector::is_disposed)
}
