//! Chain teardown.
//!
//! Disposing a node first disposes its parent (and so on up to the root),
//! then tears down the instances the node itself created, in the order they
//! were created. Across a chain `root -> a -> b -> c`, disposing `c` tears down
//! `a`'s instances, then `b`'s, then `c`'s.
//!
//! A disposed node implies disposed ancestors, so the cascade stops at the
//! first node that is already disposed.

use crate::internal::dispose_bag::{self, Disposer};

use super::Injector;

impl Injector {
    /// Disposes this node and every ancestor, tearing down each tracked instance
    /// exactly once.
    ///
    /// Calling it again is a no-op. Afterwards every resolve or inject through
    /// this node fails with [`DiError::Disposed`](crate::DiError::Disposed).
    ///
    /// Instances that only implement [`AsyncDispose`](crate::AsyncDispose) cannot
    /// be awaited here; they are released with a warning. Use
    /// [`dispose_async`](Self::dispose_async) when the chain holds any.
    ///
    /// # Examples
    ///
    /// ```
    /// use chain_di::{create_injector, Dispose, Injectable, Resolver};
    /// use std::sync::{Arc, Mutex};
    ///
    /// struct Conn(Arc<Mutex<Vec<&'static str>>>, &'static str);
    /// impl Dispose for Conn {
    ///     fn dispose(&self) {
    ///         self.0.lock().unwrap().push(self.1);
    ///     }
    /// }
    ///
    /// let log = Arc::new(Mutex::new(Vec::new()));
    /// let (l1, l2) = (log.clone(), log.clone());
    /// let injector = create_injector()
    ///     .provide_class("a", Injectable::class("A", [], move |_| Ok(Conn(l1.clone(), "a"))).disposable())
    ///     .provide_class("b", Injectable::class("B", [], move |_| Ok(Conn(l2.clone(), "b"))).disposable());
    ///
    /// injector.resolve::<Conn>("b").unwrap();
    /// injector.resolve::<Conn>("a").unwrap();
    /// injector.dispose();
    /// injector.dispose();
    ///
    /// assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
    /// assert!(injector.resolve::<Conn>("a").is_err());
    /// ```
    pub fn dispose(&self) {
        for (depth, entries) in self.mark_disposed() {
            tracing::trace!(depth, instances = entries.len(), "tearing down node");
            dispose_bag::run_sync(entries);
        }
    }

    /// Like [`dispose`](Self::dispose), but awaits asynchronous teardowns.
    ///
    /// Each teardown completes before the next one starts.
    pub async fn dispose_async(&self) {
        for (depth, entries) in self.mark_disposed() {
            tracing::trace!(depth, instances = entries.len(), "tearing down node");
            dispose_bag::run_async(entries).await;
        }
    }

    /// Marks every not-yet-disposed node from here to the root as disposed and
    /// takes their tracked instances, root-most node first.
    fn mark_disposed(&self) -> Vec<(usize, Vec<Disposer>)> {
        let mut taken = Vec::new();
        let mut current = Some(self);
        while let Some(injector) = current {
            let mut state = injector.node.lock();
            if state.disposed {
                break;
            }
            state.disposed = true;
            taken.push((injector.node.depth, state.tracker.take()));
            drop(state);
            current = injector.parent();
        }
        if !taken.is_empty() {
            tracing::debug!(
                depth = self.node.depth,
                nodes = taken.len(),
                "disposing injector chain"
            );
        }
        taken.reverse();
        taken
    }
}
