//! Per-node record of instances awaiting teardown.

use std::sync::Arc;

use crate::traits::{AsyncDispose, Dispose};

/// Teardown handle for one tracked instance.
pub(crate) enum Disposer {
    Sync(Arc<dyn Dispose>),
    Async(Arc<dyn AsyncDispose>),
}

impl Disposer {
    pub(crate) fn sync<T: Dispose>(instance: Arc<T>) -> Self {
        Disposer::Sync(instance)
    }

    pub(crate) fn asynchronous<T: AsyncDispose>(instance: Arc<T>) -> Self {
        Disposer::Async(instance)
    }
}

/// Instances created by one node, in construction order.
///
/// Entries are drained on teardown so each one runs at most once. Teardown is
/// FIFO: the first instance a node created is the first one torn down.
#[derive(Default)]
pub(crate) struct DisposeBag {
    entries: Vec<Disposer>,
}

impl DisposeBag {
    pub(crate) fn push(&mut self, disposer: Disposer) {
        self.entries.push(disposer);
    }

    /// Takes every entry out, leaving the bag empty.
    pub(crate) fn take(&mut self) -> Vec<Disposer> {
        std::mem::take(&mut self.entries)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Runs synchronous teardowns in order. Async-only instances cannot be awaited
/// here; they are reported and released.
pub(crate) fn run_sync(entries: Vec<Disposer>) {
    for entry in entries {
        match entry {
            Disposer::Sync(instance) => {
                tracing::trace!("running sync teardown");
                instance.dispose();
            }
            Disposer::Async(_) => {
                tracing::warn!("instance with async-only teardown released by sync dispose(); use dispose_async()");
            }
        }
    }
}

/// Runs every teardown in order, awaiting each async one before the next.
pub(crate) async fn run_async(entries: Vec<Disposer>) {
    for entry in entries {
        match entry {
            Disposer::Sync(instance) => instance.dispose(),
            Disposer::Async(instance) => {
                tracing::trace!("awaiting async teardown");
                instance.dispose().await;
            }
        }
    }
}
