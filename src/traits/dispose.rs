//! Teardown capabilities for injected instances.

/// Trait for synchronous teardown.
///
/// Implement this for services that need structured cleanup (closing
/// connections, flushing buffers). The capability is declared on the
/// injectable with [`Injectable::disposable`](crate::Injectable::disposable);
/// instances created through a factory or class binding declared that way are
/// tracked by the binding's injector and torn down exactly once when the chain
/// is disposed.
///
/// # Examples
///
/// ```
/// use chain_di::{create_injector, Dispose, Injectable, Resolver};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct Cache {
///     flushed: AtomicBool,
/// }
///
/// impl Dispose for Cache {
///     fn dispose(&self) {
///         self.flushed.store(true, Ordering::SeqCst);
///     }
/// }
///
/// let cache = Injectable::class("Cache", [], |_| Ok(Cache { flushed: AtomicBool::new(false) }))
///     .disposable();
/// let injector = create_injector().provide_class("cache", cache);
///
/// let resolved = injector.resolve::<Cache>("cache").unwrap();
/// injector.dispose();
/// assert!(resolved.flushed.load(Ordering::SeqCst));
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self);
}

/// Trait for asynchronous teardown.
///
/// Declared with [`Injectable::async_disposable`](crate::Injectable::async_disposable)
/// and awaited by [`Injector::dispose_async`](crate::Injector::dispose_async),
/// one instance at a time, in the same order the synchronous path uses.
///
/// # Examples
///
/// ```
/// use chain_di::{create_injector, AsyncDispose, Injectable};
/// use async_trait::async_trait;
///
/// struct DatabaseClient {
///     connection_id: String,
/// }
///
/// #[async_trait]
/// impl AsyncDispose for DatabaseClient {
///     async fn dispose(&self) {
///         println!("Closing database connection: {}", self.connection_id);
///     }
/// }
///
/// let client = Injectable::class("DatabaseClient", [], |_| {
///     Ok(DatabaseClient { connection_id: "conn_123".to_string() })
/// })
/// .async_disposable();
/// let injector = create_injector().provide_class("db", client);
/// ```
#[async_trait::async_trait]
pub trait AsyncDispose: Send + Sync + 'static {
    /// Perform asynchronous cleanup of resources.
    async fn dispose(&self);
}
