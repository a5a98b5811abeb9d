//! Provider scopes.

/// Scopes controlling instance caching behavior
///
/// A scope is attached to a factory or class binding when it is appended to the
/// chain. Value bindings have no scope: the stored value is always returned.
///
/// Caching is per binding, not per token. Two chains that branch off a shared
/// ancestor and bind the same token keep independent instances.
///
/// # Examples
///
/// ```rust
/// use chain_di::{create_injector, Injectable, Resolver, Scope};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let counter = Arc::new(AtomicUsize::new(0));
/// let c = counter.clone();
/// let next = Injectable::function("next", [], move |_| Ok(c.fetch_add(1, Ordering::SeqCst)));
///
/// let injector = create_injector().provide_factory_scoped("n", next, Scope::Transient);
/// assert_eq!(*injector.resolve::<usize>("n").unwrap(), 0);
/// assert_eq!(*injector.resolve::<usize>("n").unwrap(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Constructed on first resolution through the binding, then cached on
    /// that binding and returned for every later resolution.
    #[default]
    Singleton,
    /// Constructed afresh on every resolution, never cached.
    Transient,
}

impl Scope {
    /// Whether instances are kept after construction.
    pub fn is_cached(self) -> bool {
        matches!(self, Scope::Singleton)
    }
}
