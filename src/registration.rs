//! Bindings held by injector nodes.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::injectable::Injectable;
use crate::internal::Disposer;
use crate::scope::Scope;
use crate::token::Token;

#[cfg(feature = "once-cell")]
use once_cell::sync::OnceCell;
#[cfg(not(feature = "once-cell"))]
use std::sync::{Mutex, PoisonError};

/// Type-erased value stored in or produced by the chain.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// What a factory or class binding hands back after construction.
pub(crate) struct Produced {
    pub(crate) value: AnyArc,
    pub(crate) teardown: Option<Disposer>,
}

/// How a binding obtains its value.
pub(crate) enum Provider {
    /// Pre-built instance; never constructed, cached or disposed.
    Value(AnyArc),
    Factory(Injectable<Produced>),
    Class(Injectable<Produced>),
}

impl Provider {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Provider::Value(_) => "value",
            Provider::Factory(_) => "factory",
            Provider::Class(_) => "class",
        }
    }
}

/// The single token-to-provider binding owned by a node.
pub(crate) struct Binding {
    pub(crate) token: Token,
    pub(crate) provider: Provider,
    pub(crate) scope: Scope,
    pub(crate) cache: SingletonCell,
}

impl Binding {
    pub(crate) fn new(token: Token, provider: Provider, scope: Scope) -> Self {
        Self {
            token,
            provider,
            scope,
            cache: SingletonCell::default(),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("token", &self.token)
            .field("provider", &self.provider.kind())
            .field("scope", &self.scope)
            .field("cached", &self.cache.get().is_some())
            .finish()
    }
}

/// Write-once slot for a singleton instance.
#[derive(Default)]
pub(crate) struct SingletonCell {
    #[cfg(feature = "once-cell")]
    cell: OnceCell<AnyArc>,
    #[cfg(not(feature = "once-cell"))]
    cell: Mutex<Option<AnyArc>>,
}

impl SingletonCell {
    #[inline]
    pub(crate) fn get(&self) -> Option<AnyArc> {
        #[cfg(feature = "once-cell")]
        {
            self.cell.get().cloned()
        }
        #[cfg(not(feature = "once-cell"))]
        {
            self.cell.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }
    }

    /// Stores `value` unless another instance got there first. Returns the
    /// stored instance and whether it is `value`.
    pub(crate) fn get_or_insert(&self, value: AnyArc) -> (AnyArc, bool) {
        #[cfg(feature = "once-cell")]
        {
            let mut inserted = false;
            let stored = self
                .cell
                .get_or_init(|| {
                    inserted = true;
                    value
                })
                .clone();
            (stored, inserted)
        }
        #[cfg(not(feature = "once-cell"))]
        {
            let mut slot = self.cell.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(existing) => (existing.clone(), false),
                None => {
                    *slot = Some(value.clone());
                    (value, true)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_cell_keeps_first_value() {
        let cell = SingletonCell::default();
        assert!(cell.get().is_none());

        let first: AnyArc = Arc::new(1u8);
        let second: AnyArc = Arc::new(2u8);

        let (stored, inserted) = cell.get_or_insert(first.clone());
        assert!(inserted);
        assert!(Arc::ptr_eq(&stored, &first));

        let (stored, inserted) = cell.get_or_insert(second);
        assert!(!inserted);
        assert!(Arc::ptr_eq(&stored, &first));
        assert!(Arc::ptr_eq(&cell.get().unwrap(), &first));
    }
}
