//! The injector chain.
//!
//! An [`Injector`] is one node of an append-only chain. Every `provide_*` call
//! returns a new node that binds exactly one token and delegates everything
//! else to the node it was called on. Nodes are never mutated after creation
//! apart from their singleton caches, disposal records and disposed flag.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{DiError, DiResult, Operation};
use crate::injectable::{Injectable, TargetRef};
use crate::internal::dispose_bag;
use crate::internal::{with_cycle_guard, DisposeBag, Disposer};
use crate::registration::{AnyArc, Binding, Provider};
use crate::scope::Scope;
use crate::token::Token;
use crate::traits::ResolverCore;

mod disposal;
mod invoker;

/// A node in the injector chain, and the handle used to work with it.
///
/// Cloning an `Injector` is cheap and yields another handle to the same node.
/// A node keeps its parent alive, so holding the leaf of a chain keeps the
/// whole chain alive.
///
/// # Thread Safety
///
/// Node state sits behind a mutex that is never held while user code runs, so
/// an `Injector` can be shared across threads. Resolution itself is
/// synchronous; callers that need strict ordering between threads must
/// coordinate externally.
///
/// # Examples
///
/// ```
/// use chain_di::{create_injector, Injectable, Resolver, Scope, Token};
/// use std::sync::Arc;
///
/// struct Logger { prefix: String }
/// struct Service { logger: Arc<Logger> }
///
/// let service = Injectable::class("Service", [Token::new("logger")], |args| {
///     Ok(Service { logger: args.next::<Logger>()? })
/// });
///
/// let injector = create_injector()
///     .provide_value("prefix", "app".to_string())
///     .provide_factory(
///         "logger",
///         Injectable::function("createLogger", [Token::new("prefix")], |args| {
///             Ok(Logger { prefix: args.next::<String>()?.to_string() })
///         }),
///     )
///     .provide_class("service", service);
///
/// let resolved = injector.resolve::<Service>("service").unwrap();
/// assert_eq!(resolved.logger.prefix, "app");
/// ```
#[derive(Clone)]
pub struct Injector {
    node: Arc<Node>,
}

pub(crate) struct Node {
    binding: Option<Binding>,
    parent: Option<Injector>,
    depth: usize,
    state: Mutex<NodeState>,
}

#[derive(Default)]
pub(crate) struct NodeState {
    disposed: bool,
    tracker: DisposeBag,
}

impl Node {
    fn lock(&self) -> MutexGuard<'_, NodeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if !state.disposed && !state.tracker.is_empty() {
            tracing::warn!(
                token = %self.binding.as_ref().map(|b| b.token.name()).unwrap_or("<root>"),
                undisposed = state.tracker.len(),
                "injector dropped with undisposed instances; call dispose() before dropping"
            );
        }

        // Unlink ancestors one at a time so long chains do not recurse per node.
        let mut parent = self.parent.take();
        while let Some(injector) = parent {
            parent = match Arc::into_inner(injector.node) {
                Some(mut node) => node.parent.take(),
                None => None,
            };
        }
    }
}

/// Creates a fresh root injector.
///
/// Equivalent to [`Injector::root`].
pub fn create_injector() -> Injector {
    Injector::root()
}

impl Injector {
    /// Creates a root node: binds nothing, delegates nowhere.
    ///
    /// There is no hidden global root; create one at startup and build your
    /// chain from it, or create a separate one per test.
    pub fn root() -> Self {
        Self::from_node(Node {
            binding: None,
            parent: None,
            depth: 0,
            state: Mutex::new(NodeState::default()),
        })
    }

    fn from_node(node: Node) -> Self {
        Self { node: Arc::new(node) }
    }

    fn append(&self, binding: Binding) -> Injector {
        if binding.token.is_reserved() {
            tracing::warn!(token = %binding.token, "binding a reserved token; injection will never consult it");
        }
        tracing::debug!(
            token = %binding.token,
            provider = binding.provider.kind(),
            scope = ?binding.scope,
            depth = self.node.depth + 1,
            "appending binding"
        );
        Self::from_node(Node {
            binding: Some(binding),
            parent: Some(self.clone()),
            depth: self.node.depth + 1,
            state: Mutex::new(NodeState::default()),
        })
    }

    /// Appends a node that always yields `value`.
    ///
    /// Value bindings are never constructed, cached separately or disposed.
    /// To bind a trait object, pass an `Arc<dyn Trait>` and read it back with
    /// [`Resolver::resolve_trait`](crate::Resolver::resolve_trait).
    pub fn provide_value<V>(&self, token: impl Into<Token>, value: V) -> Injector
    where
        V: Send + Sync + 'static,
    {
        let provider = Provider::Value(Arc::new(value));
        self.append(Binding::new(token.into(), provider, Scope::Singleton))
    }

    /// Appends a singleton factory binding.
    pub fn provide_factory<T>(&self, token: impl Into<Token>, factory: Injectable<T>) -> Injector
    where
        T: Send + Sync + 'static,
    {
        self.provide_factory_scoped(token, factory, Scope::default())
    }

    /// Appends a factory binding with an explicit scope.
    pub fn provide_factory_scoped<T>(&self, token: impl Into<Token>, factory: Injectable<T>, scope: Scope) -> Injector
    where
        T: Send + Sync + 'static,
    {
        let provider = Provider::Factory(factory.into_provided());
        self.append(Binding::new(token.into(), provider, scope))
    }

    /// Appends a singleton class binding.
    pub fn provide_class<T>(&self, token: impl Into<Token>, class: Injectable<T>) -> Injector
    where
        T: Send + Sync + 'static,
    {
        self.provide_class_scoped(token, class, Scope::default())
    }

    /// Appends a class binding with an explicit scope.
    pub fn provide_class_scoped<T>(&self, token: impl Into<Token>, class: Injectable<T>, scope: Scope) -> Injector
    where
        T: Send + Sync + 'static,
    {
        let provider = Provider::Class(class.into_provided());
        self.append(Binding::new(token.into(), provider, scope))
    }

    /// Token bound by this node, `None` for the root.
    pub fn token(&self) -> Option<&Token> {
        self.node.binding.as_ref().map(|b| &b.token)
    }

    /// Number of nodes between this one and the root.
    pub fn depth(&self) -> usize {
        self.node.depth
    }

    /// Whether this node has been disposed, directly or through a descendant.
    pub fn is_disposed(&self) -> bool {
        self.node.lock().disposed
    }

    /// Whether two handles point at the same node.
    pub fn ptr_eq(&self, other: &Injector) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    fn parent(&self) -> Option<&Injector> {
        self.node.parent.as_ref()
    }

    fn id(&self) -> usize {
        Arc::as_ptr(&self.node) as usize
    }

    pub(crate) fn ensure_live(&self, operation: Operation, name: impl fmt::Display) -> DiResult<()> {
        if self.is_disposed() {
            Err(DiError::disposed(operation, name))
        } else {
            Ok(())
        }
    }

    /// Walks from this node toward the root until a node binds `token`.
    ///
    /// `target` is the injectable whose dependency is being resolved; it is
    /// passed on to a factory or class that declares `TARGET_TOKEN`.
    pub(crate) fn resolve_internal(&self, token: &Token, target: Option<&TargetRef>) -> DiResult<AnyArc> {
        match token {
            Token::Injector => {
                self.ensure_live(Operation::Resolve, token)?;
                return Ok(Arc::new(self.clone()));
            }
            Token::Target => {
                self.ensure_live(Operation::Resolve, token)?;
                return Ok(Arc::new(target.cloned()));
            }
            Token::Named(_) => {}
        }

        let mut current = self;
        loop {
            current.ensure_live(Operation::Resolve, token)?;
            if let Some(binding) = current.node.binding.as_ref().filter(|b| b.token == *token) {
                return current.produce(binding, target);
            }
            current = match current.parent() {
                Some(parent) => parent,
                None => return Err(DiError::MissingProvider(token.clone())),
            };
        }
    }

    /// Yields the value of this node's own binding according to its scope.
    fn produce(&self, binding: &Binding, target: Option<&TargetRef>) -> DiResult<AnyArc> {
        let injectable = match &binding.provider {
            Provider::Value(value) => return Ok(value.clone()),
            Provider::Factory(injectable) | Provider::Class(injectable) => injectable,
        };

        if binding.scope.is_cached() {
            if let Some(cached) = binding.cache.get() {
                tracing::trace!(token = %binding.token, "singleton cache hit");
                return Ok(cached);
            }
            let produced = with_cycle_guard(self.id(), binding.token.name(), || {
                invoker::invoke(self, injectable, target)
            })?;
            let (value, inserted) = binding.cache.get_or_insert(produced.value);
            if inserted {
                tracing::trace!(token = %binding.token, "singleton constructed");
                self.track(produced.teardown, &binding.token)?;
            } else {
                // Another thread stored its instance first; ours was never handed out.
                if let Some(teardown) = produced.teardown {
                    dispose_bag::run_sync(vec![teardown]);
                }
                self.ensure_live(Operation::Resolve, &binding.token)?;
            }
            Ok(value)
        } else {
            let produced = with_cycle_guard(self.id(), binding.token.name(), || {
                invoker::invoke(self, injectable, target)
            })?;
            tracing::trace!(token = %binding.token, "transient constructed");
            self.track(produced.teardown, &binding.token)?;
            Ok(produced.value)
        }
    }

    /// Records a freshly constructed instance for teardown.
    ///
    /// The node may have been disposed while the constructor ran. The instance
    /// is then torn down on the spot and the resolution fails.
    fn track(&self, teardown: Option<Disposer>, token: &Token) -> DiResult<()> {
        let mut state = self.node.lock();
        if state.disposed {
            drop(state);
            if let Some(teardown) = teardown {
                dispose_bag::run_sync(vec![teardown]);
            }
            return Err(DiError::disposed(Operation::Resolve, token));
        }
        if let Some(teardown) = teardown {
            state.tracker.push(teardown);
        }
        Ok(())
    }

    /// Constructs `class` with its dependencies resolved against this node.
    ///
    /// The instance is handed to the caller and never tracked for disposal.
    pub fn inject_class<T>(&self, class: &Injectable<T>) -> DiResult<T> {
        self.ensure_live(Operation::Inject, class.name())?;
        invoker::invoke(self, class, None)
    }

    /// Calls `function` with its dependencies resolved against this node.
    ///
    /// The result is handed to the caller and never tracked for disposal.
    pub fn inject_function<T>(&self, function: &Injectable<T>) -> DiResult<T> {
        self.ensure_live(Operation::Inject, function.name())?;
        invoker::invoke(self, function, None)
    }

    /// Renders the chain from this node to the root, one node per line.
    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Injector Chain ===\n");
        let mut current = Some(self);
        while let Some(injector) = current {
            let state = injector.node.lock();
            match &injector.node.binding {
                Some(b) => s.push_str(&format!(
                    "  [{}] {}: {} {:?} cached={} tracked={} disposed={}\n",
                    injector.node.depth,
                    b.token,
                    b.provider.kind(),
                    b.scope,
                    b.cache.get().is_some(),
                    state.tracker.len(),
                    state.disposed
                )),
                None => s.push_str(&format!("  [0] <root> disposed={}\n", state.disposed)),
            }
            current = injector.parent();
        }
        s
    }
}

impl ResolverCore for Injector {
    fn resolve_any(&self, token: &Token) -> DiResult<AnyArc> {
        self.resolve_internal(token, None)
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("binding", &self.node.binding)
            .field("depth", &self.node.depth)
            .finish_non_exhaustive()
    }
}
