//! Injection targets: a callable paired with its ordered token list.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::injector::Injector;
use crate::internal::Disposer;
use crate::registration::{AnyArc, Produced};
use crate::token::Token;
use crate::traits::{downcast, AsyncDispose, Dispose};

type Ctor<T> = dyn Fn(&mut Arguments) -> DiResult<T> + Send + Sync;

/// Whether an injectable stands for a constructor or a plain function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectableKind {
    /// Built with [`Injectable::class`].
    Class,
    /// Built with [`Injectable::function`].
    Function,
}

/// Describes the class or function a value is being injected into.
///
/// This is what a dependency declaring [`TARGET_TOKEN`](crate::TARGET_TOKEN)
/// receives: the injectable that required it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    name: Cow<'static, str>,
    kind: InjectableKind,
    product: &'static str,
}

impl TargetRef {
    /// Display name of the target.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> InjectableKind {
        self.kind
    }

    /// Rust type name of what the target produces.
    pub fn product_type(&self) -> &'static str {
        self.product
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A class constructor or function together with the tokens it depends on.
///
/// The callable receives the resolved [`Arguments`] in the order the tokens were
/// declared. Injectables are cheap to clone and can be registered as providers
/// or injected directly.
///
/// # Examples
///
/// ```
/// use chain_di::{create_injector, Injectable, Token};
/// use std::sync::Arc;
///
/// struct Config { url: String }
/// struct Repository { config: Arc<Config> }
///
/// let repository = Injectable::class("Repository", [Token::new("config")], |args| {
///     Ok(Repository { config: args.next::<Config>()? })
/// });
///
/// let injector = create_injector()
///     .provide_value("config", Config { url: "postgres://localhost".into() });
///
/// let repo = injector.inject_class(&repository).unwrap();
/// assert_eq!(repo.config.url, "postgres://localhost");
/// ```
pub struct Injectable<T> {
    target: TargetRef,
    tokens: Arc<[Token]>,
    ctor: Arc<Ctor<T>>,
    teardown: Option<fn(Arc<T>) -> Disposer>,
}

impl<T: 'static> Injectable<T> {
    /// Declares a class: `ctor` builds an instance from its dependencies.
    pub fn class<I, F>(name: impl Into<Cow<'static, str>>, tokens: I, ctor: F) -> Self
    where
        I: IntoIterator<Item = Token>,
        F: Fn(&mut Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        Self::new(name.into(), InjectableKind::Class, tokens, ctor)
    }

    /// Declares a function: `f` computes a value from its dependencies.
    pub fn function<I, F>(name: impl Into<Cow<'static, str>>, tokens: I, f: F) -> Self
    where
        I: IntoIterator<Item = Token>,
        F: Fn(&mut Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        Self::new(name.into(), InjectableKind::Function, tokens, f)
    }

    fn new<I, F>(name: Cow<'static, str>, kind: InjectableKind, tokens: I, ctor: F) -> Self
    where
        I: IntoIterator<Item = Token>,
        F: Fn(&mut Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        Self {
            target: TargetRef {
                name,
                kind,
                product: std::any::type_name::<T>(),
            },
            tokens: tokens.into_iter().collect(),
            ctor: Arc::new(ctor),
            teardown: None,
        }
    }
}

impl<T> Injectable<T> {
    pub fn name(&self) -> &str {
        self.target.name()
    }

    pub fn kind(&self) -> InjectableKind {
        self.target.kind
    }

    /// Declared tokens, in argument order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub(crate) fn shared_tokens(&self) -> Arc<[Token]> {
        self.tokens.clone()
    }

    pub(crate) fn target(&self) -> &TargetRef {
        &self.target
    }

    pub(crate) fn call(&self, args: &mut Arguments) -> DiResult<T> {
        (self.ctor)(args)
    }

    /// Whether instances produced through a provider will be tracked for teardown.
    pub fn has_teardown(&self) -> bool {
        self.teardown.is_some()
    }
}

impl<T: Dispose> Injectable<T> {
    /// Declares that produced instances expose [`Dispose`].
    pub fn disposable(mut self) -> Self {
        self.teardown = Some(Disposer::sync::<T>);
        self
    }
}

impl<T: AsyncDispose> Injectable<T> {
    /// Declares that produced instances expose [`AsyncDispose`].
    pub fn async_disposable(mut self) -> Self {
        self.teardown = Some(Disposer::asynchronous::<T>);
        self
    }
}

impl<T: Send + Sync + 'static> Injectable<T> {
    /// Erases the product type for storage in a binding.
    pub(crate) fn into_provided(self) -> Injectable<Produced> {
        let ctor = self.ctor;
        let teardown = self.teardown;
        Injectable {
            target: self.target,
            tokens: self.tokens,
            ctor: Arc::new(move |args: &mut Arguments| {
                let instance = Arc::new(ctor(args)?);
                let teardown = teardown.map(|make| make(instance.clone()));
                Ok(Produced {
                    value: instance as AnyArc,
                    teardown,
                })
            }),
            teardown: None,
        }
    }
}

impl<T> Clone for Injectable<T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            tokens: self.tokens.clone(),
            ctor: self.ctor.clone(),
            teardown: self.teardown,
        }
    }
}

impl<T> fmt::Debug for Injectable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injectable")
            .field("name", &self.target.name)
            .field("kind", &self.target.kind)
            .field("tokens", &self.tokens)
            .field("teardown", &self.teardown.is_some())
            .finish()
    }
}

/// One resolved argument.
#[derive(Clone)]
pub enum Argument {
    /// Value resolved from the chain.
    Value(AnyArc),
    /// The enclosing target, `None` at the top level.
    Target(Option<TargetRef>),
    /// The injector performing the injection.
    Injector(Injector),
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Value(_) => f.write_str("Value(..)"),
            Argument::Target(target) => f.debug_tuple("Target").field(target).finish(),
            Argument::Injector(injector) => f.debug_tuple("Injector").field(injector).finish(),
        }
    }
}

/// Resolved arguments handed to an injectable, in declared order.
///
/// Access them by position with [`get`](Self::get) and friends, or read them
/// front to back with [`next`](Self::next).
#[derive(Debug)]
pub struct Arguments {
    tokens: Arc<[Token]>,
    values: Vec<Argument>,
    cursor: usize,
}

impl Arguments {
    pub(crate) fn new(tokens: Arc<[Token]>, values: Vec<Argument>) -> Self {
        debug_assert_eq!(tokens.len(), values.len());
        Self {
            tokens,
            values,
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Token declared at `index`.
    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Raw argument at `index`.
    pub fn argument(&self, index: usize) -> Option<&Argument> {
        self.values.get(index)
    }

    fn at(&self, index: usize) -> DiResult<(&Token, &Argument)> {
        match (self.tokens.get(index), self.values.get(index)) {
            (Some(token), Some(value)) => Ok((token, value)),
            _ => Err(DiError::Construction(format!(
                "argument {} requested but only {} declared",
                index,
                self.values.len()
            ))),
        }
    }

    fn mismatch<T: ?Sized>(token: &Token) -> DiError {
        DiError::TypeMismatch {
            name: token.to_string(),
            expected: std::any::type_name::<T>(),
        }
    }

    /// Value at `index`, downcast to `T`.
    pub fn get<T: Send + Sync + 'static>(&self, index: usize) -> DiResult<Arc<T>> {
        match self.at(index)? {
            (token, Argument::Value(value)) => downcast(value.clone(), token),
            (token, _) => Err(Self::mismatch::<T>(token)),
        }
    }

    /// Trait object at `index`, bound as `Arc<dyn Trait>`.
    pub fn get_trait<T: ?Sized + Send + Sync + 'static>(&self, index: usize) -> DiResult<Arc<T>> {
        match self.at(index)? {
            (token, Argument::Value(value)) => downcast::<Arc<T>>(value.clone(), token).map(|boxed| (*boxed).clone()),
            (token, _) => Err(Self::mismatch::<T>(token)),
        }
    }

    /// Enclosing target at `index` (declared with `TARGET_TOKEN`).
    pub fn target(&self, index: usize) -> DiResult<Option<TargetRef>> {
        match self.at(index)? {
            (_, Argument::Target(target)) => Ok(target.clone()),
            (token, _) => Err(Self::mismatch::<TargetRef>(token)),
        }
    }

    /// Injector at `index` (declared with `INJECTOR_TOKEN`).
    pub fn injector(&self, index: usize) -> DiResult<Injector> {
        match self.at(index)? {
            (_, Argument::Injector(injector)) => Ok(injector.clone()),
            (token, _) => Err(Self::mismatch::<Injector>(token)),
        }
    }

    fn advance(&mut self) -> usize {
        let index = self.cursor;
        self.cursor += 1;
        index
    }

    /// Next value in declared order.
    pub fn next<T: Send + Sync + 'static>(&mut self) -> DiResult<Arc<T>> {
        let index = self.advance();
        self.get(index)
    }

    pub fn next_trait<T: ?Sized + Send + Sync + 'static>(&mut self) -> DiResult<Arc<T>> {
        let index = self.advance();
        self.get_trait(index)
    }

    pub fn next_target(&mut self) -> DiResult<Option<TargetRef>> {
        let index = self.advance();
        self.target(index)
    }

    pub fn next_injector(&mut self) -> DiResult<Injector> {
        let index = self.advance();
        self.injector(index)
    }
}
