//! Error types for the injector chain.

use std::borrow::Cow;
use std::fmt;

use crate::token::Token;

/// The operation that was attempted on a disposed injector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Resolving a token (`resolve`).
    Resolve,
    /// Injecting a class or function (`inject_class` / `inject_function`).
    Inject,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Resolve => f.write_str("resolve"),
            Operation::Inject => f.write_str("inject"),
        }
    }
}

/// Dependency injection errors
///
/// Every failure raised by the injector chain is one of these variants. The
/// `Display` output is stable and intended to be shown to humans; match on the
/// variant when you need to react programmatically.
///
/// # Examples
///
/// ```rust
/// use chain_di::{create_injector, DiError, Injectable, Token};
///
/// struct FooInjectable;
///
/// let foo = Injectable::class("FooInjectable", [Token::new("foo")], |_| Ok(FooInjectable));
/// let err = create_injector().inject_class(&foo).err().unwrap();
///
/// assert_eq!(
///     err.to_string(),
///     "Could not inject \"FooInjectable\". Inner error: No provider found for \"foo\"!"
/// );
/// assert!(matches!(err.root_cause(), DiError::MissingProvider(_)));
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum DiError {
    /// No node between the requesting injector and the root binds the token.
    #[error("No provider found for \"{0}\"!")]
    MissingProvider(Token),

    /// Resolving the declared tokens of a target (or running it) failed.
    #[error("Could not inject \"{target}\". Inner error: {source}")]
    Injection {
        /// Display name of the class or function being injected.
        target: Cow<'static, str>,
        /// The failure that stopped the injection.
        #[source]
        source: Box<DiError>,
    },

    /// The injector (or one of its ancestors) has already been disposed.
    #[error("Injector is already disposed. Please don't use it anymore. Tried to {operation} \"{name}\".")]
    Disposed {
        /// What was attempted.
        operation: Operation,
        /// Token or target name involved.
        name: String,
    },

    /// A value was found but is not of the requested type.
    #[error("Type mismatch for \"{name}\": expected {expected}")]
    TypeMismatch {
        /// Token or argument the value came from.
        name: String,
        /// Rust type name that was requested.
        expected: &'static str,
    },

    /// A provider depends on its own binding.
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<String>),

    /// A constructor or factory reported a failure of its own.
    #[error("{0}")]
    Construction(String),
}

impl DiError {
    pub(crate) fn injection(target: impl Into<Cow<'static, str>>, source: DiError) -> Self {
        DiError::Injection {
            target: target.into(),
            source: Box::new(source),
        }
    }

    pub(crate) fn disposed(operation: Operation, name: impl fmt::Display) -> Self {
        DiError::Disposed {
            operation,
            name: name.to_string(),
        }
    }

    /// Walks through nested [`DiError::Injection`] wrappers and returns the
    /// innermost error.
    pub fn root_cause(&self) -> &DiError {
        let mut current = self;
        while let DiError::Injection { source, .. } = current {
            current = source;
        }
        current
    }
}

/// Result type for DI operations
///
/// A convenience alias for `Result<T, DiError>` used throughout chain-di.
pub type DiResult<T> = Result<T, DiError>;
