//! Resolver traits for token resolution.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::registration::AnyArc;
use crate::token::Token;

/// Core resolver trait for object-safe token resolution.
///
/// Returns values type-erased as `Arc<dyn Any + Send + Sync>`. Most callers
/// should use [`Resolver`] instead, which downcasts for you.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single token against this resolver.
    ///
    /// # Returns
    ///
    /// * `Ok(AnyArc)` - The value bound to the token
    /// * `Err(DiError)` - Missing provider, disposed injector, or a failed
    ///   construction of the bound provider
    fn resolve_any(&self, token: &Token) -> DiResult<AnyArc>;
}

/// High-level resolver interface with typed access.
///
/// Implemented for every [`ResolverCore`], so any injector can be used through
/// it.
///
/// # Examples
///
/// ```
/// use chain_di::{create_injector, Resolver};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str) -> String;
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) -> String {
///         format!("LOG: {}", msg)
///     }
/// }
///
/// let injector = create_injector()
///     .provide_value("port", 8080u16)
///     .provide_value("logger", Arc::new(ConsoleLogger) as Arc<dyn Logger>);
///
/// assert_eq!(*injector.resolve::<u16>("port").unwrap(), 8080);
///
/// let logger = injector.resolve_trait::<dyn Logger>("logger").unwrap();
/// assert_eq!(logger.log("ready"), "LOG: ready");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a token and downcasts the value to `T`.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<T>)` - The resolved value
    /// * `Err(DiError::TypeMismatch)` - The bound value is not a `T`
    /// * `Err(DiError)` - Any resolution failure
    fn resolve<T: Send + Sync + 'static>(&self, token: impl Into<Token>) -> DiResult<Arc<T>> {
        let token = token.into();
        let any = self.resolve_any(&token)?;
        downcast(any, &token)
    }

    /// Resolves a trait object bound as `Arc<dyn Trait>`.
    ///
    /// Trait objects are stored as `Arc<Arc<dyn Trait>>`; this unwraps the
    /// outer layer.
    fn resolve_trait<T: ?Sized + Send + Sync + 'static>(&self, token: impl Into<Token>) -> DiResult<Arc<T>> {
        let token = token.into();
        let any = self.resolve_any(&token)?;
        downcast::<Arc<T>>(any, &token).map(|boxed| (*boxed).clone())
    }

    /// Resolves a token, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics if the token cannot be resolved or holds a different type. Use
    /// this where a missing binding is a configuration bug.
    fn resolve_required<T: Send + Sync + 'static>(&self, token: impl Into<Token>) -> Arc<T> {
        let token = token.into();
        self.resolve::<T>(token.clone())
            .unwrap_or_else(|e| panic!("Failed to resolve \"{}\" as {}: {}", token, std::any::type_name::<T>(), e))
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}

pub(crate) fn downcast<T: Send + Sync + 'static>(any: AnyArc, token: &Token) -> DiResult<Arc<T>> {
    any.downcast::<T>().map_err(|_| DiError::TypeMismatch {
        name: token.to_string(),
        expected: std::any::type_name::<T>(),
    })
}
