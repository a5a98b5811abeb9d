//! Core traits for the injector chain.

mod dispose;
mod resolver;

pub use dispose::{Dispose, AsyncDispose};
pub use resolver::{Resolver, ResolverCore};
pub(crate) use resolver::downcast;
