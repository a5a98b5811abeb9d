//! # chain-di
//!
//! Hierarchical dependency injection built from an append-only chain of
//! injectors, with per-binding caching and deterministic teardown.
//!
//! ## Features
//!
//! - **Append-only chain**: every `provide_*` call returns a new injector that
//!   binds one token and delegates the rest to its parent
//! - **Per-binding scopes**: Singleton (cached on the binding) and Transient
//! - **Reserved tokens**: inject the enclosing target or the injector itself
//! - **Deterministic teardown**: instances created through providers are
//!   disposed exactly once, ancestors first, in construction order
//! - **Structured errors**: stable, human-readable messages for missing
//!   providers, failed injections and use after disposal
//!
//! ## Quick Start
//!
//! ```rust
//! use chain_di::{create_injector, Injectable, Resolver, Token};
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let injector = create_injector()
//!     .provide_value("connectionString", "postgres://localhost".to_string())
//!     .provide_factory(
//!         "db",
//!         Injectable::function("connect", [Token::new("connectionString")], |args| {
//!             Ok(Database { connection_string: args.next::<String>()?.to_string() })
//!         }),
//!     );
//!
//! let user_service = injector
//!     .inject_class(&Injectable::class("UserService", [Token::new("db")], |args| {
//!         Ok(UserService { db: args.next::<Database>()? })
//!     }))
//!     .unwrap();
//! assert_eq!(user_service.db.connection_string, "postgres://localhost");
//! assert!(Arc::ptr_eq(&user_service.db, &injector.resolve::<Database>("db").unwrap()));
//! ```
//!
//! ## Reserved Tokens
//!
//! ```rust
//! use chain_di::{create_injector, Injectable, Resolver, Token, TARGET_TOKEN};
//!
//! struct Logger { owner: String }
//! struct Service { logger: std::sync::Arc<Logger> }
//!
//! let injector = create_injector().provide_factory_scoped(
//!     "logger",
//!     Injectable::function("createLogger", [TARGET_TOKEN], |args| {
//!         let owner = args.next_target()?.map(|t| t.name().to_string());
//!         Ok(Logger { owner: owner.unwrap_or_else(|| "<none>".into()) })
//!     }),
//!     chain_di::Scope::Transient,
//! );
//!
//! let service = injector
//!     .inject_class(&Injectable::class("Service", [Token::new("logger")], |args| {
//!         Ok(Service { logger: args.next()? })
//!     }))
//!     .unwrap();
//! assert_eq!(service.logger.owner, "Service");
//! assert_eq!(injector.resolve::<Logger>("logger").unwrap().owner, "<none>");
//! ```

// Module declarations
pub mod error;
pub mod injectable;
pub mod injector;
pub mod scope;
pub mod token;
pub mod traits;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use error::{DiError, DiResult, Operation};
pub use injectable::{Argument, Arguments, Injectable, InjectableKind, TargetRef};
pub use injector::{create_injector, Injector};
pub use registration::AnyArc;
pub use scope::Scope;
pub use token::{Token, INJECTOR_TOKEN, TARGET_TOKEN};
pub use traits::{AsyncDispose, Dispose, Resolver, ResolverCore};
