//! Builds a small application graph on an injector chain, runs it, then tears
//! it down.
//!
//! Run with `RUST_LOG=chain_di=trace cargo run --example app_startup` to see
//! every binding, resolution and teardown.

use async_trait::async_trait;
use chain_di::{
    create_injector, AsyncDispose, DiResult, Dispose, Injectable, Injector, Resolver, Scope, TargetRef, Token,
    INJECTOR_TOKEN, TARGET_TOKEN,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Config {
    database_url: String,
    pool_size: usize,
}

/// One logger per consumer, named after whatever asked for it.
struct Logger {
    owner: String,
}

impl Logger {
    fn info(&self, message: &str) {
        tracing::info!(owner = %self.owner, "{}", message);
    }
}

struct Database {
    url: String,
    logger: Arc<Logger>,
}

#[async_trait]
impl AsyncDispose for Database {
    async fn dispose(&self) {
        self.logger.info(&format!("closing pool for {}", self.url));
        tokio::task::yield_now().await;
    }
}

struct UserRepository {
    db: Arc<Database>,
    logger: Arc<Logger>,
}

impl UserRepository {
    fn find(&self, id: u32) -> String {
        self.logger.info(&format!("looking up user {} in {}", id, self.db.url));
        format!("user-{}", id)
    }
}

impl Dispose for UserRepository {
    fn dispose(&self) {
        self.logger.info("flushing repository cache");
    }
}

fn build_container() -> Injector {
    let logger = Injectable::function("createLogger", [TARGET_TOKEN], |args| {
        let owner = args.next_target()?.map(|t: TargetRef| t.name().to_string());
        Ok(Logger {
            owner: owner.unwrap_or_else(|| "app".to_string()),
        })
    });

    let database = Injectable::class("Database", [Token::new("config"), Token::new("logger")], |args| {
        let config = args.next::<Config>()?;
        Ok(Database {
            url: format!("{} (pool={})", config.database_url, config.pool_size),
            logger: args.next()?,
        })
    })
    .async_disposable();

    let users = Injectable::class("UserRepository", [Token::new("db"), Token::new("logger")], |args| {
        Ok(UserRepository {
            db: args.next()?,
            logger: args.next()?,
        })
    })
    .disposable();

    create_injector()
        .provide_value(
            "config",
            Config {
                database_url: "postgres://localhost/app".to_string(),
                pool_size: 8,
            },
        )
        .provide_factory_scoped("logger", logger, Scope::Transient)
        .provide_class("db", database)
        .provide_class("users", users)
}

fn handle_request(id: u32) -> Injectable<String> {
    Injectable::function("handleRequest", [Token::new("users"), INJECTOR_TOKEN], move |args| {
        let users = args.next::<UserRepository>()?;
        let injector = args.next_injector()?;
        tracing::debug!(depth = injector.depth(), "request handled at chain depth");
        Ok(users.find(id))
    })
}

#[tokio::main]
async fn main() -> DiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let injector = build_container();

    for id in [1, 2] {
        let user = injector.inject_function(&handle_request(id))?;
        tracing::info!(%user, "request complete");
    }

    let users = injector.resolve::<UserRepository>("users")?;
    tracing::info!(found = %users.find(3), "direct resolution");

    #[cfg(feature = "diagnostics")]
    println!("{}", injector.to_debug_string());

    injector.dispose_async().await;
    Ok(())
}
